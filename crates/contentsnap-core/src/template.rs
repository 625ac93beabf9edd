//! `${name}` placeholder substitution for snapcraft templates.

use std::collections::BTreeMap;
use tracing::warn;

/// Replace `${key}` placeholders with values from `vars`.
///
/// Placeholders inside substituted values are expanded too; a key that
/// refers back to itself is left as written. Unknown keys and unterminated
/// placeholders are copied through unchanged. `$${` escapes a literal `${`.
pub fn substitute(template: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    expand(template, vars, &mut Vec::new(), &mut out);
    out
}

fn expand<'v>(
    text: &str,
    vars: &'v BTreeMap<&str, String>,
    active: &mut Vec<&'v str>,
    out: &mut String,
) {
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(escaped) = tail.strip_prefix("$${") {
            out.push_str("${");
            rest = escaped;
            continue;
        }

        if let Some(body) = tail.strip_prefix("${") {
            if let Some(end) = body.find('}') {
                let placeholder = &tail[..end + 3];
                match vars.get_key_value(&body[..end]) {
                    Some((&key, _)) if active.contains(&key) => {
                        warn!("cyclic placeholder {placeholder} left unexpanded");
                        out.push_str(placeholder);
                    }
                    Some((&key, value)) => {
                        active.push(key);
                        expand(value, vars, active, out);
                        active.pop();
                    }
                    None => out.push_str(placeholder),
                }
                rest = &body[end + 1..];
                continue;
            }
        }

        out.push('$');
        rest = &tail[1..];
    }

    out.push_str(rest);
}
