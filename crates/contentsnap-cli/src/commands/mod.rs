pub mod completions;
pub mod generate;
pub mod man_pages;
pub mod resolve;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_PARSE_ERROR: u8 = 2;
pub const EXIT_LOOKUP_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Map a command error message to the process exit code.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("parse error:") {
        EXIT_PARSE_ERROR
    } else if msg.starts_with("lookup error:") {
        EXIT_LOOKUP_ERROR
    } else {
        EXIT_FAILURE
    }
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_pretty_serializes_object() {
        let val = serde_json::json!({"snap": "snap-1", "version": "1.2.3"});
        let result = json_pretty(&val).unwrap();
        assert!(result.contains("\"snap-1\""));
        assert!(result.contains("\"1.2.3\""));
    }

    #[test]
    fn exit_code_for_parse_error() {
        assert_eq!(
            exit_code_for("parse error: supported.yaml: missing field `content-snaps`"),
            EXIT_PARSE_ERROR
        );
    }

    #[test]
    fn exit_code_for_lookup_error() {
        assert_eq!(
            exit_code_for("lookup error: snap 'snap-1' references unknown library 'lib-b'"),
            EXIT_LOOKUP_ERROR
        );
    }

    #[test]
    fn exit_code_for_other_errors() {
        assert_eq!(exit_code_for("I/O error: out.yaml: denied"), EXIT_FAILURE);
        assert_eq!(exit_code_for("template error: no template"), EXIT_FAILURE);
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_ne!(EXIT_SUCCESS, EXIT_FAILURE);
        assert_ne!(EXIT_FAILURE, EXIT_PARSE_ERROR);
        assert_ne!(EXIT_PARSE_ERROR, EXIT_LOOKUP_ERROR);
    }

    #[test]
    fn spinner_creates_progress_bar() {
        let pb = spinner("resolving...");
        spin_ok(&pb, "done");
    }

    #[test]
    fn spinner_fail_creates_progress_bar() {
        let pb = spinner("resolving...");
        spin_fail(&pb, "failed");
    }
}
