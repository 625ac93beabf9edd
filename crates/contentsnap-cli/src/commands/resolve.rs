use super::{json_pretty, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use console::style;
use contentsnap_core::{run_resolve, ResolvePaths};

pub fn run(paths: &ResolvePaths, json: bool) -> Result<u8, String> {
    let pb = if json {
        None
    } else {
        Some(spinner("resolving snap versions..."))
    };

    let report = match run_resolve(paths) {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "versions resolved");
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "resolution failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        println!(
            "resolved {} content snaps into {}",
            report.snaps.len(),
            report.output.display()
        );
        for snap in &report.snaps {
            println!(
                "  {:<36} {:<24} {}",
                snap.snap.as_str(),
                snap.library.as_str(),
                style(&snap.version).green()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
