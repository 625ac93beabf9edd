use super::{json_pretty, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use contentsnap_core::{generate, GenerateOptions};

pub fn run(options: &GenerateOptions, json: bool) -> Result<u8, String> {
    let pb = if json {
        None
    } else {
        Some(spinner("generating content snaps..."))
    };

    let report = match generate(options) {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "content snaps generated");
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "generation failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        println!("{}", json_pretty(&report)?);
    } else if report.snaps.is_empty() {
        println!("no content snaps to generate");
    } else {
        for snap in &report.snaps {
            println!(
                "generated {} {} ({} files) in {}",
                snap.name,
                snap.version,
                snap.files.len(),
                report.destination.join(&snap.name).display()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
