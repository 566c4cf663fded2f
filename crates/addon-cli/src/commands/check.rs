//! Check command implementation

use std::path::{Path, PathBuf};

use addon_resolver::{MANIFEST_FILENAME, ManifestSpec, load_manifest};
use colored::Colorize;

use crate::error::{CliError, Result};

/// Run the check command
pub fn run_check(cwd: &Path, paths: &[PathBuf]) -> Result<()> {
    let mut invalid = 0;

    for path in paths {
        let path = cwd.join(path);
        let file = if path.is_dir() {
            path.join(MANIFEST_FILENAME)
        } else {
            path
        };

        let raw = match load_manifest(&file) {
            Ok(raw) => raw,
            Err(e) => {
                invalid += 1;
                println!("{} {}", "x".red(), e);
                continue;
            }
        };

        match ManifestSpec::build(&raw) {
            Ok(spec) => println!(
                "{} {} {} ({}, host {})",
                "ok".green(),
                spec.identifier().cyan(),
                spec.version(),
                spec.status(),
                spec.host_window()
            ),
            Err(errors) => {
                invalid += 1;
                println!("{} {}", "x".red(), file.display());
                for error in errors {
                    println!("    {}", error.reason);
                }
            }
        }
    }

    if invalid > 0 {
        return Err(CliError::user(format!(
            "{invalid} of {} manifest(s) invalid",
            paths.len()
        )));
    }
    Ok(())
}
