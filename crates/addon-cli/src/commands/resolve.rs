//! Resolve command implementation

use std::path::{Path, PathBuf};

use addon_resolver::config::ManifestsConfig;
use addon_resolver::{
    CONFIG_FILENAME, LoadOrder, Problem, ResolutionReport, ResolutionResult, ResolverConfig,
    load_dirs, resolve_records,
};
use colored::Colorize;
use serde::Serialize;

use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};

/// JSON shape of a resolution run.
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Outcome<'a> {
    Resolved {
        host: &'a str,
        order: &'a LoadOrder,
    },
    Failed {
        host: &'a str,
        #[serde(flatten)]
        report: &'a ResolutionReport,
    },
}

/// Settings after merging `addons.toml` with command-line flags.
#[derive(Debug, PartialEq)]
struct Settings {
    host_version: String,
    dirs: Vec<PathBuf>,
}

/// Run the resolve command
pub fn run_resolve(cwd: &Path, args: &ResolveArgs) -> Result<()> {
    let settings = settings(cwd, args)?;
    tracing::debug!("Resolving with {:?}", settings);

    let mut load_problems = Vec::new();
    let mut records = Vec::new();
    for manifest in load_dirs(&settings.dirs)? {
        match manifest.record {
            Ok(record) => records.push(record),
            Err(e) => load_problems.push(Problem::Validation {
                identifier: addon_dir_name(&manifest.path),
                reason: e.to_string(),
            }),
        }
    }

    let result = merge_load_problems(
        load_problems,
        resolve_records(&settings.host_version, &records),
    );

    if args.json {
        print_json(&settings.host_version, &result)?;
    } else {
        print_text(&settings.host_version, &result);
    }

    result.map(|_| ()).map_err(CliError::from)
}

fn settings(cwd: &Path, args: &ResolveArgs) -> Result<Settings> {
    let config = match args.config {
        Some(ref path) => Some(ResolverConfig::load(&cwd.join(path))?),
        None => {
            let default_path = cwd.join(CONFIG_FILENAME);
            if default_path.is_file() {
                Some(ResolverConfig::load(&default_path)?)
            } else {
                None
            }
        }
    };

    let host_version = match (&args.host_version, &config) {
        (Some(version), _) => version.clone(),
        (None, Some(config)) => config.host.version.to_string(),
        (None, None) => {
            return Err(CliError::user(format!(
                "no host version given: pass --host-version or create {CONFIG_FILENAME}"
            )));
        }
    };

    let dirs = if !args.dirs.is_empty() {
        args.dirs.iter().map(|dir| cwd.join(dir)).collect()
    } else {
        match config {
            Some(config) => config.manifests.dirs,
            None => ManifestsConfig::default()
                .dirs
                .iter()
                .map(|dir| cwd.join(dir))
                .collect(),
        }
    };

    Ok(Settings { host_version, dirs })
}

/// Files that failed to load count as invalid manifests of the add-on
/// named by their directory.
fn merge_load_problems(load_problems: Vec<Problem>, result: ResolutionResult) -> ResolutionResult {
    if load_problems.is_empty() {
        return result;
    }
    match result {
        Ok(order) => {
            let mut unaffected = order.into_vec();
            unaffected.sort();
            Err(ResolutionReport {
                problems: load_problems,
                unaffected,
            })
        }
        Err(mut report) => {
            let mut problems = load_problems;
            problems.append(&mut report.problems);
            Err(ResolutionReport {
                problems,
                unaffected: report.unaffected,
            })
        }
    }
}

fn addon_dir_name(manifest_path: &Path) -> String {
    manifest_path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_json(host: &str, result: &ResolutionResult) -> Result<()> {
    let outcome = match result {
        Ok(order) => Outcome::Resolved { host, order },
        Err(report) => Outcome::Failed { host, report },
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn print_text(host: &str, result: &ResolutionResult) {
    match result {
        Ok(order) => {
            println!(
                "{} ({} add-on(s), host {})",
                "Load order".bold(),
                order.len(),
                host
            );
            for (index, id) in order.iter().enumerate() {
                println!("  {:>3}. {}", index + 1, id.cyan());
            }
        }
        Err(report) => {
            println!(
                "{} ({} problem(s), host {})",
                "Resolution failed".red().bold(),
                report.problems.len(),
                host
            );
            for problem in &report.problems {
                println!("  {} {}", "x".red(), problem);
            }
            if !report.unaffected.is_empty() {
                println!();
                println!("{}: {}", "Unaffected".dimmed(), report.unaffected.join(", "));
            }
        }
    }
}
