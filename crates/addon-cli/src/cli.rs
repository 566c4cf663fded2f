//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Add-on resolver - Validate add-on manifests and compute a load order
#[derive(Parser, Debug)]
#[command(name = "addons")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve every add-on in the manifest directories into a load order
    ///
    /// Settings come from addons.toml (in the current directory, or the
    /// file given with --config); flags override them.
    ///
    /// Examples:
    ///   addons resolve                          # Use ./addons.toml
    ///   addons resolve --host-version 2.14.0    # Resolve ./addOns for host 2.14.0
    ///   addons resolve -d addOns -d vendor --json
    Resolve(ResolveArgs),

    /// Validate individual manifest files without resolving
    Check {
        /// Manifest files, or add-on directories containing addon.toml
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Arguments for `addons resolve`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Path to the resolver configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host application version (overrides the configuration)
    #[arg(long, env = "ADDONS_HOST_VERSION")]
    pub host_version: Option<String>,

    /// Manifest directories (override the configuration)
    #[arg(short, long = "dir")]
    pub dirs: Vec<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}
