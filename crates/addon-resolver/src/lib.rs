//! Add-on manifest resolver and compatibility engine.
//!
//! This crate parses and validates add-on manifests, checks them against the
//! host version and against each other, and computes a deterministic load
//! order, or a report of every problem that prevents one.

pub mod compat;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod manifest;
pub mod report;
pub mod resolver;
pub mod version;

/// The canonical filename for add-on manifest files.
///
/// Each add-on directory must contain a file with this name so the loader
/// can discover it.
pub const MANIFEST_FILENAME: &str = "addon.toml";

/// The canonical filename for resolver configuration.
pub const CONFIG_FILENAME: &str = "addons.toml";

pub use config::ResolverConfig;
pub use error::{Error, Result};
pub use graph::AddOnGraph;
pub use loader::{LoadedManifest, load_dir, load_dirs, load_manifest};
pub use manifest::{DependencyEdge, LifecycleStatus, ManifestSpec, RawManifest, ValidationError};
pub use report::{LoadOrder, Problem, ResolutionReport, ResolutionResult};
pub use resolver::{Resolver, resolve, resolve_records};
pub use version::{Version, VersionRange};
