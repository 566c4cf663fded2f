//! Resolver configuration from `addons.toml`.
//!
//! ```toml
//! [host]
//! version = "2.14.0"
//!
//! [manifests]
//! dirs = ["addOns", "vendor/addOns"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::version::Version;

/// Top-level resolver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    pub host: HostConfig,
    #[serde(default)]
    pub manifests: ManifestsConfig,
}

/// The `[host]` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Version of the host application add-ons are loaded into.
    pub version: Version,
}

/// The `[manifests]` table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestsConfig {
    /// Directories whose subdirectories hold `addon.toml` files.
    #[serde(default = "default_dirs")]
    pub dirs: Vec<PathBuf>,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        Self {
            dirs: default_dirs(),
        }
    }
}

fn default_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("addOns")]
}

impl ResolverConfig {
    /// Configuration for a host version with the default manifest directory.
    pub fn new(host_version: Version) -> Self {
        Self {
            host: HostConfig {
                version: host_version,
            },
            manifests: ManifestsConfig::default(),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// Relative manifest directories are left as written.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::ConfigParse)
    }

    /// Load configuration from a file.
    ///
    /// Relative manifest directories are resolved against the directory
    /// containing the file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: Self = toml::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.manifests.dirs = config
                .manifests
                .dirs
                .into_iter()
                .map(|dir| if dir.is_relative() { base.join(dir) } else { dir })
                .collect();
        }

        tracing::debug!(
            host = %config.host.version,
            dirs = config.manifests.dirs.len(),
            "loaded resolver configuration from {:?}",
            path
        );
        Ok(config)
    }
}
