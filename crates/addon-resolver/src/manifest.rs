//! Add-on manifest parsing and validation for `addon.toml` files.
//!
//! A [`RawManifest`] is the record exactly as written by the add-on author.
//! [`ManifestSpec::build`] validates it into an immutable [`ManifestSpec`],
//! reporting every defect at once rather than stopping at the first.
//!
//! # Example TOML
//!
//! ```toml
//! [addon]
//! id = "spiderAjax"
//! name = "Ajax Spider"
//! version = "23.1.0"
//! status = "beta"
//! description = "Crawls AJAX-rich sites"
//! author = "Example Dev Team"
//! url = "https://example.org/addons/spiderAjax"
//!
//! [host]
//! min_version = "2.11.0"
//! max_version = "3.0.0"
//!
//! [[dependencies]]
//! id = "selenium"
//! version = ">=15.0.0, <16.0.0"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compat;
use crate::error::{Error, Result};
use crate::version::{Version, VersionRange};

/// Lifecycle status of an add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    #[default]
    Release,
    Beta,
    Alpha,
}

impl FromStr for LifecycleStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "release" => Ok(LifecycleStatus::Release),
            "beta" => Ok(LifecycleStatus::Beta),
            "alpha" => Ok(LifecycleStatus::Alpha),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStatus::Release => write!(f, "release"),
            LifecycleStatus::Beta => write!(f, "beta"),
            LifecycleStatus::Alpha => write!(f, "alpha"),
        }
    }
}

/// An unvalidated manifest record as loaded from `addon.toml`.
///
/// Every field is optional at this level so that missing values surface as
/// [`ValidationError`]s alongside other defects instead of as parse errors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawManifest {
    #[serde(default)]
    pub addon: RawAddOn,
    #[serde(default)]
    pub host: RawHost,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<RawDependency>,
}

/// The `[addon]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawAddOn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// One of `release`, `beta`, `alpha`. Defaults to `release`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The `[host]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawHost {
    /// Oldest host release the add-on runs on (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    /// First host release the add-on no longer runs on (exclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<String>,
}

/// One `[[dependencies]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawDependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Range expression; absent means any version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl RawManifest {
    /// A record with the three required fields set.
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        min_host_version: impl Into<String>,
    ) -> Self {
        Self {
            addon: RawAddOn {
                id: Some(id.into()),
                version: Some(version.into()),
                ..RawAddOn::default()
            },
            host: RawHost {
                min_version: Some(min_host_version.into()),
                max_version: None,
            },
            dependencies: Vec::new(),
        }
    }

    /// Append a dependency on `id` within `range`.
    pub fn with_dependency(mut self, id: impl Into<String>, range: impl Into<String>) -> Self {
        self.dependencies.push(RawDependency {
            id: Some(id.into()),
            version: Some(range.into()),
        });
        self
    }

    /// Parse a manifest record from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a manifest record from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize the record back to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ManifestSerialize(e.to_string()))
    }
}

/// A structural defect in one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[error("invalid manifest '{identifier}': {reason}")]
pub struct ValidationError {
    /// The identifier as written, possibly empty.
    pub identifier: String,
    pub reason: String,
}

/// A dependency of one add-on on another, constrained to a version range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    source: String,
    target: String,
    range: VersionRange,
}

impl DependencyEdge {
    /// Identifier of the add-on declaring the dependency.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identifier of the add-on depended upon.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn range(&self) -> &VersionRange {
        &self.range
    }
}

/// A validated, immutable add-on manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSpec {
    identifier: String,
    name: String,
    description: String,
    version: Version,
    status: LifecycleStatus,
    min_host_version: Version,
    max_host_version: Option<Version>,
    author: Option<String>,
    url: Option<String>,
    dependencies: Vec<DependencyEdge>,
}

impl ManifestSpec {
    /// Validate a raw record.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationError`] found in the record.
    pub fn build(raw: &RawManifest) -> std::result::Result<Self, Vec<ValidationError>> {
        let identifier = raw.addon.id.clone().unwrap_or_default();
        let mut reasons = Vec::new();

        if let Err(reason) = check_identifier(&identifier) {
            reasons.push(reason);
        }

        let version = required_version(raw.addon.version.as_deref(), "version", &mut reasons);
        let min_host_version =
            required_version(raw.host.min_version.as_deref(), "host.min_version", &mut reasons);
        let max_host_version = raw
            .host
            .max_version
            .as_deref()
            .and_then(|text| match Version::parse(text) {
                Ok(version) => Some(version),
                Err(e) => {
                    reasons.push(format!("host.max_version: {e}"));
                    None
                }
            });

        if let (Some(min), Some(max)) = (&min_host_version, &max_host_version) {
            if max <= min {
                reasons.push(format!(
                    "host.max_version {max} must be greater than host.min_version {min}"
                ));
            }
        }

        let status = match raw.addon.status.as_deref() {
            None => Some(LifecycleStatus::default()),
            Some(text) => text
                .parse::<LifecycleStatus>()
                .map_err(|e| reasons.push(e.to_string()))
                .ok(),
        };

        let mut seen = HashSet::new();
        let mut dependencies = Vec::with_capacity(raw.dependencies.len());
        for (index, dep) in raw.dependencies.iter().enumerate() {
            let target = dep.id.as_deref().unwrap_or_default();
            if let Err(reason) = check_identifier(target) {
                reasons.push(format!("dependency #{}: {reason}", index + 1));
                continue;
            }
            if !seen.insert(target) {
                reasons.push(format!("duplicate dependency on '{target}'"));
                continue;
            }
            match VersionRange::parse(dep.version.as_deref().unwrap_or_default()) {
                Ok(range) => dependencies.push(DependencyEdge {
                    source: identifier.clone(),
                    target: target.to_string(),
                    range,
                }),
                Err(e) => reasons.push(format!("dependency '{target}': {e}")),
            }
        }

        match (version, min_host_version, status) {
            (Some(version), Some(min_host_version), Some(status)) if reasons.is_empty() => {
                Ok(Self {
                    name: raw.addon.name.clone().unwrap_or_else(|| identifier.clone()),
                    description: raw.addon.description.clone().unwrap_or_default(),
                    author: raw.addon.author.clone(),
                    url: raw.addon.url.clone(),
                    identifier,
                    version,
                    status,
                    min_host_version,
                    max_host_version,
                    dependencies,
                })
            }
            _ => Err(reasons
                .into_iter()
                .map(|reason| ValidationError {
                    identifier: identifier.clone(),
                    reason,
                })
                .collect()),
        }
    }

    /// Parse and validate a manifest from a TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, Vec<ValidationError>> {
        let raw = RawManifest::from_toml(content).map_err(|e| {
            vec![ValidationError {
                identifier: String::new(),
                reason: e.to_string(),
            }]
        })?;
        Self::build(&raw)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn status(&self) -> LifecycleStatus {
        self.status
    }

    pub fn min_host_version(&self) -> &Version {
        &self.min_host_version
    }

    pub fn max_host_version(&self) -> Option<&Version> {
        self.max_host_version.as_ref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Dependencies in declaration order.
    pub fn dependencies(&self) -> &[DependencyEdge] {
        &self.dependencies
    }

    /// The host versions this add-on runs on, as a range.
    pub fn host_window(&self) -> VersionRange {
        compat::host_window(&self.min_host_version, self.max_host_version.as_ref())
    }

    /// Whether the add-on can be loaded into a host at `host_version`.
    pub fn admits_host(&self, host_version: &Version) -> bool {
        compat::host_window_admits(
            host_version,
            &self.min_host_version,
            self.max_host_version.as_ref(),
        )
    }
}

/// Identifiers are graph keys and external lookup keys.
fn check_identifier(id: &str) -> std::result::Result<(), String> {
    if id.is_empty() {
        return Err("identifier must not be empty".to_string());
    }
    if id.contains(['/', '\\']) {
        return Err(format!("identifier '{id}' must not contain path separators"));
    }
    if id.chars().any(char::is_whitespace) {
        return Err(format!("identifier '{id}' must not contain whitespace"));
    }
    Ok(())
}

fn required_version(text: Option<&str>, field: &str, reasons: &mut Vec<String>) -> Option<Version> {
    let Some(text) = text else {
        reasons.push(format!("{field} is required"));
        return None;
    };
    Version::parse(text)
        .map_err(|e| reasons.push(format!("{field}: {e}")))
        .ok()
}
