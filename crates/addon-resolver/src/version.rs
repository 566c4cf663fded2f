//! Add-on versions and version ranges.
//!
//! A [`Version`] is a `MAJOR.MINOR.PATCH` triple with an optional qualifier
//! (`1.4.0-beta`). Qualified versions sort below the unqualified version with
//! the same triple.
//!
//! A [`VersionRange`] has an inclusive lower bound and an optional upper bound:
//!
//! - `>=1.2.0` - any version at or above 1.2.0
//! - `>=1.2.0, <2.0.0` - exclusive upper bound
//! - `>=1.2.0, <=1.9.9` - inclusive upper bound
//! - `1.2.0` - shorthand for `>=1.2.0`
//! - `*` or an empty string - any version
//!
//! # Examples
//!
//! ```
//! use addon_resolver::version::{Version, VersionRange};
//!
//! let range = VersionRange::parse(">=1.2.0, <2.0.0").unwrap();
//! assert!(range.contains(&Version::parse("1.9.3").unwrap()));
//! assert!(!range.contains(&Version::parse("2.0.0").unwrap()));
//!
//! let beta = Version::parse("2.0.0-beta").unwrap();
//! assert!(beta < Version::new(2, 0, 0));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// An immutable add-on or host version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    qualifier: Option<String>,
}

impl Version {
    /// Create a release-grade version with no qualifier.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            qualifier: None,
        }
    }

    /// Return a copy of this version carrying the given qualifier.
    pub fn with_qualifier(&self, qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            ..self.clone()
        }
    }

    /// Parse `MAJOR.MINOR.PATCH` with an optional `-QUALIFIER` suffix.
    ///
    /// Missing, negative or non-numeric components are rejected, as is
    /// build metadata (`+build`).
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(malformed_version(text, "version must not be empty"));
        }

        let parsed =
            semver::Version::parse(trimmed).map_err(|e| malformed_version(text, e.to_string()))?;

        if !parsed.build.is_empty() {
            return Err(malformed_version(text, "build metadata is not supported"));
        }

        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            qualifier: (!parsed.pre.is_empty()).then(|| parsed.pre.as_str().to_string()),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The pre-release qualifier, if any (e.g. `"beta"`).
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Whether this version carries no qualifier.
    pub fn is_release_grade(&self) -> bool {
        self.qualifier.is_none()
    }

    fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

/// Compare two versions. Total and transitive.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple()
            .cmp(&other.triple())
            .then_with(|| match (&self.qualifier, &other.qualifier) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                // Same triple, both qualified: order by text so Ord agrees with Eq.
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref qualifier) = self.qualifier {
            write!(f, "-{qualifier}")?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// The upper end of a [`VersionRange`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpperBound {
    pub version: Version,
    pub inclusive: bool,
}

/// An acceptable span of versions: inclusive lower bound, optional upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    pub(crate) lower: Version,
    pub(crate) upper: Option<UpperBound>,
}

enum Bound {
    Lower(Version),
    Upper(UpperBound),
}

impl VersionRange {
    /// A range admitting every version at or above `0.0.0`.
    pub fn any() -> Self {
        Self::at_least(Version::new(0, 0, 0))
    }

    /// A range with no upper bound.
    pub fn at_least(lower: Version) -> Self {
        Self { lower, upper: None }
    }

    /// A range with both bounds.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedRange` if no version can satisfy the bounds.
    pub fn between(lower: Version, upper: Version, inclusive: bool) -> Result<Self> {
        let range = Self {
            lower,
            upper: Some(UpperBound {
                version: upper,
                inclusive,
            }),
        };
        if range.is_empty() {
            return Err(malformed_range(&range.to_string(), "range admits no version"));
        }
        Ok(range)
    }

    /// Parse a range expression such as `>=1.0.0, <2.0.0`.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::any());
        }

        let mut lower = None;
        let mut upper = None;

        for part in trimmed.split(',').map(str::trim) {
            if part.is_empty() {
                return Err(malformed_range(text, "empty bound"));
            }
            match parse_bound(part).map_err(|reason| malformed_range(text, reason))? {
                Bound::Lower(version) => {
                    if lower.replace(version).is_some() {
                        return Err(malformed_range(text, "more than one lower bound"));
                    }
                }
                Bound::Upper(bound) => {
                    if upper.replace(bound).is_some() {
                        return Err(malformed_range(text, "more than one upper bound"));
                    }
                }
            }
        }

        let range = Self {
            lower: lower.unwrap_or_else(|| Version::new(0, 0, 0)),
            upper,
        };
        if range.is_empty() {
            return Err(malformed_range(text, "range admits no version"));
        }
        Ok(range)
    }

    pub fn lower(&self) -> &Version {
        &self.lower
    }

    pub fn upper(&self) -> Option<&UpperBound> {
        self.upper.as_ref()
    }

    /// Whether `version` falls inside this range.
    pub fn contains(&self, version: &Version) -> bool {
        if version < &self.lower {
            return false;
        }
        match self.upper {
            None => true,
            Some(UpperBound {
                version: ref upper,
                inclusive: true,
            }) => version <= upper,
            Some(UpperBound {
                version: ref upper,
                inclusive: false,
            }) => version < upper,
        }
    }

    fn is_empty(&self) -> bool {
        match self.upper {
            None => false,
            Some(ref bound) => match bound.version.cmp(&self.lower) {
                Ordering::Less => true,
                Ordering::Equal => !bound.inclusive,
                Ordering::Greater => false,
            },
        }
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">={}", self.lower)?;
        match self.upper {
            Some(UpperBound {
                ref version,
                inclusive: true,
            }) => write!(f, ", <={version}"),
            Some(UpperBound {
                ref version,
                inclusive: false,
            }) => write!(f, ", <{version}"),
            None => Ok(()),
        }
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a single bound like `>=1.2.0` or `<2.0.0`.
fn parse_bound(s: &str) -> std::result::Result<Bound, String> {
    let (kind, version_str) = if let Some(rest) = s.strip_prefix(">=") {
        (None, rest)
    } else if let Some(rest) = s.strip_prefix("<=") {
        (Some(true), rest)
    } else if let Some(rest) = s.strip_prefix('<') {
        (Some(false), rest)
    } else if s.starts_with(['>', '=', '!', '~', '^']) {
        return Err(format!("unsupported operator in '{s}'"));
    } else {
        // Bare version implies >=
        (None, s)
    };

    let version = Version::parse(version_str).map_err(|e| match e {
        Error::MalformedVersion { reason, .. } => {
            format!("invalid version '{}': {reason}", version_str.trim())
        }
        other => other.to_string(),
    })?;

    Ok(match kind {
        None => Bound::Lower(version),
        Some(inclusive) => Bound::Upper(UpperBound { version, inclusive }),
    })
}

fn malformed_version(text: &str, reason: impl Into<String>) -> Error {
    Error::MalformedVersion {
        text: text.to_string(),
        reason: reason.into(),
    }
}

fn malformed_range(text: &str, reason: impl Into<String>) -> Error {
    Error::MalformedRange {
        text: text.to_string(),
        reason: reason.into(),
    }
}
