//! Resolution outcomes: the load order on success, the problem report on
//! failure.

use std::fmt;

use serde::Serialize;

use crate::manifest::ValidationError;
use crate::version::{Version, VersionRange};

/// One problem found while resolving a batch of add-ons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    /// A version string could not be parsed.
    MalformedVersion { text: String },
    /// A manifest field violates a structural rule.
    Validation { identifier: String, reason: String },
    /// Two manifests claim the same identifier.
    DuplicateIdentifier { identifier: String },
    /// The host is outside the add-on's host window.
    HostIncompatible {
        identifier: String,
        required: VersionRange,
        actual: Version,
    },
    /// A dependency names an add-on that is not in the batch.
    MissingDependency { source: String, target: String },
    /// A dependency is present but its version is outside the required range.
    VersionMismatch {
        source: String,
        target: String,
        required: VersionRange,
        actual: Version,
    },
    /// A dependency cycle among otherwise valid edges, in traversal order.
    Cycle { identifiers: Vec<String> },
}

impl Problem {
    /// Identifiers this problem is attributed to.
    ///
    /// The target of a missing or mismatched dependency is not blamed; the
    /// add-on declaring the dependency is.
    pub fn subjects(&self) -> Vec<&str> {
        match self {
            Problem::MalformedVersion { .. } => Vec::new(),
            Problem::Validation { identifier, .. }
            | Problem::DuplicateIdentifier { identifier }
            | Problem::HostIncompatible { identifier, .. } => vec![identifier.as_str()],
            Problem::MissingDependency { source, .. } | Problem::VersionMismatch { source, .. } => {
                vec![source.as_str()]
            }
            Problem::Cycle { identifiers } => identifiers.iter().map(String::as_str).collect(),
        }
    }
}

impl From<ValidationError> for Problem {
    fn from(err: ValidationError) -> Self {
        Problem::Validation {
            identifier: err.identifier,
            reason: err.reason,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::MalformedVersion { text } => write!(f, "malformed version '{text}'"),
            Problem::Validation { identifier, reason } => {
                write!(f, "invalid manifest '{identifier}': {reason}")
            }
            Problem::DuplicateIdentifier { identifier } => {
                write!(f, "duplicate add-on identifier '{identifier}'")
            }
            Problem::HostIncompatible {
                identifier,
                required,
                actual,
            } => write!(
                f,
                "add-on '{identifier}' requires host {required}, but the host is {actual}"
            ),
            Problem::MissingDependency { source, target } => {
                write!(f, "add-on '{source}' depends on '{target}', which is not available")
            }
            Problem::VersionMismatch {
                source,
                target,
                required,
                actual,
            } => write!(
                f,
                "add-on '{source}' requires '{target}' {required}, but found {actual}"
            ),
            Problem::Cycle { identifiers } => {
                write!(f, "dependency cycle: {}", identifiers.join(" -> "))?;
                if let Some(first) = identifiers.first() {
                    write!(f, " -> {first}")?;
                }
                Ok(())
            }
        }
    }
}

/// Every problem found in one resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("add-on resolution failed with {} problem(s)", .problems.len())]
pub struct ResolutionReport {
    /// Distinct problems, in pass order.
    pub problems: Vec<Problem>,
    /// Accepted add-ons no problem is attributed to, ascending.
    pub unaffected: Vec<String>,
}

/// Identifiers in the order they can be loaded: dependencies first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LoadOrder(Vec<String>);

impl LoadOrder {
    pub(crate) fn new(order: Vec<String>) -> Self {
        Self(order)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of `id` in the order, if present.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|entry| entry == id)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a LoadOrder {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Either a complete load order or a report of everything that went wrong.
pub type ResolutionResult = std::result::Result<LoadOrder, ResolutionReport>;
