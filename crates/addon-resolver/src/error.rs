use std::path::PathBuf;

/// Errors that can occur in the add-on resolver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A version string could not be parsed.
    #[error("malformed version '{text}': {reason}")]
    MalformedVersion { text: String, reason: String },

    /// A version range expression could not be parsed.
    #[error("malformed version range '{text}': {reason}")]
    MalformedRange { text: String, reason: String },

    /// An unrecognized lifecycle status.
    #[error("unknown lifecycle status '{0}' (expected release, beta or alpha)")]
    UnknownStatus(String),

    /// Two manifests claim the same identifier.
    #[error("duplicate add-on identifier '{0}'")]
    DuplicateIdentifier(String),

    /// Failed to parse a manifest or configuration file.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to parse a manifest from an in-memory string.
    #[error("failed to parse add-on manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// Failed to serialize a manifest.
    #[error("failed to serialize add-on manifest: {0}")]
    ManifestSerialize(String),

    /// Manifest file not found at the expected path.
    #[error("add-on manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// Failed to parse resolver configuration from an in-memory string.
    #[error("failed to parse resolver configuration: {0}")]
    ConfigParse(toml::de::Error),

    /// Configuration file not found.
    #[error("resolver configuration not found: {0}")]
    ConfigNotFound(PathBuf),

    /// I/O error reading manifest or configuration files.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
