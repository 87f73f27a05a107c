//! CSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Top-level error type for chunk_sweeper.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("[CSW-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[CSW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[CSW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CSW-2001] host query failure in chunk ({chunk_x}, {chunk_z}): {details}")]
    HostQuery {
        chunk_x: i32,
        chunk_z: i32,
        details: String,
    },

    #[error("[CSW-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[CSW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[CSW-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl SweepError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "CSW-1001",
            Self::MissingConfig { .. } => "CSW-1002",
            Self::ConfigParse { .. } => "CSW-1003",
            Self::HostQuery { .. } => "CSW-2001",
            Self::Serialization { .. } => "CSW-2101",
            Self::Io { .. } => "CSW-3002",
            Self::Runtime { .. } => "CSW-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Host query failures are retryable by policy: the scanner degrades them
    /// to an empty result for the current pass and the next pass tries again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::HostQuery { .. } | Self::Io { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
