//! Error types for settings and setup loading.

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::ValidationError;

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading settings or a setup tree.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File named explicitly does not exist
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// JSON parse error
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Setup file with an extension we cannot read
    #[error("unsupported setup format for {path} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },

    /// Settings parsed but failed semantic validation
    #[error("settings validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// True for errors caused by reading the filesystem rather than content.
    pub fn is_io(&self) -> bool {
        matches!(self, ConfigError::Io { .. } | ConfigError::NotFound { .. })
    }
}
