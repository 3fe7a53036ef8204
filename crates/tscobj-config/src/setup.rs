//! Loading the host setup tree from disk.

use std::path::Path;

use tscobj_tree::ConfigTree;

use crate::error::{ConfigError, Result};

/// Serialized forms a setup file may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFormat {
    Json,
    Toml,
}

impl SetupFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
            "json" => Some(SetupFormat::Json),
            "toml" | "tml" => Some(SetupFormat::Toml),
            _ => None,
        }
    }

    /// Parse setup content in this format.
    pub fn parse(self, content: &str, path: &Path) -> Result<ConfigTree> {
        match self {
            SetupFormat::Json => serde_json::from_str(content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }),
            SetupFormat::Toml => toml::from_str(content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Read a setup tree from a `.json` or `.toml` file.
pub fn load_setup(path: &Path) -> Result<ConfigTree> {
    let format = SetupFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    format.parse(&content, path)
}
