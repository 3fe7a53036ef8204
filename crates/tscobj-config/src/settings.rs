//! Plugin settings (`settings.toml`).
//!
//! ```toml
//! schema_version = "1.0.0"
//! default_language = "default"
//! setup = "setup.json"
//!
//! [registry]
//! extra_types = ["MY_OBJECT"]
//! disabled_types = ["USER_INT"]
//!
//! [output]
//! htmlspecialchars = false
//!
//! [messages.de]
//! "errors.notfound" = "Objekt nicht gefunden"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::resolve::{resolve_settings_path, ConfigSource};
use crate::validate::validate_settings;
use crate::CONFIG_SCHEMA_VERSION;

/// Language key used when no language is requested.
pub const DEFAULT_LANGUAGE: &str = "default";

/// Adjustments to the content-object type registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Types added on top of the built-in set.
    #[serde(default)]
    pub extra_types: Vec<String>,
    /// Built-in types to withdraw.
    #[serde(default)]
    pub disabled_types: Vec<String>,
}

/// Output post-processing defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Escape rendered output when the form does not say otherwise.
    #[serde(default)]
    pub htmlspecialchars: bool,
}

/// Top-level settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Language used for messages when none is requested.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Setup tree to render from (relative paths are taken from the settings file's directory).
    #[serde(default)]
    pub setup: Option<PathBuf>,

    #[serde(default)]
    pub registry: RegistrySettings,

    #[serde(default)]
    pub output: OutputSettings,

    /// Message overrides, keyed by language then message key.
    #[serde(default)]
    pub messages: BTreeMap<String, BTreeMap<String, String>>,
}

fn default_schema_version() -> String {
    CONFIG_SCHEMA_VERSION.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_language: default_language(),
            setup: None,
            registry: RegistrySettings::default(),
            output: OutputSettings::default(),
            messages: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string (no semantic validation).
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a settings file (no semantic validation).
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }
}

/// Settings together with where they came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// File the settings were read from (None for built-in defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

impl LoadedSettings {
    /// Setup path from the settings, anchored at the settings file's directory.
    pub fn setup_path(&self) -> Option<PathBuf> {
        let setup = self.settings.setup.as_ref()?;
        if setup.is_absolute() {
            return Some(setup.clone());
        }
        let base = self.path.as_deref().and_then(Path::parent);
        Some(match base {
            Some(dir) => dir.join(setup),
            None => setup.clone(),
        })
    }
}

/// Load and validate settings using the standard resolution order.
pub fn load_settings(cli_path: Option<&Path>) -> Result<LoadedSettings> {
    let resolved = resolve_settings_path(cli_path);

    let Some(path) = resolved.path else {
        return Ok(LoadedSettings::default());
    };

    let settings = Settings::from_file(&path)?;
    validate_settings(&settings)?;

    Ok(LoadedSettings {
        settings,
        path: Some(path),
        source: resolved.source,
    })
}
