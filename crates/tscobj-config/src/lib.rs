//! tscobj settings and setup loading.
//!
//! This crate provides:
//! - Typed settings for the plugin (`settings.toml`)
//! - Settings resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation with stable error codes
//! - Loading the host setup tree from JSON or TOML

pub mod error;
pub mod resolve;
pub mod settings;
pub mod setup;
pub mod validate;

pub use error::{ConfigError, Result};
pub use resolve::{resolve_settings_path, ConfigSource, SettingsPath};
pub use settings::{load_settings, LoadedSettings, OutputSettings, RegistrySettings, Settings};
pub use setup::{load_setup, SetupFormat};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for settings files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
