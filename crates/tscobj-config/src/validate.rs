//! Settings validation errors and semantic validation.

use thiserror::Error;

use crate::settings::Settings;
use crate::CONFIG_SCHEMA_VERSION;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid content object type '{name}' in {field}")]
    InvalidTypeName { field: String, name: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
            ValidationError::InvalidTypeName { .. } => 67,
        }
    }
}

/// Whether `name` looks like a content-object type identifier (`TEXT`, `COA_INT`).
pub fn is_valid_type_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    if settings.default_language.trim().is_empty() {
        return Err(ValidationError::MissingField("default_language".to_string()));
    }

    validate_type_names("registry.extra_types", &settings.registry.extra_types)?;
    validate_type_names("registry.disabled_types", &settings.registry.disabled_types)?;

    for (language, messages) in &settings.messages {
        if language.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "messages".to_string(),
                message: "Language code must not be empty".to_string(),
            });
        }
        if messages.keys().any(|key| key.trim().is_empty()) {
            return Err(ValidationError::InvalidValue {
                field: format!("messages.{}", language),
                message: "Message key must not be empty".to_string(),
            });
        }
    }

    if let Some(setup) = &settings.setup {
        if setup.as_os_str().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "setup".to_string(),
                message: "Setup path must not be empty".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_type_names(field: &str, names: &[String]) -> ValidationResult<()> {
    match names.iter().find(|name| !is_valid_type_name(name)) {
        Some(name) => Err(ValidationError::InvalidTypeName {
            field: field.to_string(),
            name: name.clone(),
        }),
        None => Ok(()),
    }
}
