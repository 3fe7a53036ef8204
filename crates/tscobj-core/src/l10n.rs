//! Localized labels for the two user-facing error messages.

use std::collections::BTreeMap;
use tscobj_config::settings::DEFAULT_LANGUAGE;
use tscobj_config::Settings;

/// Label shown when the object path names nothing in the setup.
pub const ERRORS_NOT_FOUND: &str = "errors.notfound";
/// Label shown when the resolved type is not a registered content object.
pub const ERRORS_INVALID: &str = "errors.invalid";

const BUILTIN_MESSAGES: &[(&str, &str)] = &[
    (ERRORS_NOT_FOUND, "Object not found"),
    (ERRORS_INVALID, "Invalid content object type"),
];

/// Label lookup supplied by the host.
pub trait Localizer {
    /// Label for `key`, or `None` if no catalog has it.
    fn translate(&self, key: &str) -> Option<String>;

    /// Label for `key`, falling back to the key itself.
    fn label(&self, key: &str) -> String {
        self.translate(key).unwrap_or_else(|| key.to_string())
    }
}

/// In-memory catalog keyed by language then message key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    language: String,
    messages: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let builtin = BUILTIN_MESSAGES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            messages: BTreeMap::from([(DEFAULT_LANGUAGE.to_string(), builtin)]),
        }
    }
}

impl MessageCatalog {
    /// Catalog with the built-in English labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in labels plus the overrides from settings.
    ///
    /// `language` overrides the settings' default language.
    pub fn from_settings(settings: &Settings, language: Option<&str>) -> Self {
        let mut catalog = Self::new();
        for (lang, messages) in &settings.messages {
            catalog.merge(lang, messages.clone());
        }
        catalog.language = language.unwrap_or(&settings.default_language).to_string();
        catalog
    }

    /// Switch the active language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Add or replace labels for one language.
    pub fn merge(&mut self, language: &str, messages: BTreeMap<String, String>) {
        self.messages
            .entry(language.to_string())
            .or_default()
            .extend(messages);
    }

    /// Add or replace a single label.
    pub fn insert(&mut self, language: &str, key: impl Into<String>, label: impl Into<String>) {
        self.messages
            .entry(language.to_string())
            .or_default()
            .insert(key.into(), label.into());
    }
}

impl Localizer for MessageCatalog {
    fn translate(&self, key: &str) -> Option<String> {
        [self.language.as_str(), DEFAULT_LANGUAGE]
            .iter()
            .find_map(|lang| self.messages.get(*lang).and_then(|m| m.get(key)))
            .cloned()
    }
}
