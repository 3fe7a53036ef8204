//! Form-value extraction.
//!
//! The plugin reads two fields from the content element's form: `object`
//! (the dotted path) and `htmlspecialchars` (escape flag). Hosts hand the
//! form over either as a plain key/value map or as the already-parsed
//! flexform structure:
//!
//! ```json
//! { "data": { "sDEF": { "lDEF": {
//!     "object": { "vDEF": "lib.header" },
//!     "htmlspecialchars": { "vDEF": "1" }
//! } } } }
//! ```

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

pub use tscobj_tree::is_truthy;

/// Default sheet, language and value keys of a flexform.
pub const DEFAULT_SHEET: &str = "sDEF";
pub const DEFAULT_LANGUAGE: &str = "lDEF";
pub const DEFAULT_VALUE_KEY: &str = "vDEF";

/// Separator for nested field names (`section/0/field`).
pub const FIELD_SEPARATOR: char = '/';

/// Source of form field values.
pub trait FormValues {
    /// Value of `field`, or `None` when the form does not carry it.
    fn value(&self, field: &str) -> Option<String>;
}

impl FormValues for BTreeMap<String, String> {
    fn value(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

impl FormValues for HashMap<String, String> {
    fn value(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

/// Parsed flexform data.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexForm {
    data: Value,
    sheet: String,
    language: String,
    value_key: String,
}

impl FlexForm {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            sheet: DEFAULT_SHEET.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            value_key: DEFAULT_VALUE_KEY.to_string(),
        }
    }

    /// Parse flexform data from JSON text.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(Self::new)
    }

    /// Read values from another sheet.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// Read values for another language key.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Read another value key.
    pub fn with_value_key(mut self, value_key: impl Into<String>) -> Self {
        self.value_key = value_key.into();
        self
    }

    /// Look up `field` in an explicit sheet/language/value slot.
    ///
    /// Field names may be nested with `/`. A numeric segment picks the n-th
    /// entry of the current level in document order; a segment that matches
    /// nothing is skipped and the walk continues from the same level.
    pub fn lookup(
        &self,
        field: &str,
        sheet: &str,
        language: &str,
        value_key: &str,
    ) -> Option<String> {
        let sheet_array = self
            .data
            .get("data")
            .and_then(|d| d.get(sheet))
            .and_then(|s| s.get(language))
            .filter(|l| l.is_object())?;

        let mut current = sheet_array;
        for segment in field.split(FIELD_SEPARATOR) {
            let next = match segment.parse::<usize>() {
                Ok(n) => nth_entry(current, n),
                Err(_) => current.get(segment),
            };
            if let Some(next) = next {
                current = next;
            }
        }

        current.get(value_key).and_then(scalar_to_string)
    }
}

impl FormValues for FlexForm {
    fn value(&self, field: &str) -> Option<String> {
        self.lookup(field, &self.sheet, &self.language, &self.value_key)
    }
}

fn nth_entry(value: &Value, n: usize) -> Option<&Value> {
    match value {
        Value::Object(map) => map.values().nth(n),
        Value::Array(items) => items.get(n),
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
