//! Registry of content-object types the plugin is allowed to render.

use std::collections::btree_set::{self, BTreeSet};
use tscobj_config::RegistrySettings;

/// Standard content objects of the host.
pub const DEFAULT_CONTENT_OBJECTS: &[&str] = &[
    "CASE",
    "COA",
    "COA_INT",
    "CONTENT",
    "EDITPANEL",
    "FILES",
    "FLUIDTEMPLATE",
    "HMENU",
    "IMAGE",
    "IMG_RESOURCE",
    "LOAD_REGISTER",
    "RECORDS",
    "RESTORE_REGISTER",
    "SVG",
    "TEXT",
    "USER",
    "USER_INT",
];

/// Whitelist of content-object type identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentObjectRegistry {
    types: BTreeSet<String>,
}

impl Default for ContentObjectRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ContentObjectRegistry {
    /// Registry holding the host's standard content objects.
    pub fn with_defaults() -> Self {
        DEFAULT_CONTENT_OBJECTS.iter().copied().collect()
    }

    /// Registry that accepts nothing.
    pub fn empty() -> Self {
        Self {
            types: BTreeSet::new(),
        }
    }

    /// Default registry adjusted by the settings file.
    ///
    /// Disabled types win over extra types.
    pub fn from_settings(settings: &RegistrySettings) -> Self {
        let mut registry = Self::with_defaults();
        for name in &settings.extra_types {
            registry.register(name.as_str());
        }
        for name in &settings.disabled_types {
            registry.unregister(name);
        }
        registry
    }

    /// Add a type. Returns false if it was already registered.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        self.types.insert(name.into())
    }

    /// Remove a type. Returns false if it was not registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.types.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Registered types in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ContentObjectRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ContentObjectRegistry {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}
