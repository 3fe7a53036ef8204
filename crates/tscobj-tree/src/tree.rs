//! Hierarchical setup tree.
//!
//! The host serializes its setup as nested tables using a double-entry
//! convention: the bare key `k` holds a scalar (usually a content-object
//! type such as `TEXT`), and the suffixed key `k.` holds the nested
//! configuration for that key:
//!
//! ```json
//! { "page": "TEXT", "page.": { "value": "hi" } }
//! ```
//!
//! In memory both entries are folded into a single [`Node`].

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Suffix that marks the children entry of a key in the serialized form.
pub const CHILDREN_SUFFIX: char = '.';

/// Host truthiness for setup and form strings: empty and `"0"` are false.
pub fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

/// A single key of the setup tree: an optional scalar plus optional children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Scalar stored under the bare key.
    pub value: Option<String>,
    /// Nested tree stored under the dotted key.
    pub children: Option<ConfigTree>,
}

impl Node {
    /// Node carrying only a scalar.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            children: None,
        }
    }

    /// Node carrying only children.
    pub fn branch(children: ConfigTree) -> Self {
        Self {
            value: None,
            children: Some(children),
        }
    }

    /// Scalar as a string slice, treating the empty string as absent.
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }

    /// Children, treating an empty table as absent.
    pub fn non_empty_children(&self) -> Option<&ConfigTree> {
        self.children.as_ref().filter(|c| !c.is_empty())
    }

    /// True when the scalar is falsy and there are no children.
    pub fn is_void(&self) -> bool {
        !self.value.as_deref().is_some_and(is_truthy) && self.non_empty_children().is_none()
    }
}

/// The host's merged setup, read-only from the plugin's point of view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    nodes: BTreeMap<String, Node>,
}

impl ConfigTree {
    /// Create an empty tree.
    pub const fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of keys at this level.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Scalar stored under `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.nodes.get(key).and_then(|n| n.value.as_deref())
    }

    /// Children stored under `key.`.
    pub fn children(&self, key: &str) -> Option<&ConfigTree> {
        self.nodes.get(key).and_then(|n| n.children.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Iterate over keys at this level in sorted order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Node> {
        self.nodes.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Insert or replace a whole node.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.nodes.insert(key.into(), node)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.nodes.remove(key)
    }

    /// Set the scalar at a dotted path, creating intermediate children.
    ///
    /// `set("lib.foo", "TEXT")` is the in-memory equivalent of
    /// `{"lib.": {"foo": "TEXT"}}`.
    pub fn set(&mut self, path: &str, value: impl Into<String>) {
        let (tree, last) = self.branch_for(path);
        tree.entry(last).value = Some(value.into());
    }

    /// Attach a subtree at a dotted path, creating intermediate children.
    pub fn set_children(&mut self, path: &str, children: ConfigTree) {
        let (tree, last) = self.branch_for(path);
        tree.entry(last).children = Some(children);
    }

    fn branch_for<'p>(&mut self, path: &'p str) -> (&mut ConfigTree, &'p str) {
        let (parents, last) = match path.rsplit_once(CHILDREN_SUFFIX) {
            Some((parents, last)) => (Some(parents), last),
            None => (None, path),
        };
        let mut tree = self;
        if let Some(parents) = parents {
            for segment in parents.split(CHILDREN_SUFFIX) {
                tree = tree
                    .entry(segment)
                    .children
                    .get_or_insert_with(ConfigTree::new);
            }
        }
        (tree, last)
    }

    fn entry(&mut self, key: &str) -> &mut Node {
        self.nodes.entry(key.to_string()).or_default()
    }
}

impl<'a> IntoIterator for &'a ConfigTree {
    type Item = (&'a String, &'a Node);
    type IntoIter = btree_map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<(String, Node)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self
            .nodes
            .values()
            .map(|n| usize::from(n.value.is_some()) + usize::from(n.children.is_some()))
            .sum();
        let mut map = serializer.serialize_map(Some(entries))?;
        for (key, node) in &self.nodes {
            if let Some(value) = &node.value {
                map.serialize_entry(key, value)?;
            }
            if let Some(children) = &node.children {
                map.serialize_entry(&format!("{key}{CHILDREN_SUFFIX}"), children)?;
            }
        }
        map.end()
    }
}

/// Scalar shapes accepted under a bare key.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Table(IgnoredAny),
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TreeVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = ConfigTree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a setup table")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut tree = ConfigTree::new();
        while let Some(key) = access.next_key::<String>()? {
            if let Some(name) = key.strip_suffix(CHILDREN_SUFFIX) {
                if let Some(children) = access.next_value::<Option<ConfigTree>>()? {
                    tree.entry(name).children = Some(children);
                }
                continue;
            }

            let value = match access.next_value::<Option<Scalar>>()? {
                None => continue,
                Some(Scalar::Bool(b)) => String::from(if b { "1" } else { "0" }),
                Some(Scalar::Int(i)) => i.to_string(),
                Some(Scalar::UInt(u)) => u.to_string(),
                Some(Scalar::Float(f)) => f.to_string(),
                Some(Scalar::Text(s)) => s,
                Some(Scalar::Table(_)) => {
                    return Err(de::Error::custom(format!(
                        "key `{key}` holds a table; nested configuration belongs under `{key}{CHILDREN_SUFFIX}`"
                    )));
                }
            };
            tree.entry(&key).value = Some(value);
        }
        Ok(tree)
    }
}
