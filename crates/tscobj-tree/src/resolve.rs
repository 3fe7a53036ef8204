//! Object-path resolution against the setup tree.
//!
//! Each segment looks up both the scalar (the content-object type) and the
//! children of the current level. A segment that yields neither stops the
//! walk. The result is the type at the last segment together with whatever
//! configuration sits below it, which the renderer consumes on its own.

use crate::path::ObjectPath;
use crate::tree::{is_truthy, ConfigTree};
use serde::Serialize;
use thiserror::Error;

static EMPTY_TREE: ConfigTree = ConfigTree::new();

/// A segment of the path names nothing in the setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no setup entry for segment `{segment}` at position {index}")]
pub struct PathNotFound {
    /// Offending segment.
    pub segment: String,
    /// Zero-based position of the segment in the path.
    pub index: usize,
}

/// Content-object type and configuration found at the end of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPath<'a> {
    /// Type at the last segment; `None` for the empty path or when the
    /// last segment carries only configuration.
    pub content_type: Option<&'a str>,
    /// Configuration below the last segment.
    pub config: &'a ConfigTree,
}

impl<'a> ResolvedPath<'a> {
    pub fn content_type(&self) -> Option<&'a str> {
        self.content_type
    }
}

/// Walk `path` through `tree`.
///
/// An empty path resolves to no type and the whole tree. A segment is found
/// when its scalar is truthy or it has configuration below it; `""`, `"0"`
/// (also `false` and `0` in the source document) and empty child tables do
/// not count. A falsy non-empty scalar on a found segment is still reported
/// as its type.
pub fn resolve<'a>(
    tree: &'a ConfigTree,
    path: &ObjectPath,
) -> Result<ResolvedPath<'a>, PathNotFound> {
    let mut current = tree;
    let mut content_type = None;

    for (index, segment) in path.iter().enumerate() {
        let node = current.get(segment);
        content_type = node.and_then(|n| n.non_empty_value());
        current = node
            .and_then(|n| n.children.as_ref())
            .unwrap_or(&EMPTY_TREE);

        if !content_type.is_some_and(is_truthy) && current.is_empty() {
            return Err(PathNotFound {
                segment: segment.to_string(),
                index,
            });
        }
    }

    Ok(ResolvedPath {
        content_type,
        config: current,
    })
}
