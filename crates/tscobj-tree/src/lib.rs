//! Setup tree and object-path resolution for tscobj.
//!
//! This crate provides:
//! - [`ConfigTree`], the host's hierarchical setup as a tagged node tree
//! - [`ObjectPath`], a dotted path into that tree
//! - [`resolve`], which walks a path to a content-object type and its configuration
//!
//! # Example
//!
//! ```
//! use tscobj_tree::{resolve, ConfigTree, ObjectPath};
//!
//! let mut setup = ConfigTree::new();
//! setup.set("page", "TEXT");
//! setup.set("page.value", "hi");
//!
//! let resolved = resolve(&setup, &ObjectPath::parse("page")).unwrap();
//! assert_eq!(resolved.content_type(), Some("TEXT"));
//! assert_eq!(resolved.config.value("value"), Some("hi"));
//! ```

pub mod path;
pub mod resolve;
pub mod tree;

pub use path::ObjectPath;
pub use resolve::{resolve, PathNotFound, ResolvedPath};
pub use tree::{is_truthy, ConfigTree, Node};
