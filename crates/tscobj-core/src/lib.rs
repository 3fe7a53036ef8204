//! tscobj core library.
//!
//! Renders a content object picked by a dotted path into the host setup:
//! - Form-value extraction (`object`, `htmlspecialchars`)
//! - Object-path resolution and content-object type checks
//! - Delegation to a host renderer, plus a small built-in one
//! - Localized error messages and HTML escaping of the result
//! - Structured logging and CLI exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod controller;
pub mod escape;
pub mod exit_codes;
pub mod form;
pub mod l10n;
pub mod logging;
pub mod registry;
pub mod render;

pub use controller::{format_error, ControllerError, ObjectController, RenderContext};
pub use exit_codes::ExitCode;
pub use form::{FlexForm, FormValues};
pub use l10n::{Localizer, MessageCatalog};
pub use registry::ContentObjectRegistry;
pub use render::{BuiltinRenderer, ContentRenderer};
pub use tscobj_tree::{ConfigTree, ObjectPath};
