//! Plugin controller: form values in, rendered content (or error text) out.
//!
//! The controller never fails at its boundary. Unknown paths and
//! unregistered types are turned into localized error markup, an empty
//! `object` field renders nothing.

use thiserror::Error;
use tscobj_tree::{resolve, ConfigTree, ObjectPath};

use crate::escape::{escape_rendered, html_escape};
use crate::form::{is_truthy, FormValues};
use crate::l10n::{Localizer, ERRORS_INVALID, ERRORS_NOT_FOUND};
use crate::logging::{event_names, LogContext, Stage};
use crate::registry::ContentObjectRegistry;
use crate::render::ContentRenderer;

/// Form field holding the dotted object path.
pub const FIELD_OBJECT: &str = "object";
/// Form field switching on escaping of the rendered output.
pub const FIELD_HTMLSPECIALCHARS: &str = "htmlspecialchars";

static DETACHED_LOG: LogContext = LogContext::detached();

/// Host collaborators for one render call.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Setup snapshot to resolve against.
    pub setup: &'a ConfigTree,
    pub registry: &'a ContentObjectRegistry,
    pub renderer: &'a dyn ContentRenderer,
    pub localizer: &'a dyn Localizer,
    /// Run context stamped on controller events.
    pub log: &'a LogContext,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        setup: &'a ConfigTree,
        registry: &'a ContentObjectRegistry,
        renderer: &'a dyn ContentRenderer,
        localizer: &'a dyn Localizer,
    ) -> Self {
        Self {
            setup,
            registry,
            renderer,
            localizer,
            log: &DETACHED_LOG,
        }
    }

    /// Stamp controller events with the caller's run id and object path.
    pub fn with_log_context(mut self, log: &'a LogContext) -> Self {
        self.log = log;
        self
    }
}

/// Why a path could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("object path `{path}` not found (segment `{segment}`)")]
    PathNotFound { path: String, segment: String },

    #[error("`{content_type}` is not a registered content object type")]
    UnsupportedType { content_type: String },
}

impl ControllerError {
    /// Localization key of the user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            ControllerError::PathNotFound { .. } => ERRORS_NOT_FOUND,
            ControllerError::UnsupportedType { .. } => ERRORS_INVALID,
        }
    }

    /// Identifier shown next to the message: the path or the type name.
    pub fn identifier(&self) -> &str {
        match self {
            ControllerError::PathNotFound { path, .. } => path,
            ControllerError::UnsupportedType { content_type } => content_type,
        }
    }
}

/// Renders the content object named by the form's `object` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectController {
    escape_by_default: bool,
}

impl ObjectController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escape output when the form does not carry the `htmlspecialchars` field.
    pub fn with_escape_default(mut self, escape: bool) -> Self {
        self.escape_by_default = escape;
        self
    }

    /// Render for the given form.
    ///
    /// Returns `""` when the form names no object, error markup when the
    /// object cannot be rendered, and the (optionally escaped) rendered
    /// content otherwise.
    pub fn main(&self, form: &dyn FormValues, ctx: &RenderContext<'_>) -> String {
        self.render(form, ctx)
            .unwrap_or_else(|err| format_error(&err, ctx.localizer))
    }

    /// Like [`main`](Self::main), but hands errors back instead of
    /// formatting them.
    pub fn render(
        &self,
        form: &dyn FormValues,
        ctx: &RenderContext<'_>,
    ) -> Result<String, ControllerError> {
        let path = match form.value(FIELD_OBJECT) {
            Some(path) if is_truthy(&path) => path,
            _ => {
                crate::log_event!(
                    ctx.log,
                    DEBUG,
                    event_names::RESOLVE_EMPTY_PATH,
                    Stage::Resolve,
                    "no object path given"
                );
                return Ok(String::new());
            }
        };

        let content = self.render_path(&path, ctx)?;

        let escape = form
            .value(FIELD_HTMLSPECIALCHARS)
            .map_or(self.escape_by_default, |flag| is_truthy(&flag));
        if escape {
            crate::log_event!(
                ctx.log,
                DEBUG,
                event_names::OUTPUT_ESCAPED,
                Stage::Output,
                "escaping output",
                bytes = content.len()
            );
            Ok(escape_rendered(&content))
        } else {
            Ok(content)
        }
    }

    /// Resolve, check and render `path` without formatting errors.
    pub fn render_path(
        &self,
        path: &str,
        ctx: &RenderContext<'_>,
    ) -> Result<String, ControllerError> {
        let object_path = ObjectPath::parse(path);
        let resolved = resolve(ctx.setup, &object_path).map_err(|err| {
            crate::log_event!(
                ctx.log,
                DEBUG,
                event_names::RESOLVE_NOT_FOUND,
                Stage::Resolve,
                "object path not found",
                path = path,
                segment = err.segment.as_str(),
                index = err.index
            );
            ControllerError::PathNotFound {
                path: path.to_string(),
                segment: err.segment,
            }
        })?;

        let content_type = resolved.content_type().unwrap_or_default();
        crate::log_event!(
            ctx.log,
            DEBUG,
            event_names::RESOLVE_FINISHED,
            Stage::Resolve,
            "object path resolved",
            path = path,
            content_type = content_type,
            config_keys = resolved.config.len()
        );

        if !ctx.registry.contains(content_type) {
            crate::log_event!(
                ctx.log,
                WARN,
                event_names::VALIDATE_REJECTED,
                Stage::Validate,
                "content object type not registered",
                path = path,
                content_type = content_type
            );
            return Err(ControllerError::UnsupportedType {
                content_type: content_type.to_string(),
            });
        }

        let content = ctx.renderer.render(content_type, resolved.config);
        crate::log_event!(
            ctx.log,
            DEBUG,
            event_names::RENDER_FINISHED,
            Stage::Render,
            "content object rendered",
            content_type = content_type,
            bytes = content.len()
        );
        Ok(content)
    }
}

/// User-facing error markup: `<strong>{message}</strong> ({identifier})`.
pub fn format_error(err: &ControllerError, localizer: &dyn Localizer) -> String {
    format!(
        "<strong>{}</strong> ({})",
        localizer.label(err.message_key()),
        html_escape(err.identifier())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::l10n::MessageCatalog;
    use crate::render::BuiltinRenderer;
    use std::collections::BTreeMap;

    fn setup() -> ConfigTree {
        serde_json::from_str(
            r#"{
                "page": "TEXT",
                "page.": {"value": "hi"},
                "lib.": {
                    "multi": "TEXT",
                    "multi.": {"value": "a <b>\nc"},
                    "custom": "MY_OBJECT",
                    "folder.": {"x": "1"}
                }
            }"#,
        )
        .unwrap()
    }

    fn form(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn run(form: &BTreeMap<String, String>) -> String {
        let tree = setup();
        let registry = ContentObjectRegistry::with_defaults();
        let catalog = MessageCatalog::new();
        let ctx = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog);
        ObjectController::new().main(form, &ctx)
    }

    #[test]
    fn test_renders_object() {
        assert_eq!(run(&form(&[("object", "page")])), "hi");
    }

    #[test]
    fn test_empty_and_zero_path_render_nothing() {
        assert_eq!(run(&form(&[])), "");
        assert_eq!(run(&form(&[("object", "")])), "");
        assert_eq!(run(&form(&[("object", "0")])), "");
    }

    #[test]
    fn test_not_found_markup_carries_path() {
        assert_eq!(
            run(&form(&[("object", "lib.missing")])),
            "<strong>Object not found</strong> (lib.missing)"
        );
    }

    #[test]
    fn test_invalid_type_markup_carries_type() {
        assert_eq!(
            run(&form(&[("object", "lib.custom")])),
            "<strong>Invalid content object type</strong> (MY_OBJECT)"
        );
    }

    #[test]
    fn test_path_without_type_is_invalid() {
        assert_eq!(
            run(&form(&[("object", "lib.folder")])),
            "<strong>Invalid content object type</strong> ()"
        );
    }

    #[test]
    fn test_escaping_flag() {
        assert_eq!(
            run(&form(&[("object", "lib.multi"), ("htmlspecialchars", "1")])),
            "a &lt;b&gt;<br />\nc"
        );
        assert_eq!(
            run(&form(&[("object", "lib.multi"), ("htmlspecialchars", "0")])),
            "a <b>\nc"
        );
    }

    #[test]
    fn test_escaping_does_not_touch_error_markup() {
        assert_eq!(
            run(&form(&[("object", "nope"), ("htmlspecialchars", "1")])),
            "<strong>Object not found</strong> (nope)"
        );
    }

    #[test]
    fn test_escape_default_applies_only_without_field() {
        let tree = setup();
        let registry = ContentObjectRegistry::with_defaults();
        let catalog = MessageCatalog::new();
        let ctx = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog);
        let controller = ObjectController::new().with_escape_default(true);

        let escaped = controller.main(&form(&[("object", "lib.multi")]), &ctx);
        assert_eq!(escaped, "a &lt;b&gt;<br />\nc");

        let raw = controller.main(
            &form(&[("object", "lib.multi"), ("htmlspecialchars", "")]),
            &ctx,
        );
        assert_eq!(raw, "a <b>\nc");
    }

    #[test]
    fn test_render_keeps_typed_outcome() {
        let tree = setup();
        let registry = ContentObjectRegistry::with_defaults();
        let catalog = MessageCatalog::new();
        let ctx = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog);
        let controller = ObjectController::new();

        assert_eq!(controller.render(&form(&[]), &ctx), Ok(String::new()));
        assert_eq!(
            controller.render(&form(&[("object", "page")]), &ctx),
            Ok("hi".to_string())
        );
        assert!(matches!(
            controller.render(&form(&[("object", "lib.custom")]), &ctx),
            Err(ControllerError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_falsy_type_with_config_is_invalid() {
        let tree: ConfigTree =
            serde_json::from_str(r#"{"off": 0, "off.": {"value": "x"}, "bare": false}"#).unwrap();
        let registry = ContentObjectRegistry::with_defaults();
        let catalog = MessageCatalog::new();
        let ctx = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog);
        let controller = ObjectController::new();

        assert_eq!(
            controller.main(&form(&[("object", "off")]), &ctx),
            "<strong>Invalid content object type</strong> (0)"
        );
        assert_eq!(
            controller.main(&form(&[("object", "bare")]), &ctx),
            "<strong>Object not found</strong> (bare)"
        );
    }

    #[test]
    fn test_log_context_is_carried() {
        let tree = setup();
        let registry = ContentObjectRegistry::with_defaults();
        let catalog = MessageCatalog::new();
        let log = LogContext::new("run-abc").with_object_path("page");
        let ctx = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog)
            .with_log_context(&log);
        assert_eq!(ctx.log.run_id, "run-abc");
        assert_eq!(ObjectController::new().main(&form(&[("object", "page")]), &ctx), "hi");

        let detached = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog);
        assert!(detached.log.run_id.is_empty());
        assert_eq!(detached.log.object_path, None);
    }

    #[test]
    fn test_identifier_is_escaped_in_markup() {
        let err = ControllerError::PathNotFound {
            path: "<script>".to_string(),
            segment: "<script>".to_string(),
        };
        assert_eq!(
            format_error(&err, &MessageCatalog::new()),
            "<strong>Object not found</strong> (&lt;script&gt;)"
        );
    }

    #[test]
    fn test_render_path_errors() {
        let tree = setup();
        let registry = ContentObjectRegistry::with_defaults();
        let catalog = MessageCatalog::new();
        let ctx = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog);
        let controller = ObjectController::new();

        assert_eq!(
            controller.render_path("lib.nothing.here", &ctx),
            Err(ControllerError::PathNotFound {
                path: "lib.nothing.here".to_string(),
                segment: "nothing".to_string(),
            })
        );
        let err = controller.render_path("lib.custom", &ctx).unwrap_err();
        assert_eq!(err.message_key(), ERRORS_INVALID);
        assert_eq!(err.identifier(), "MY_OBJECT");
    }

    #[test]
    fn test_host_renderer_receives_type_and_config() {
        let tree = setup();
        let registry = ContentObjectRegistry::with_defaults();
        let catalog = MessageCatalog::new();
        let renderer = |content_type: &str, config: &ConfigTree| {
            let keys: Vec<&str> = config.keys().collect();
            format!("{}[{}]", content_type, keys.join(","))
        };
        let ctx = RenderContext::new(&tree, &registry, &renderer, &catalog);
        assert_eq!(
            ObjectController::new().main(&form(&[("object", "page")]), &ctx),
            "TEXT[value]"
        );
    }
}
