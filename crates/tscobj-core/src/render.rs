//! Content renderers.
//!
//! The host normally supplies its own renderer; [`BuiltinRenderer`] covers
//! the handful of content objects needed to use the plugin standalone.

use tscobj_tree::ConfigTree;

static EMPTY_CONFIG: ConfigTree = ConfigTree::new();

/// Separator between the before and after parts of a `wrap` value.
pub const WRAP_SPLIT: char = '|';

/// Renders a content object of a given type with its configuration.
pub trait ContentRenderer {
    fn render(&self, content_type: &str, config: &ConfigTree) -> String;
}

impl<F> ContentRenderer for F
where
    F: Fn(&str, &ConfigTree) -> String,
{
    fn render(&self, content_type: &str, config: &ConfigTree) -> String {
        self(content_type, config)
    }
}

/// Minimal renderer for `TEXT` and `COA`/`COA_INT`.
///
/// - `TEXT` outputs its `value`.
/// - `COA`/`COA_INT` render their numeric children in ascending order; each
///   child's scalar is its type and its children are its configuration.
/// - Every object honours `wrap = "before|after"`.
///
/// Any other type renders as the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRenderer;

impl BuiltinRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Types this renderer produces output for.
    pub fn supported_types() -> &'static [&'static str] {
        &["COA", "COA_INT", "TEXT"]
    }

    fn render_array(&self, config: &ConfigTree) -> String {
        let mut entries: Vec<(i64, &str, &ConfigTree)> = config
            .iter()
            .filter_map(|(key, node)| {
                let position = key.parse::<i64>().ok()?;
                let content_type = node.non_empty_value()?;
                let child = node.children.as_ref().unwrap_or(&EMPTY_CONFIG);
                Some((position, content_type, child))
            })
            .collect();
        entries.sort_by_key(|(position, _, _)| *position);

        entries
            .into_iter()
            .map(|(_, content_type, child)| self.render(content_type, child))
            .collect()
    }
}

impl ContentRenderer for BuiltinRenderer {
    fn render(&self, content_type: &str, config: &ConfigTree) -> String {
        let content = match content_type {
            "TEXT" => config.value("value").unwrap_or_default().to_string(),
            "COA" | "COA_INT" => self.render_array(config),
            other => {
                tracing::warn!(content_type = other, "no built-in renderer for content object");
                return String::new();
            }
        };

        match config.value("wrap") {
            Some(wrap) => apply_wrap(&content, wrap),
            None => content,
        }
    }
}

/// Surround `content` with the trimmed halves of a `before|after` wrap.
pub fn apply_wrap(content: &str, wrap: &str) -> String {
    let (before, after) = wrap.split_once(WRAP_SPLIT).unwrap_or((wrap, ""));
    format!("{}{}{}", before.trim(), content, after.trim())
}
