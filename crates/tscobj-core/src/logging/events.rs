//! Structured event vocabulary.
//!
//! Every event carries the run id, the pipeline stage and, once known, the
//! object path being rendered.

use serde::{Deserialize, Serialize};

/// Stages of a render run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup, settings and setup loading.
    Init,
    /// Walking the object path through the setup.
    Resolve,
    /// Registry check of the resolved type.
    Validate,
    /// Renderer invocation.
    Render,
    /// Post-processing and printing.
    Output,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Resolve => "resolve",
            Stage::Validate => "validate",
            Stage::Render => "render",
            Stage::Output => "output",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names, used as tracing targets.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Init stage
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";
    pub const SETUP_LOADED: &str = "setup.loaded";

    // Resolve stage
    pub const RESOLVE_EMPTY_PATH: &str = "resolve.empty_path";
    pub const RESOLVE_FINISHED: &str = "resolve.finished";
    pub const RESOLVE_NOT_FOUND: &str = "resolve.not_found";

    // Validate stage
    pub const VALIDATE_REJECTED: &str = "validate.rejected";

    // Render / output
    pub const RENDER_FINISHED: &str = "render.finished";
    pub const OUTPUT_ESCAPED: &str = "output.escaped";
}

/// Correlation data attached to events of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Object path being rendered, once known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_path: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            object_path: None,
        }
    }

    /// Context with no run id, for library callers that run outside the CLI.
    pub const fn detached() -> Self {
        LogContext {
            run_id: String::new(),
            object_path: None,
        }
    }

    /// Attach the object path.
    pub fn with_object_path(mut self, path: impl Into<String>) -> Self {
        self.object_path = Some(path.into());
        self
    }
}
