//! tscobj - render a content object picked by its setup path
//!
//! The entry point handles:
//! - Settings resolution and validation
//! - Loading the setup tree
//! - Rendering an object from a path or a flexform
//! - Inspecting path resolution and the type registry

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tscobj_config::{load_settings, load_setup, ConfigError, LoadedSettings};
use tscobj_core::controller::{
    format_error, ControllerError, FIELD_HTMLSPECIALCHARS, FIELD_OBJECT,
};
use tscobj_core::exit_codes::ExitCode;
use tscobj_core::form::{FlexForm, FormValues};
use tscobj_core::log_event;
use tscobj_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use tscobj_core::{
    BuiltinRenderer, ConfigTree, ContentObjectRegistry, MessageCatalog, ObjectController,
    ObjectPath, RenderContext,
};
use tscobj_tree::resolve;

/// Render content objects from a setup tree
#[derive(Parser)]
#[command(name = "tscobj")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (overrides TSCOBJ_CONFIG and the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the object named by a path or a flexform
    Render(RenderArgs),

    /// Show what a path resolves to, as JSON
    Resolve(ResolveArgs),

    /// List the registered content-object types
    Types,

    /// Validate settings and the configured setup
    Check,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Setup tree (JSON or TOML); defaults to the settings' `setup`
    #[arg(long)]
    setup: Option<PathBuf>,

    /// Dotted object path, e.g. lib.header
    #[arg(long, conflicts_with = "flexform", required_unless_present = "flexform")]
    object: Option<String>,

    /// Flexform data as a JSON file
    #[arg(long)]
    flexform: Option<PathBuf>,

    /// Escape the rendered output and convert line breaks
    #[arg(long)]
    htmlspecialchars: bool,

    /// Language for error messages
    #[arg(long)]
    lang: Option<String>,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Setup tree (JSON or TOML); defaults to the settings' `setup`
    #[arg(long)]
    setup: Option<PathBuf>,

    /// Dotted object path
    path: String,
}

/// `resolve` subcommand payload.
#[derive(Serialize)]
struct ResolveReport<'a> {
    path: &'a str,
    content_type: Option<&'a str>,
    registered: bool,
    config: &'a ConfigTree,
}

/// Form built from CLI flags on top of an optional flexform.
struct CliForm {
    flexform: Option<FlexForm>,
    object: Option<String>,
    htmlspecialchars: bool,
}

impl FormValues for CliForm {
    fn value(&self, field: &str) -> Option<String> {
        match field {
            FIELD_OBJECT if self.object.is_some() => self.object.clone(),
            FIELD_HTMLSPECIALCHARS if self.htmlspecialchars => Some("1".to_string()),
            _ => self.flexform.as_ref().and_then(|form| form.value(field)),
        }
    }
}

fn main() {
    // Usage errors exit with ArgsError; clap's own code 2 is InvalidType here.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_level = if cli.global.quiet {
        Some(LogLevel::Off)
    } else {
        LogLevel::from_verbosity(cli.global.verbose)
    };
    let log_config = LogConfig::from_env(log_level, cli.global.log_format);
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "tscobj started");

    let exit_code = match load_settings(cli.global.config.as_deref()) {
        Ok(loaded) => {
            match &loaded.path {
                Some(path) => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_LOADED,
                    Stage::Init,
                    "settings loaded",
                    path = path.display().to_string().as_str(),
                    source = loaded.source.to_string().as_str()
                ),
                None => log_event!(
                    ctx,
                    DEBUG,
                    event_names::CONFIG_DEFAULT_USED,
                    Stage::Init,
                    "using built-in settings"
                ),
            }
            match cli.command {
                Commands::Render(args) => run_render(&ctx, &loaded, &args),
                Commands::Resolve(args) => run_resolve(&ctx, &loaded, &args),
                Commands::Types => run_types(&loaded),
                Commands::Check => run_check(&loaded),
            }
        }
        Err(err) => {
            log_event!(ctx, ERROR, event_names::CONFIG_ERROR, Stage::Init, "settings rejected");
            eprintln!("tscobj: {}", err);
            let code = config_exit_code(&err);
            match cli.command {
                Commands::Check => {
                    let settings = serde_json::json!({
                        "check": "settings",
                        "status": "error",
                        "path": cli.global.config.as_ref().map(|p| p.display().to_string()),
                        "error": err.to_string(),
                    });
                    print_check_report(vec![settings], code)
                }
                _ => code,
            }
        }
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Output,
        "tscobj finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

fn config_exit_code(err: &ConfigError) -> ExitCode {
    if err.is_io() {
        ExitCode::IoError
    } else {
        ExitCode::ConfigError
    }
}

/// Load the setup from an explicit path or the settings' `setup` entry.
fn setup_from(
    ctx: &LogContext,
    loaded: &LoadedSettings,
    explicit: Option<&Path>,
) -> Result<ConfigTree, ExitCode> {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(|| loaded.setup_path()) else {
        eprintln!("tscobj: no setup given (use --setup or set `setup` in settings)");
        return Err(ExitCode::ArgsError);
    };
    let setup = load_setup(&path).map_err(|err| {
        eprintln!("tscobj: {}", err);
        config_exit_code(&err)
    })?;
    log_event!(
        ctx,
        DEBUG,
        event_names::SETUP_LOADED,
        Stage::Init,
        "setup loaded",
        path = path.display().to_string().as_str(),
        keys = setup.len()
    );
    Ok(setup)
}

fn run_render(ctx: &LogContext, loaded: &LoadedSettings, args: &RenderArgs) -> ExitCode {
    let setup = match setup_from(ctx, loaded, args.setup.as_deref()) {
        Ok(setup) => setup,
        Err(code) => return code,
    };

    let flexform = match &args.flexform {
        Some(path) => match read_flexform(path) {
            Ok(form) => Some(form),
            Err(code) => return code,
        },
        None => None,
    };
    let form = CliForm {
        flexform,
        object: args.object.clone(),
        htmlspecialchars: args.htmlspecialchars,
    };

    let ctx = match form.value(FIELD_OBJECT) {
        Some(path) => ctx.clone().with_object_path(path),
        None => ctx.clone(),
    };

    let registry = ContentObjectRegistry::from_settings(&loaded.settings.registry);
    let catalog = MessageCatalog::from_settings(&loaded.settings, args.lang.as_deref());
    let renderer = BuiltinRenderer::new();
    let render_ctx =
        RenderContext::new(&setup, &registry, &renderer, &catalog).with_log_context(&ctx);
    let controller =
        ObjectController::new().with_escape_default(loaded.settings.output.htmlspecialchars);

    match controller.render(&form, &render_ctx) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::Clean
        }
        Err(err) => {
            println!("{}", format_error(&err, &catalog));
            match err {
                ControllerError::PathNotFound { .. } => ExitCode::ObjectNotFound,
                ControllerError::UnsupportedType { .. } => ExitCode::InvalidType,
            }
        }
    }
}

fn read_flexform(path: &Path) -> Result<FlexForm, ExitCode> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        eprintln!("tscobj: cannot read flexform {}: {}", path.display(), err);
        ExitCode::IoError
    })?;
    FlexForm::from_json_str(&content).map_err(|err| {
        eprintln!("tscobj: invalid flexform {}: {}", path.display(), err);
        ExitCode::ArgsError
    })
}

fn run_resolve(ctx: &LogContext, loaded: &LoadedSettings, args: &ResolveArgs) -> ExitCode {
    let setup = match setup_from(ctx, loaded, args.setup.as_deref()) {
        Ok(setup) => setup,
        Err(code) => return code,
    };

    let resolved = match resolve(&setup, &ObjectPath::parse(&args.path)) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("tscobj: {}: {}", args.path, err);
            return ExitCode::ObjectNotFound;
        }
    };

    let registry = ContentObjectRegistry::from_settings(&loaded.settings.registry);
    let report = ResolveReport {
        path: &args.path,
        content_type: resolved.content_type,
        registered: resolved.content_type.is_some_and(|t| registry.contains(t)),
        config: resolved.config,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::Clean
        }
        Err(err) => {
            eprintln!("tscobj: {}", err);
            ExitCode::InternalError
        }
    }
}

fn run_types(loaded: &LoadedSettings) -> ExitCode {
    let registry = ContentObjectRegistry::from_settings(&loaded.settings.registry);
    for name in registry.iter() {
        println!("{}", name);
    }
    ExitCode::Clean
}

fn run_check(loaded: &LoadedSettings) -> ExitCode {
    let mut results = vec![serde_json::json!({
        "check": "settings",
        "status": "ok",
        "path": loaded.path.as_ref().map(|p| p.display().to_string()),
        "source": loaded.source.to_string(),
        "using_defaults": loaded.path.is_none(),
    })];

    let mut exit_code = ExitCode::Clean;
    if let Some(path) = loaded.setup_path() {
        match load_setup(&path) {
            Ok(tree) => results.push(serde_json::json!({
                "check": "setup",
                "status": "ok",
                "path": path.display().to_string(),
                "keys": tree.len(),
            })),
            Err(err) => {
                exit_code = config_exit_code(&err);
                results.push(serde_json::json!({
                    "check": "setup",
                    "status": "error",
                    "path": path.display().to_string(),
                    "error": err.to_string(),
                }));
            }
        }
    }

    print_check_report(results, exit_code)
}

fn print_check_report(results: Vec<serde_json::Value>, exit_code: ExitCode) -> ExitCode {
    let report = serde_json::json!({
        "ok": exit_code.is_success(),
        "code": exit_code.code_name(),
        "checked_at": chrono::Utc::now().to_rfc3339(),
        "checks": results,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("tscobj: {}", err);
            return ExitCode::InternalError;
        }
    }
    exit_code
}
