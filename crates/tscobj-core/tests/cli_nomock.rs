//! End-to-end tests for the tscobj binary.
//!
//! Every test runs against its own settings file and setup in a temp dir so
//! the user's environment never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SETUP: &str = r#"{
    "page": "TEXT",
    "page.": {"value": "Hello"},
    "lib.": {
        "header": "COA",
        "header.": {
            "10": "TEXT", "10.": {"value": "Title"},
            "20": "TEXT", "20.": {"value": "<sub>\nline"},
            "wrap": "<header>|</header>"
        },
        "raw": "TEXT",
        "raw.": {"value": "a & b\nc"},
        "custom": "MY_OBJECT",
        "custom.": {"value": "x"}
    }
}"#;

struct Site {
    dir: TempDir,
}

impl Site {
    fn new(settings: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("settings.toml"), settings).expect("write settings");
        fs::write(dir.path().join("setup.json"), SETUP).expect("write setup");
        Self { dir }
    }

    fn with_setup() -> Self {
        Self::new("setup = \"setup.json\"\n")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tscobj").expect("tscobj binary should exist");
        cmd.env_remove("TSCOBJ_LOG")
            .env_remove("TSCOBJ_LOG_FORMAT")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("settings.toml"));
        cmd
    }
}

mod render {
    use super::*;

    #[test]
    fn renders_text_object() {
        Site::with_setup()
            .cmd()
            .args(["render", "--object", "page"])
            .assert()
            .success()
            .stdout("Hello\n");
    }

    #[test]
    fn renders_coa_with_wrap() {
        Site::with_setup()
            .cmd()
            .args(["render", "--object", "lib.header"])
            .assert()
            .success()
            .stdout("<header>Title<sub>\nline</header>\n");
    }

    #[test]
    fn explicit_setup_overrides_settings() {
        let site = Site::new("");
        let other = site.path("other.json");
        fs::write(&other, r#"{"page": "TEXT", "page.": {"value": "Other"}}"#).unwrap();
        site.cmd()
            .args(["render", "--object", "page", "--setup"])
            .arg(&other)
            .assert()
            .success()
            .stdout("Other\n");
    }

    #[test]
    fn zero_path_renders_nothing() {
        Site::with_setup()
            .cmd()
            .args(["render", "--object", "0"])
            .assert()
            .success()
            .stdout("");
    }

    #[test]
    fn unknown_path_reports_not_found() {
        Site::with_setup()
            .cmd()
            .args(["render", "--object", "lib.missing"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "<strong>Object not found</strong> (lib.missing)",
            ));
    }

    #[test]
    fn unregistered_type_reports_invalid() {
        Site::with_setup()
            .cmd()
            .args(["render", "--object", "lib.custom"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains(
                "<strong>Invalid content object type</strong> (MY_OBJECT)",
            ));
    }

    #[test]
    fn extra_types_from_settings_are_accepted() {
        let site = Site::new("setup = \"setup.json\"\n[registry]\nextra_types = [\"MY_OBJECT\"]\n");
        site.cmd()
            .args(["render", "--object", "lib.custom"])
            .assert()
            .success()
            .stdout("");
    }

    #[test]
    fn disabled_types_from_settings_are_rejected() {
        let site = Site::new("setup = \"setup.json\"\n[registry]\ndisabled_types = [\"TEXT\"]\n");
        site.cmd()
            .args(["render", "--object", "page"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("(TEXT)"));
    }

    #[test]
    fn htmlspecialchars_flag_escapes_output() {
        Site::with_setup()
            .cmd()
            .args(["render", "--object", "lib.raw", "--htmlspecialchars"])
            .assert()
            .success()
            .stdout("a &amp; b<br />\nc\n");
    }

    #[test]
    fn settings_default_escapes_output() {
        let site = Site::new("setup = \"setup.json\"\n[output]\nhtmlspecialchars = true\n");
        site.cmd()
            .args(["render", "--object", "lib.raw"])
            .assert()
            .success()
            .stdout("a &amp; b<br />\nc\n");
    }

    #[test]
    fn flexform_supplies_object_and_flag() {
        let site = Site::with_setup();
        let form = site.path("form.json");
        fs::write(
            &form,
            r#"{"data": {"sDEF": {"lDEF": {
                "object": {"vDEF": "lib.raw"},
                "htmlspecialchars": {"vDEF": "1"}
            }}}}"#,
        )
        .unwrap();
        site.cmd()
            .args(["render", "--flexform"])
            .arg(&form)
            .assert()
            .success()
            .stdout("a &amp; b<br />\nc\n");
    }

    #[test]
    fn flexform_flag_off_keeps_markup() {
        let site = Site::new("setup = \"setup.json\"\n[output]\nhtmlspecialchars = true\n");
        let form = site.path("form.json");
        fs::write(
            &form,
            r#"{"data": {"sDEF": {"lDEF": {
                "object": {"vDEF": "lib.raw"},
                "htmlspecialchars": {"vDEF": "0"}
            }}}}"#,
        )
        .unwrap();
        site.cmd()
            .args(["render", "--flexform"])
            .arg(&form)
            .assert()
            .success()
            .stdout("a & b\nc\n");
    }

    #[test]
    fn localized_messages() {
        let site = Site::new(
            "setup = \"setup.json\"\n[messages.de]\n\"errors.notfound\" = \"Objekt nicht gefunden\"\n",
        );
        site.cmd()
            .args(["render", "--object", "nope", "--lang", "de"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "<strong>Objekt nicht gefunden</strong> (nope)",
            ));
    }
}

mod resolve {
    use super::*;

    #[test]
    fn prints_type_and_config() {
        let output = Site::with_setup()
            .cmd()
            .args(["resolve", "page"])
            .output()
            .expect("run tscobj");
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
        assert_eq!(json["path"], "page");
        assert_eq!(json["content_type"], "TEXT");
        assert_eq!(json["registered"], true);
        assert_eq!(json["config"]["value"], "Hello");
    }

    #[test]
    fn intermediate_path_has_no_type() {
        let output = Site::with_setup()
            .cmd()
            .args(["resolve", "lib"])
            .output()
            .expect("run tscobj");
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
        assert!(json["content_type"].is_null());
        assert_eq!(json["registered"], false);
        assert_eq!(json["config"]["header"], "COA");
        assert_eq!(json["config"]["header."]["10"], "TEXT");
    }

    #[test]
    fn missing_segment_fails() {
        Site::with_setup()
            .cmd()
            .args(["resolve", "lib.nothing"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("nothing"));
    }
}

mod logging {
    use super::*;

    fn json_events(stderr: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(stderr)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    #[test]
    fn controller_events_carry_run_context() {
        let output = Site::with_setup()
            .cmd()
            .args(["-vv", "--log-format", "jsonl", "render", "--object", "nope"])
            .output()
            .expect("run tscobj");
        assert_eq!(output.status.code(), Some(1));

        let events = json_events(&output.stderr);
        let not_found = events
            .iter()
            .find(|e| e["target"] == "resolve.not_found")
            .expect("not-found event");
        assert_eq!(not_found["stage"], "resolve");
        assert_eq!(not_found["object_path"], "nope");
        assert_eq!(not_found["segment"], "nope");

        let run_id = not_found["run_id"].as_str().expect("run id");
        assert!(run_id.starts_with("run-"));
        assert!(events.iter().all(|e| e["run_id"] == run_id));
    }

    #[test]
    fn stages_follow_the_pipeline() {
        let output = Site::with_setup()
            .cmd()
            .args(["-vv", "--log-format", "jsonl", "render", "--object", "lib.custom"])
            .output()
            .expect("run tscobj");
        assert_eq!(output.status.code(), Some(2));

        let events = json_events(&output.stderr);
        let stage_of = |target: &str| {
            events
                .iter()
                .find(|e| e["target"] == target)
                .map(|e| e["stage"].clone())
        };
        assert_eq!(stage_of("run.started"), Some("init".into()));
        assert_eq!(stage_of("resolve.finished"), Some("resolve".into()));
        assert_eq!(stage_of("validate.rejected"), Some("validate".into()));
        assert_eq!(stage_of("run.finished"), Some("output".into()));
    }

    #[test]
    fn object_path_is_a_plain_string() {
        let output = Site::with_setup()
            .cmd()
            .args(["-vv", "--log-format", "jsonl", "render", "--object", "page"])
            .output()
            .expect("run tscobj");
        assert!(output.status.success());

        let events = json_events(&output.stderr);
        let rendered = events
            .iter()
            .find(|e| e["target"] == "render.finished")
            .expect("render event");
        assert_eq!(rendered["stage"], "render");
        assert_eq!(rendered["object_path"], "page");
        assert!(!String::from_utf8_lossy(&output.stderr).contains("Some("));
    }

    #[test]
    fn setup_load_is_logged_once() {
        let output = Site::with_setup()
            .cmd()
            .args(["-vv", "--log-format", "jsonl", "render", "--object", "page"])
            .output()
            .expect("run tscobj");
        assert!(output.status.success());

        let events = json_events(&output.stderr);
        let loads = events
            .iter()
            .filter(|e| e["message"] == "setup loaded")
            .count();
        assert_eq!(loads, 1);
    }
}

mod types {
    use super::*;

    #[test]
    fn lists_effective_registry() {
        let site = Site::new("[registry]\nextra_types = [\"MY_OBJECT\"]\ndisabled_types = [\"USER_INT\"]\n");
        site.cmd()
            .arg("types")
            .assert()
            .success()
            .stdout(predicate::str::contains("TEXT\n"))
            .stdout(predicate::str::contains("MY_OBJECT\n"))
            .stdout(predicate::str::contains("USER_INT").not());
    }
}

mod errors {
    use super::*;

    #[test]
    fn check_reports_ok() {
        Site::with_setup()
            .cmd()
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"ok\": true"));
    }

    #[test]
    fn check_reports_missing_setup() {
        Site::new("setup = \"gone.json\"\n")
            .cmd()
            .arg("check")
            .assert()
            .code(21)
            .stdout(predicate::str::contains("\"ok\": false"));
    }

    #[test]
    fn check_reports_invalid_settings() {
        let output = Site::new("schema_version = \"9.9.9\"\n")
            .cmd()
            .arg("check")
            .output()
            .expect("run tscobj");
        assert_eq!(output.status.code(), Some(11));

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
        assert_eq!(json["ok"], false);
        let settings = &json["checks"][0];
        assert_eq!(settings["check"], "settings");
        assert_eq!(settings["status"], "error");
        assert!(settings["error"]
            .as_str()
            .is_some_and(|e| e.contains("Version mismatch")));
    }

    #[test]
    fn render_without_setup_is_an_argument_error() {
        Site::new("")
            .cmd()
            .args(["render", "--object", "page"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("no setup given"));
    }

    #[test]
    fn render_needs_object_or_flexform() {
        Site::with_setup()
            .cmd()
            .arg("render")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn missing_settings_file_is_io_error() {
        let site = Site::with_setup();
        Command::cargo_bin("tscobj")
            .expect("tscobj binary should exist")
            .arg("--config")
            .arg(site.path("absent.toml"))
            .arg("types")
            .assert()
            .code(21);
    }

    #[test]
    fn invalid_settings_are_config_error() {
        Site::new("schema_version = \"9.9.9\"\n")
            .cmd()
            .arg("types")
            .assert()
            .code(11)
            .stderr(predicate::str::contains("Version mismatch"));
    }

    #[test]
    fn unsupported_setup_format_is_config_error() {
        let site = Site::new("setup = \"setup.yaml\"\n");
        fs::write(site.path("setup.yaml"), "page: TEXT\n").unwrap();
        site.cmd()
            .args(["render", "--object", "page"])
            .assert()
            .code(11);
    }

    #[test]
    fn unknown_command_fails() {
        Site::with_setup()
            .cmd()
            .arg("nonexistent-command")
            .assert()
            .code(10);
    }

    #[test]
    fn help_succeeds() {
        Site::with_setup()
            .cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("render"));
    }
}
