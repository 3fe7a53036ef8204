//! Fuzz target for TOML setup trees and settings files.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;
use tscobj_config::{validate_settings, Settings};
use tscobj_tree::ConfigTree;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = toml::from_str::<ConfigTree>(text);
    if let Ok(settings) = Settings::from_toml_str(text, Path::new("fuzz.toml")) {
        let _ = validate_settings(&settings);
    }
});
