//! Fuzz target for path resolution and the controller.
//!
//! The input is split into a setup document and an object path. Rendering
//! must never panic and always produce a string.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;
use tscobj_core::{
    BuiltinRenderer, ConfigTree, ContentObjectRegistry, MessageCatalog, ObjectController,
    ObjectPath, RenderContext,
};
use tscobj_tree::resolve;

#[derive(Debug, Arbitrary)]
struct Input {
    setup: String,
    path: String,
    escape: bool,
}

fuzz_target!(|input: Input| {
    let Ok(tree) = serde_json::from_str::<ConfigTree>(&input.setup) else {
        return;
    };

    let path = ObjectPath::parse(&input.path);
    if let Ok(resolved) = resolve(&tree, &path) {
        assert!(resolved.content_type.map_or(true, |t| !t.is_empty()));
    }

    let registry = ContentObjectRegistry::with_defaults();
    let catalog = MessageCatalog::new();
    let ctx = RenderContext::new(&tree, &registry, &BuiltinRenderer, &catalog);
    let mut form = BTreeMap::new();
    form.insert("object".to_string(), input.path);
    if input.escape {
        form.insert("htmlspecialchars".to_string(), "1".to_string());
    }
    let _ = ObjectController::new().main(&form, &ctx);
});
