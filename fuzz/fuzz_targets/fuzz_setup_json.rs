//! Fuzz target for JSON setup trees.
//!
//! Parsing must never panic, and an accepted tree must serialize back to
//! the same tree.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tscobj_tree::ConfigTree;

fuzz_target!(|data: &[u8]| {
    let Ok(tree) = serde_json::from_slice::<ConfigTree>(data) else {
        return;
    };
    let json = serde_json::to_string(&tree).expect("tree serializes");
    let again: ConfigTree = serde_json::from_str(&json).expect("serialized tree parses");
    assert_eq!(tree, again);
});
