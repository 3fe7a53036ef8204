//! Fuzz target for flexform field lookup.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tscobj_core::form::{FlexForm, FormValues};

#[derive(Debug, Arbitrary)]
struct Input {
    data: String,
    field: String,
}

fuzz_target!(|input: Input| {
    if let Ok(form) = FlexForm::from_json_str(&input.data) {
        let _ = form.value(&input.field);
    }
});
