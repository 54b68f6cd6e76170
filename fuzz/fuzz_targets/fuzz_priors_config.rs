//! Fuzz target for priors.json configuration parsing.
//!
//! Parsing and validation must reject bad input with an error, never a panic.

#![no_main]

use adpost_common::AdPriors;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = AdPriors::from_json(text);
    }
});
