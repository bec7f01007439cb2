//! Fuzz target for glob compilation and matching.
//!
//! Arbitrary pattern and candidate strings must never panic, and a compiled
//! pattern must only match candidates with the same number of segments.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_glob_pattern
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use metric_index_core::GlobPattern;

#[derive(Arbitrary, Debug)]
struct GlobInput {
    pattern: String,
    candidate: String,
}

fuzz_target!(|input: GlobInput| {
    // Long patterns only slow the regex compiler down
    if input.pattern.len() > 256 {
        return;
    }

    if let Ok(glob) = GlobPattern::parse(&input.pattern) {
        if glob.matches(&input.candidate) {
            assert_eq!(input.candidate.split('.').count(), glob.depth());
        }
        if glob.is_literal() {
            assert!(glob.matches(glob.as_str()));
        }
    }
});
