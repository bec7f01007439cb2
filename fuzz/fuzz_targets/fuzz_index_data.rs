//! Fuzz target for the level classifier.
//!
//! Feeds arbitrary `(path, count)` aggregations into `MetricIndexData` to find:
//! - Panics on malformed paths or extreme counts
//! - Classification results that escape their level
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_index_data
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use metric_index_core::MetricIndexData;

#[derive(Arbitrary, Debug)]
struct ClassifierInput {
    target_depth: u8,
    entries: Vec<(String, u64)>,
}

fuzz_target!(|input: ClassifierInput| {
    let Ok(mut data) = MetricIndexData::new(usize::from(input.target_depth % 8)) else {
        return;
    };

    for (path, count) in input.entries.iter().take(512) {
        // Rejected entries leave the classifier unchanged
        let _ = data.add(path, *count);
    }

    let target = data.target_depth();
    let level = data.classify();
    for name in &level.base_level_complete_names {
        assert_eq!(name.split('.').count(), target);
    }
    for name in &level.next_level_complete_names {
        assert_eq!(name.split('.').count(), target + 1);
    }
    for token in &level.tokens_with_next_level {
        assert!(!token.contains('.'));
    }
    let _ = data.verify_doc_counts();
});
