//! Property-based tests for the level classifier against the tokenization model.
//!
//! Random sets of metric names are tokenized with `fragments_of` or
//! `PathCounts`, fed to `MetricIndexData`, and the three classification sets
//! are compared with values computed directly from the names.

use std::collections::BTreeSet;

use metric_index_core::{fragments_of, Error, MetricIndexData, PathCounts, PathKind};
use proptest::{
    collection::{btree_set, vec},
    prelude::{prop_assert, prop_assert_eq, prop_oneof, Just, Strategy},
    proptest,
    test_runner::Config as ProptestConfig,
};

const CLASSIFIER_PROP_CASES: u32 = 256;

fn segment_strategy() -> impl Strategy<Value = String> {
    // A small alphabet forces shared prefixes between names
    prop_oneof![
        Just("foo".to_string()),
        Just("bar".to_string()),
        Just("baz".to_string()),
        Just("qux".to_string()),
        "[a-c]{1,2}",
    ]
}

fn name_strategy() -> impl Strategy<Value = String> {
    vec(segment_strategy(), 1..=6).prop_map(|segments| segments.join("."))
}

fn names_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    btree_set(name_strategy(), 1..24)
}

fn depth(name: &str) -> usize {
    name.split('.').count()
}

fn classifier_from_fragments(names: &BTreeSet<String>, target_depth: usize) -> MetricIndexData {
    let mut data = MetricIndexData::new(target_depth).unwrap();
    for (path, count) in &fragments_of(names.iter().map(String::as_str)) {
        data.add(path, *count).unwrap();
    }
    data
}

fn expected_tokens(names: &BTreeSet<String>, target_depth: usize) -> BTreeSet<String> {
    names
        .iter()
        .filter(|n| depth(n) > target_depth)
        .map(|n| n.split('.').nth(target_depth).unwrap().to_string())
        .collect()
}

fn names_at(names: &BTreeSet<String>, level: usize) -> BTreeSet<String> {
    names.iter().filter(|n| depth(n) == level).cloned().collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: CLASSIFIER_PROP_CASES,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_tokens_are_last_segments_of_next_level(
        names in names_strategy(),
        target_depth in 2_usize..=4,
    ) {
        let data = classifier_from_fragments(&names, target_depth);
        prop_assert_eq!(
            data.tokens_with_next_level(),
            expected_tokens(&names, target_depth)
        );
    }

    #[test]
    fn prop_complete_names_match_input_names(
        names in names_strategy(),
        target_depth in 2_usize..=4,
    ) {
        let data = classifier_from_fragments(&names, target_depth);
        prop_assert_eq!(
            data.base_level_complete_metric_names(),
            names_at(&names, target_depth)
        );
        prop_assert_eq!(
            data.next_level_complete_metric_names(),
            names_at(&names, target_depth + 1)
        );
        prop_assert!(data.verify_doc_counts().is_ok());
    }

    #[test]
    fn prop_depth_one_needs_explicit_kinds(names in names_strategy()) {
        let counts = PathCounts::from_names(names.iter().map(String::as_str));
        let mut data = MetricIndexData::new(1).unwrap();
        for (path, count) in counts.paths() {
            if depth(path) == 1 {
                let rejected = matches!(
                    data.add(path, *count),
                    Err(Error::AmbiguousCompleteness(_))
                );
                prop_assert!(rejected);
                let kind = if names.contains(path) {
                    PathKind::Terminal
                } else {
                    PathKind::Prefix
                };
                data.add_with_kind(path, *count, kind).unwrap();
            } else {
                data.add(path, *count).unwrap();
            }
        }
        prop_assert_eq!(data.base_level_complete_metric_names(), names_at(&names, 1));
        prop_assert_eq!(data.next_level_complete_metric_names(), names_at(&names, 2));
        prop_assert_eq!(data.tokens_with_next_level(), expected_tokens(&names, 1));
    }

    #[test]
    fn prop_combined_view_is_rejected_at_depth_one(names in names_strategy()) {
        let mut data = MetricIndexData::new(1).unwrap();
        for (path, count) in &fragments_of(names.iter().map(String::as_str)) {
            let result = data.add(path, *count);
            if depth(path) == 1 {
                prop_assert!(matches!(result, Err(Error::AmbiguousCompleteness(_))));
            } else {
                prop_assert!(result.is_ok());
            }
        }
        prop_assert!(data.base_level_complete_metric_names().is_empty());
    }

    #[test]
    fn prop_repeated_adds_are_idempotent(
        names in names_strategy(),
        target_depth in 2_usize..=4,
    ) {
        let fragments = fragments_of(names.iter().map(String::as_str));
        let mut once = MetricIndexData::new(target_depth).unwrap();
        let mut twice = MetricIndexData::new(target_depth).unwrap();
        for (path, count) in &fragments {
            once.add(path, *count).unwrap();
            twice.add(path, *count).unwrap();
        }
        for (path, count) in &fragments {
            twice.add(path, *count).unwrap();
        }
        prop_assert_eq!(once.classify(), twice.classify());
    }

    #[test]
    fn prop_classification_sets_respect_depth(
        names in names_strategy(),
        target_depth in 2_usize..=4,
    ) {
        let data = classifier_from_fragments(&names, target_depth);
        let classification = data.classify();
        prop_assert!(classification
            .base_level_complete_names
            .iter()
            .all(|n| depth(n) == target_depth));
        prop_assert!(classification
            .next_level_complete_names
            .iter()
            .all(|n| depth(n) == target_depth + 1));
        prop_assert!(classification
            .tokens_with_next_level
            .iter()
            .all(|t| !t.contains('.')));
    }
}
