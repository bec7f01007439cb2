//! Level-by-level browsing of a tenant's metric namespace.

use tracing::debug;

use crate::classifier::{LevelClassification, MetricIndexData};
use crate::discovery::DiscoveryIo;
use crate::error::Result;
use crate::glob::GlobPattern;

/// Lists the level directly below `prefix` for `tenant`.
///
/// `prefix` may be a glob; its depth sets the classifier's target depth. The
/// backend aggregation is validated before classification, so a backend that
/// breaks the tokenizer contract surfaces as an error instead of a
/// misleading listing.
///
/// # Errors
///
/// Returns `Error::MalformedQuery` for an invalid prefix, any backend error
/// unchanged, and `Error::MalformedIndexedPath`, `Error::AmbiguousCompleteness`
/// or `Error::InconsistentDocCounts` if the aggregation violates the contract.
///
/// # Example
///
/// ```rust
/// use metric_index_core::browse::browse;
/// use metric_index_core::discovery::{DiscoveryIo, InMemoryDiscovery};
/// use metric_index_core::{Locator, Metric};
///
/// let backend = InMemoryDiscovery::default();
/// for name in ["foo.bar", "foo.bar.baz", "foo.bar.baz.qux"] {
///     backend.insert_discovery(Metric::new(Locator::new("acme", name).unwrap())).unwrap();
/// }
///
/// let level = browse(&backend, "acme", "foo.bar").unwrap();
/// assert!(level.base_level_complete_names.contains("foo.bar"));
/// assert!(level.tokens_with_next_level.contains("baz"));
/// assert!(level.next_level_complete_names.contains("foo.bar.baz"));
/// ```
pub fn browse(
    discovery: &dyn DiscoveryIo,
    tenant: &str,
    prefix: &str,
) -> Result<LevelClassification> {
    let pattern = GlobPattern::parse(prefix)?;
    let mut index_data = MetricIndexData::new(pattern.depth())?;
    for entry in discovery.aggregate_paths(tenant, prefix)? {
        index_data.add_indexed(entry)?;
    }
    index_data.verify_doc_counts()?;

    let classification = index_data.classify();
    debug!(
        tenant,
        prefix,
        backend = discovery.backend_name(),
        children = classification.tokens_with_next_level.len(),
        "browsed metric level"
    );
    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{InMemoryDiscovery, NoopDiscovery};
    use crate::error::Error;
    use crate::metric::{Locator, Metric, MetricName, SearchResult};
    use crate::path::{IndexedPath, PathKind};

    fn populated(names: &[&str]) -> InMemoryDiscovery {
        let backend = InMemoryDiscovery::default();
        backend
            .insert_discovery_batch(
                names
                    .iter()
                    .map(|n| Metric::new(Locator::new("acme", *n).unwrap()))
                    .collect(),
            )
            .unwrap();
        backend
    }

    fn sorted(set: &std::collections::BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    /// Returns a fixed aggregation regardless of the request.
    struct FixedAggregation(Vec<IndexedPath>);

    impl DiscoveryIo for FixedAggregation {
        fn backend_name(&self) -> &'static str {
            "fixed"
        }

        fn insert_discovery_batch(&self, _metrics: Vec<Metric>) -> Result<()> {
            Ok(())
        }

        fn search(&self, _tenant: &str, _query: &str) -> Result<Vec<SearchResult>> {
            Ok(Vec::new())
        }

        fn get_metric_names(&self, _tenant: &str, _query: &str) -> Result<Vec<MetricName>> {
            Ok(Vec::new())
        }

        fn aggregate_paths(&self, _tenant: &str, _prefix: &str) -> Result<Vec<IndexedPath>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_browse_mixed_level() {
        let backend = populated(&[
            "foo.bar",
            "foo.bar.baz",
            "foo.bar.baz.qux",
            "foo.bar.quux",
            "foo.bar.corge.grault",
            "foo.other.x",
        ]);

        let level = browse(&backend, "acme", "foo.bar").unwrap();
        assert_eq!(level.target_depth, 2);
        assert_eq!(sorted(&level.tokens_with_next_level), vec!["baz", "corge", "quux"]);
        assert_eq!(sorted(&level.base_level_complete_names), vec!["foo.bar"]);
        assert_eq!(
            sorted(&level.next_level_complete_names),
            vec!["foo.bar.baz", "foo.bar.quux"]
        );
    }

    #[test]
    fn test_browse_single_deep_metric() {
        let backend = populated(&["foo.bar.baz.qux"]);
        let level = browse(&backend, "acme", "foo.bar").unwrap();
        assert_eq!(sorted(&level.tokens_with_next_level), vec!["baz"]);
        assert!(level.base_level_complete_names.is_empty());
        assert!(level.next_level_complete_names.is_empty());
    }

    #[test]
    fn test_browse_depth_one_prefix() {
        let backend = populated(&["cpu.idle", "cpu.user.total", "mem.free"]);
        let level = browse(&backend, "acme", "cpu").unwrap();
        assert_eq!(sorted(&level.tokens_with_next_level), vec!["idle", "user"]);
        assert!(level.base_level_complete_names.is_empty());
        assert_eq!(sorted(&level.next_level_complete_names), vec!["cpu.idle"]);
    }

    #[test]
    fn test_browse_glob_prefix() {
        let backend = populated(&["web01.cpu", "web02.cpu.idle", "db01.cpu"]);
        let level = browse(&backend, "acme", "web*").unwrap();
        assert_eq!(sorted(&level.tokens_with_next_level), vec!["cpu"]);
        assert_eq!(sorted(&level.next_level_complete_names), vec!["web01.cpu"]);
    }

    #[test]
    fn test_browse_unknown_tenant_and_noop_are_empty() {
        let backend = populated(&["foo.bar"]);
        assert_eq!(
            browse(&backend, "nobody", "foo").unwrap(),
            LevelClassification {
                target_depth: 1,
                ..LevelClassification::default()
            }
        );
        let level = browse(&NoopDiscovery::new(), "acme", "foo").unwrap();
        assert!(level.tokens_with_next_level.is_empty());
    }

    #[test]
    fn test_browse_rejects_malformed_prefix() {
        let backend = populated(&["foo.bar"]);
        assert!(matches!(
            browse(&backend, "acme", "foo."),
            Err(Error::MalformedQuery(_))
        ));
    }

    #[test]
    fn test_browse_surfaces_contract_violations() {
        let broken = FixedAggregation(vec![IndexedPath::new("foo..bar", 1)]);
        let err = browse(&broken, "acme", "foo").unwrap_err();
        assert!(err.is_contract_violation());

        let overfull = FixedAggregation(vec![
            IndexedPath::new("foo.bar", 1),
            IndexedPath::new("foo.bar.a", 1),
            IndexedPath::new("foo.bar.b", 1),
        ]);
        assert!(matches!(
            browse(&overfull, "acme", "foo.bar"),
            Err(Error::InconsistentDocCounts { .. })
        ));
    }

    #[test]
    fn test_browse_rejects_count_only_root_level() {
        // Same-text token "bar" would otherwise pass for a complete name
        let combined = FixedAggregation(vec![
            IndexedPath::new("foo", 1),
            IndexedPath::new("bar", 1),
            IndexedPath::new("foo.bar", 1),
        ]);
        let err = browse(&combined, "acme", "bar").unwrap_err();
        assert!(matches!(err, Error::AmbiguousCompleteness(_)));
        assert!(err.is_contract_violation());

        let kinded = FixedAggregation(vec![
            IndexedPath::with_kind("foo", 1, PathKind::Prefix),
            IndexedPath::with_kind("foo.bar", 1, PathKind::Terminal),
        ]);
        let level = browse(&kinded, "acme", "foo").unwrap();
        assert!(level.base_level_complete_names.is_empty());
        assert!(level.next_level_complete_names.contains("foo.bar"));
    }

    #[test]
    fn test_browse_propagates_backend_failure() {
        let backend = populated(&["foo.bar"]);
        backend.close();
        assert!(browse(&backend, "acme", "foo").unwrap_err().is_retryable());
    }
}
