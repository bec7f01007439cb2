//! Backend that indexes nothing and finds nothing.

use tracing::trace;

use super::DiscoveryIo;
use crate::error::Result;
use crate::metric::{Metric, MetricName, SearchResult};
use crate::path::IndexedPath;

/// No-op discovery backend, used to wire up the registry without storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiscovery;

impl NoopDiscovery {
    /// Creates the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DiscoveryIo for NoopDiscovery {
    fn backend_name(&self) -> &'static str {
        "noop"
    }

    fn insert_discovery_batch(&self, metrics: Vec<Metric>) -> Result<()> {
        trace!(count = metrics.len(), "noop discovery dropping batch");
        Ok(())
    }

    fn search(&self, _tenant: &str, _query: &str) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }

    fn get_metric_names(&self, _tenant: &str, _query: &str) -> Result<Vec<MetricName>> {
        Ok(Vec::new())
    }

    fn aggregate_paths(&self, _tenant: &str, _prefix: &str) -> Result<Vec<IndexedPath>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Locator;

    #[test]
    fn test_noop_returns_empty() {
        let backend = NoopDiscovery::new();
        let metric = Metric::new(Locator::new("t", "a.b").unwrap());
        assert!(backend.insert_discovery(metric.clone()).is_ok());
        assert!(backend.insert_discovery_batch(vec![metric]).is_ok());
        assert!(backend.search("unknown", "a.*").unwrap().is_empty());
        assert!(backend
            .search_many("unknown", &["a.*", "b"])
            .unwrap()
            .is_empty());
        assert!(backend.get_metric_names("unknown", "a.*").unwrap().is_empty());
        assert!(backend.aggregate_paths("unknown", "a").unwrap().is_empty());
        assert_eq!(backend.backend_name(), "noop");
    }
}
