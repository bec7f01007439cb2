//! Discovery capability: backend-agnostic contract for indexing metric
//! identities and searching a tenant's metric namespace.
//!
//! Implementations must be safe to call from many threads at once. An empty
//! result means "nothing matched". Failures are always reported as an
//! [`Error`](crate::Error), never as an empty result.
//!
//! # Example
//!
//! ```rust
//! use metric_index_core::discovery::{DiscoveryIo, InMemoryDiscovery};
//! use metric_index_core::{Locator, Metric};
//!
//! let backend = InMemoryDiscovery::default();
//! backend
//!     .insert_discovery(Metric::new(Locator::new("acme", "cpu.idle").unwrap()))
//!     .unwrap();
//!
//! let names = backend.get_metric_names("acme", "cpu.*").unwrap();
//! assert_eq!(names.len(), 1);
//! assert_eq!(names[0].name, "cpu.idle");
//! ```

use std::collections::BTreeSet;

use crate::error::Result;
use crate::metric::{Metric, MetricName, SearchResult};
use crate::path::IndexedPath;

mod memory;
mod noop;
pub mod registry;


pub use memory::InMemoryDiscovery;
pub use noop::NoopDiscovery;
pub use registry::{BackendFactory, BackendRegistry};

/// Contract every discovery backend satisfies.
pub trait DiscoveryIo: Send + Sync {
    /// Registry key of this backend.
    fn backend_name(&self) -> &'static str;

    /// Indexes one metric identity.
    fn insert_discovery(&self, metric: Metric) -> Result<()> {
        self.insert_discovery_batch(vec![metric])
    }

    /// Indexes a batch of metric identities.
    ///
    /// Implementations document their partial-failure policy.
    fn insert_discovery_batch(&self, metrics: Vec<Metric>) -> Result<()>;

    /// Resolves one query pattern against a tenant's metric names.
    fn search(&self, tenant: &str, query: &str) -> Result<Vec<SearchResult>>;

    /// Resolves several query patterns; the merged result has no duplicates.
    ///
    /// Callers must not rely on result order.
    fn search_many(&self, tenant: &str, queries: &[&str]) -> Result<Vec<SearchResult>> {
        let mut merged = BTreeSet::new();
        for query in queries {
            merged.extend(self.search(tenant, query)?);
        }
        Ok(merged.into_iter().collect())
    }

    /// Returns the complete metric names matching `query`, never bare prefixes.
    fn get_metric_names(&self, tenant: &str, query: &str) -> Result<Vec<MetricName>>;

    /// Returns the aggregated `(path, document count)` pairs for the paths
    /// whose ancestor at the prefix depth matches `prefix`, from the prefix
    /// depth down to two levels below it.
    fn aggregate_paths(&self, tenant: &str, prefix: &str) -> Result<Vec<IndexedPath>>;
}
