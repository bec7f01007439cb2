//! In-memory discovery backend.
//!
//! Counts the path hierarchy of every inserted name with
//! [`crate::tokenizer::PathCounts`] and answers aggregations from those counts,
//! tagging each path with an explicit [`PathKind`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::DiscoveryIo;
use crate::config::{DiscoveryConfig, LimitsConfig};
use crate::error::{Error, Result};
use crate::glob::GlobPattern;
use crate::metric::{Metric, MetricName, SearchResult};
use crate::path::{IndexedPath, PathKind};
use crate::tokenizer::PathCounts;

#[derive(Debug, Default)]
struct TenantIndex {
    /// Indexed metrics keyed by full name.
    metrics: BTreeMap<String, Metric>,
    /// Path-hierarchy counts over the keys of `metrics`.
    counts: PathCounts,
}

/// Discovery backend holding every tenant's namespace in process memory.
///
/// Batches are validated in full before the write lock is taken, so a batch is
/// either indexed entirely or rejected without side effects. Re-inserting a
/// metric name replaces its unit and metadata without changing any count.
#[derive(Debug)]
pub struct InMemoryDiscovery {
    tenants: RwLock<FxHashMap<String, TenantIndex>>,
    limits: LimitsConfig,
    closed: AtomicBool,
}

impl Default for InMemoryDiscovery {
    fn default() -> Self {
        Self::new(LimitsConfig::default())
    }
}

impl InMemoryDiscovery {
    /// Creates an empty backend enforcing `limits`.
    #[must_use]
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            tenants: RwLock::new(FxHashMap::default()),
            limits,
            closed: AtomicBool::new(false),
        }
    }

    /// Creates an empty backend from the `limits` section of `config`.
    #[must_use]
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(config.limits.clone())
    }

    /// Shuts the backend down; every later call fails with `BackendUnavailable`.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("in-memory discovery backend closed");
        }
    }

    /// Returns true once [`InMemoryDiscovery::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of distinct metric names indexed for `tenant`.
    #[must_use]
    pub fn metric_count(&self, tenant: &str) -> usize {
        self.tenants
            .read()
            .get(tenant)
            .map_or(0, |index| index.metrics.len())
    }

    /// Number of tenants with at least one indexed metric.
    #[must_use]
    pub fn tenant_count(&self) -> usize {
        self.tenants.read().len()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::BackendUnavailable(
                "in-memory discovery backend is closed".to_string(),
            ));
        }
        Ok(())
    }

    fn collect_matches<T, F>(&self, tenant: &str, query: &str, to_result: F) -> Result<Vec<T>>
    where
        F: Fn(&Metric) -> T,
    {
        self.ensure_open()?;
        let pattern = GlobPattern::parse(query)?;
        let tenants = self.tenants.read();
        let Some(index) = tenants.get(tenant) else {
            debug!(tenant, query, "search against unknown tenant");
            return Ok(Vec::new());
        };

        let mut results: Vec<T> = if pattern.is_literal() {
            index
                .metrics
                .get(pattern.as_str())
                .map(&to_result)
                .into_iter()
                .collect()
        } else {
            index
                .metrics
                .values()
                .filter(|m| pattern.matches(m.locator().metric_name()))
                .map(&to_result)
                .collect()
        };

        if results.len() > self.limits.max_results {
            warn!(
                tenant,
                query,
                found = results.len(),
                max = self.limits.max_results,
                "truncating discovery results"
            );
            results.truncate(self.limits.max_results);
        }
        debug!(tenant, query, count = results.len(), "discovery search");
        Ok(results)
    }
}

impl DiscoveryIo for InMemoryDiscovery {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn insert_discovery_batch(&self, metrics: Vec<Metric>) -> Result<()> {
        self.ensure_open()?;
        if metrics.len() > self.limits.max_batch_size {
            warn!(
                size = metrics.len(),
                max = self.limits.max_batch_size,
                "rejecting oversized discovery batch"
            );
            return Err(Error::BatchTooLarge {
                size: metrics.len(),
                max: self.limits.max_batch_size,
            });
        }
        for metric in &metrics {
            metric.locator().validate()?;
        }
        if metrics.is_empty() {
            return Ok(());
        }

        let batch_size = metrics.len();
        let mut new_names = 0usize;
        let mut tenants = self.tenants.write();
        for metric in metrics {
            let index = tenants
                .entry(metric.locator().tenant_id().to_string())
                .or_default();
            let name = metric.locator().metric_name().to_string();
            if index.metrics.insert(name.clone(), metric).is_none() {
                index.counts.index(&name);
                new_names += 1;
            }
        }
        drop(tenants);

        info!(batch_size, new_names, "indexed discovery batch");
        Ok(())
    }

    fn search(&self, tenant: &str, query: &str) -> Result<Vec<SearchResult>> {
        self.collect_matches(tenant, query, SearchResult::from_metric)
    }

    fn get_metric_names(&self, tenant: &str, query: &str) -> Result<Vec<MetricName>> {
        self.collect_matches(tenant, query, |m| {
            MetricName::complete(m.locator().metric_name())
        })
    }

    fn aggregate_paths(&self, tenant: &str, prefix: &str) -> Result<Vec<IndexedPath>> {
        self.ensure_open()?;
        let pattern = GlobPattern::parse(prefix)?;
        let tenants = self.tenants.read();
        let Some(index) = tenants.get(tenant) else {
            debug!(tenant, prefix, "aggregation against unknown tenant");
            return Ok(Vec::new());
        };

        let mut paths = index
            .counts
            .paths_under(pattern.depth(), |base| pattern.matches(base));
        for entry in &mut paths {
            entry.kind = Some(if index.metrics.contains_key(&entry.path) {
                PathKind::Terminal
            } else {
                PathKind::Prefix
            });
        }
        paths.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(tenant, prefix, count = paths.len(), "aggregated indexed paths");
        Ok(paths)
    }
}
