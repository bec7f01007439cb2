//! Per-query level classifier over aggregated path counts.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::{self, IndexedPath, PathKind};

#[derive(Debug, Clone, Copy)]
struct PathRecord {
    depth: usize,
    doc_count: u64,
    kind: Option<PathKind>,
}

/// Classification of one browse level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelClassification {
    /// Depth of the browsed prefix.
    pub target_depth: usize,
    /// Last segments of the paths one level below the prefix.
    pub tokens_with_next_level: BTreeSet<String>,
    /// Complete metric names at the prefix depth.
    pub base_level_complete_names: BTreeSet<String>,
    /// Complete metric names one level below the prefix.
    pub next_level_complete_names: BTreeSet<String>,
}

/// Accumulates `(path, doc_count)` pairs from one backend aggregation and
/// partitions them relative to a target depth.
///
/// Built, populated and read within a single browse request; it is neither
/// shared nor locked.
///
/// # Completeness
///
/// A path added with an explicit [`PathKind`] is complete iff it is
/// `Terminal`. A count-only path is complete iff its document count exceeds
/// the summed counts of its direct children: under the path-hierarchy model
/// the difference is the number of metric names ending exactly there. Count
/// inference at depth `d` therefore needs the paths of depth `d + 1` under it.
///
/// Depth-1 counts cannot tell a single-segment metric from a token with the
/// same text, so a depth-1 classifier only accepts depth-1 paths that carry
/// an explicit kind.
///
/// # Example
///
/// ```rust
/// use metric_index_core::classifier::MetricIndexData;
///
/// // Counts for the metrics foo.bar.baz.qux and foo.bar, browsing foo.bar
/// let mut data = MetricIndexData::new(2).unwrap();
/// for (path, count) in [("foo.bar", 2), ("foo.bar.baz", 1), ("foo.bar.baz.qux", 1)] {
///     data.add(path, count).unwrap();
/// }
/// assert!(data.tokens_with_next_level().contains("baz"));
/// assert!(data.base_level_complete_metric_names().contains("foo.bar"));
/// assert!(data.next_level_complete_metric_names().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MetricIndexData {
    target_depth: usize,
    records: FxHashMap<String, PathRecord>,
}

impl MetricIndexData {
    /// Creates a classifier for a prefix of `target_depth` segments.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTargetDepth` if `target_depth` is 0 or two
    /// levels below it cannot be represented.
    pub fn new(target_depth: usize) -> Result<Self> {
        if target_depth == 0 || target_depth.checked_add(2).is_none() {
            return Err(Error::InvalidTargetDepth(target_depth));
        }
        Ok(Self {
            target_depth,
            records: FxHashMap::default(),
        })
    }

    /// Depth of the browsed prefix.
    #[must_use]
    pub fn target_depth(&self) -> usize {
        self.target_depth
    }

    /// Number of distinct stored paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no path has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registers a count-only path. A later call for the same path replaces it.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedIndexedPath` for an empty path, an empty
    /// segment or a zero count, and `Error::AmbiguousCompleteness` for a
    /// depth-1 path when the target depth is 1. The classifier is left
    /// unchanged.
    pub fn add(&mut self, path: &str, doc_count: u64) -> Result<()> {
        self.insert(path, doc_count, None)
    }

    /// Registers a path with an explicit terminal flag.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedIndexedPath` for an empty path, an empty
    /// segment or a zero count.
    pub fn add_with_kind(&mut self, path: &str, doc_count: u64, kind: PathKind) -> Result<()> {
        self.insert(path, doc_count, Some(kind))
    }

    /// Registers one backend aggregation entry.
    ///
    /// # Errors
    ///
    /// Same as [`MetricIndexData::add`] for count-only entries, and as
    /// [`MetricIndexData::add_with_kind`] otherwise.
    pub fn add_indexed(&mut self, entry: IndexedPath) -> Result<()> {
        self.insert(&entry.path, entry.doc_count, entry.kind)
    }

    fn insert(&mut self, path: &str, doc_count: u64, kind: Option<PathKind>) -> Result<()> {
        let depth = path::validate_path(path)?;
        if doc_count == 0 {
            return Err(Error::MalformedIndexedPath(format!(
                "zero document count for '{path}'"
            )));
        }
        // A depth-1 count mixes the metric name with same-text tokens
        if kind.is_none() && depth == 1 && self.target_depth == 1 {
            return Err(Error::AmbiguousCompleteness(path.to_string()));
        }
        self.records.insert(
            path.to_string(),
            PathRecord {
                depth,
                doc_count,
                kind,
            },
        );
        Ok(())
    }

    /// Last segments of every stored path at `target_depth + 1`.
    #[must_use]
    pub fn tokens_with_next_level(&self) -> BTreeSet<String> {
        let next = self.target_depth + 1;
        self.records
            .iter()
            .filter(|(_, r)| r.depth == next)
            .map(|(p, _)| path::last_token(p).to_string())
            .collect()
    }

    /// Complete metric names of exactly `target_depth` segments.
    #[must_use]
    pub fn base_level_complete_metric_names(&self) -> BTreeSet<String> {
        self.complete_names_at(self.target_depth)
    }

    /// Complete metric names of exactly `target_depth + 1` segments.
    #[must_use]
    pub fn next_level_complete_metric_names(&self) -> BTreeSet<String> {
        self.complete_names_at(self.target_depth + 1)
    }

    /// Computes all three sets.
    #[must_use]
    pub fn classify(&self) -> LevelClassification {
        LevelClassification {
            target_depth: self.target_depth,
            tokens_with_next_level: self.tokens_with_next_level(),
            base_level_complete_names: self.base_level_complete_metric_names(),
            next_level_complete_names: self.next_level_complete_metric_names(),
        }
    }

    /// Checks that no path at the two classified levels has children holding
    /// more documents than the path itself.
    ///
    /// # Errors
    ///
    /// Returns `Error::InconsistentDocCounts` for the first offending path
    /// (in path order).
    pub fn verify_doc_counts(&self) -> Result<()> {
        for depth in [self.target_depth, self.target_depth + 1] {
            let children = self.child_totals(depth + 1);
            let mut parents: Vec<(&String, &PathRecord)> = self
                .records
                .iter()
                .filter(|(_, r)| r.depth == depth)
                .collect();
            parents.sort_by(|a, b| a.0.cmp(b.0));
            for (p, record) in parents {
                let child_total = children.get(p.as_str()).copied().unwrap_or(0);
                if child_total > record.doc_count {
                    return Err(Error::InconsistentDocCounts {
                        path: p.clone(),
                        doc_count: record.doc_count,
                        children: child_total,
                    });
                }
            }
        }
        Ok(())
    }

    fn complete_names_at(&self, depth: usize) -> BTreeSet<String> {
        let children = self.child_totals(depth + 1);
        self.records
            .iter()
            .filter(|(_, r)| r.depth == depth)
            .filter(|(p, r)| match r.kind {
                Some(kind) => kind == PathKind::Terminal,
                None => r.doc_count > children.get(p.as_str()).copied().unwrap_or(0),
            })
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Sums the counts of stored paths at `depth`, keyed by parent path.
    fn child_totals(&self, depth: usize) -> FxHashMap<&str, u64> {
        let mut totals: FxHashMap<&str, u64> = FxHashMap::default();
        for (p, record) in &self.records {
            if record.depth != depth {
                continue;
            }
            if let Some(parent) = path::parent(p) {
                let total = totals.entry(parent).or_insert(0);
                *total = total.saturating_add(record.doc_count);
            }
        }
        totals
    }
}
