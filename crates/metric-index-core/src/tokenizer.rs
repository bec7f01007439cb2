//! Path-hierarchy + dotted-token tokenization model.
//!
//! This mirrors the analyzer a search backend is expected to apply to every
//! metric name. For `a.b.c` it emits:
//! - the path hierarchy `a`, `a.b`, `a.b.c`
//! - the dotted tokens `a`, `b`, `c`
//!
//! Each distinct fragment counts once per metric name, so indexing `foo.bar.baz`
//! and `foo.bar` yields `{foo:2, bar:2, baz:1, foo.bar:2, foo.bar.baz:1}`.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::path::{self, IndexedPath, TOKEN_DELIMITER};

/// Returns every prefix of `name` ending on a segment boundary, shortest first.
///
/// The full name is always the last element.
#[must_use]
pub fn path_hierarchy(name: &str) -> Vec<&str> {
    let mut paths: Vec<&str> = name
        .match_indices(TOKEN_DELIMITER)
        .map(|(idx, _)| &name[..idx])
        .collect();
    paths.push(name);
    paths
}

/// Returns the individual segments of `name`.
pub fn dotted_tokens(name: &str) -> impl Iterator<Item = &str> {
    name.split(TOKEN_DELIMITER)
}

/// Returns the distinct fragments (paths and tokens) generated by one name.
#[must_use]
pub fn index_fragments(name: &str) -> BTreeSet<&str> {
    let mut fragments: BTreeSet<&str> = path_hierarchy(name).into_iter().collect();
    fragments.extend(dotted_tokens(name));
    fragments
}

/// Combined path + token document counts for `names`, as a search backend
/// reports them for its single analyzed field.
///
/// Depth-1 paths and tokens with the same text share one entry here. Callers
/// pass each metric name once.
#[must_use]
pub fn fragments_of<'a, I>(names: I) -> FxHashMap<String, u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fragments: FxHashMap<String, u64> = FxHashMap::default();
    for name in names {
        for fragment in index_fragments(name) {
            *fragments.entry(fragment.to_string()).or_insert(0) += 1;
        }
    }
    fragments
}

/// Path-hierarchy document counts for a set of indexed metric names.
///
/// Unlike [`fragments_of`], no token is ever counted as a depth-1 path.
#[derive(Debug, Default, Clone)]
pub struct PathCounts {
    paths: FxHashMap<String, u64>,
}

impl PathCounts {
    /// Creates empty counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds counts for `names`. Callers pass each metric name once.
    #[must_use]
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = Self::new();
        for name in names {
            counts.index(name);
        }
        counts
    }

    /// Adds one metric name.
    pub fn index(&mut self, name: &str) {
        for path in path_hierarchy(name) {
            *self.paths.entry(path.to_string()).or_insert(0) += 1;
        }
    }

    /// Path-hierarchy counts.
    #[must_use]
    pub fn paths(&self) -> &FxHashMap<String, u64> {
        &self.paths
    }

    /// Count for one path of the hierarchy (0 if never indexed).
    #[must_use]
    pub fn path_count(&self, path: &str) -> u64 {
        self.paths.get(path).copied().unwrap_or(0)
    }

    /// Returns hierarchy paths whose ancestor at `base_depth` satisfies
    /// `matches_base`, limited to depths `base_depth..=base_depth + 2`.
    ///
    /// Two levels below the base are included so that completeness of the
    /// next level can be derived from counts.
    pub fn paths_under<F>(&self, base_depth: usize, matches_base: F) -> Vec<IndexedPath>
    where
        F: Fn(&str) -> bool,
    {
        let max_depth = base_depth.saturating_add(2);
        self.paths
            .iter()
            .filter(|(p, _)| {
                let d = path::depth(p);
                d >= base_depth
                    && d <= max_depth
                    && path::ancestor(p, base_depth).is_some_and(&matches_base)
            })
            .map(|(p, &count)| IndexedPath::new(p.clone(), count))
            .collect()
    }

    /// Number of distinct hierarchy paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if nothing has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sorted(map: &FxHashMap<String, u64>) -> BTreeMap<&str, u64> {
        map.iter().map(|(k, v)| (k.as_str(), *v)).collect()
    }

    #[test]
    fn test_path_hierarchy() {
        assert_eq!(path_hierarchy("foo"), vec!["foo"]);
        assert_eq!(
            path_hierarchy("foo.bar.baz"),
            vec!["foo", "foo.bar", "foo.bar.baz"]
        );
    }

    #[test]
    fn test_single_metric_fragments() {
        let fragments = fragments_of(["foo.bar.baz"]);
        let expected: BTreeMap<&str, u64> = [
            ("foo", 1),
            ("bar", 1),
            ("baz", 1),
            ("foo.bar", 1),
            ("foo.bar.baz", 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(sorted(&fragments), expected);
    }

    #[test]
    fn test_single_segment_metric_fragments() {
        let fragments = fragments_of(["foo"]);
        let expected: BTreeMap<&str, u64> = [("foo", 1)].into_iter().collect();
        assert_eq!(sorted(&fragments), expected);
    }

    #[test]
    fn test_multiple_metric_fragments() {
        let fragments = fragments_of(["foo.bar.baz", "foo.bar"]);
        let expected: BTreeMap<&str, u64> = [
            ("foo", 2),
            ("bar", 2),
            ("baz", 1),
            ("foo.bar", 2),
            ("foo.bar.baz", 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(sorted(&fragments), expected);
    }

    #[test]
    fn test_repeated_segment_counts_once_per_name() {
        let fragments = fragments_of(["a.a"]);
        assert_eq!(fragments.get("a"), Some(&1));
        assert_eq!(fragments.get("a.a"), Some(&1));
    }

    #[test]
    fn test_path_counts_exclude_tokens() {
        let names = ["x.foo", "foo.bar"];
        // "foo" is a token of x.foo and a path of foo.bar
        assert_eq!(fragments_of(names).get("foo"), Some(&2));
        let counts = PathCounts::from_names(names);
        assert_eq!(counts.path_count("foo"), 1);
        assert_eq!(counts.path_count("bar"), 0);
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_paths_under_limits_depth() {
        let counts =
            PathCounts::from_names(["foo.bar.baz.qux.quux", "foo.other", "zed.bar"]);
        let mut found: Vec<String> = counts
            .paths_under(2, |base| base == "foo.bar")
            .into_iter()
            .map(|p| p.path)
            .collect();
        found.sort();
        assert_eq!(found, vec!["foo.bar", "foo.bar.baz", "foo.bar.baz.qux"]);
    }
}
