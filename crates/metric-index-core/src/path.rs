//! Dot-delimited metric paths.
//!
//! A path is either a complete metric name (`foo.bar.baz`) or one of its
//! strict prefixes (`foo`, `foo.bar`). Its depth is the number of segments.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Segment separator in metric names.
pub const TOKEN_DELIMITER: char = '.';

/// Returns the number of dot-delimited segments in `path`.
///
/// Does not validate; `depth("")` is 1.
#[must_use]
pub fn depth(path: &str) -> usize {
    path.split(TOKEN_DELIMITER).count()
}

/// Checks that `path` is non-empty and has no empty segment, returning its depth.
///
/// # Errors
///
/// Returns `Error::MalformedIndexedPath` describing the defect.
pub fn validate_path(path: &str) -> Result<usize> {
    if path.is_empty() {
        return Err(Error::MalformedIndexedPath("empty path".to_string()));
    }
    let mut segments = 0usize;
    for segment in path.split(TOKEN_DELIMITER) {
        if segment.is_empty() {
            return Err(Error::MalformedIndexedPath(format!(
                "empty segment in '{path}'"
            )));
        }
        segments += 1;
    }
    Ok(segments)
}

/// Returns the path one level up, or `None` for a single-segment path.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once(TOKEN_DELIMITER).map(|(head, _)| head)
}

/// Returns the final segment of `path`.
#[must_use]
pub fn last_token(path: &str) -> &str {
    path.rsplit_once(TOKEN_DELIMITER)
        .map_or(path, |(_, tail)| tail)
}

/// Returns the first `levels` segments of `path`, or `None` if it is shallower.
#[must_use]
pub fn ancestor(path: &str, levels: usize) -> Option<&str> {
    if levels == 0 {
        return None;
    }
    let mut seen = 0usize;
    for (idx, ch) in path.char_indices() {
        if ch == TOKEN_DELIMITER {
            seen += 1;
            if seen == levels {
                return Some(&path[..idx]);
            }
        }
    }
    (seen + 1 == levels).then_some(path)
}

/// Whether an indexed path is itself a full metric name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Structural prefix only; no metric ends here.
    Prefix,
    /// At least one metric name is exactly this path.
    Terminal,
}

/// One `(path, document count)` pair produced by a backend aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedPath {
    /// Dotted path.
    pub path: String,
    /// Number of metric names that generated this path.
    pub doc_count: u64,
    /// Terminal flag, when the backend knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PathKind>,
}

impl IndexedPath {
    /// Creates a count-only entry; completeness is inferred from counts.
    #[must_use]
    pub fn new(path: impl Into<String>, doc_count: u64) -> Self {
        Self {
            path: path.into(),
            doc_count,
            kind: None,
        }
    }

    /// Creates an entry carrying an explicit terminal flag.
    #[must_use]
    pub fn with_kind(path: impl Into<String>, doc_count: u64, kind: PathKind) -> Self {
        Self {
            path: path.into(),
            doc_count,
            kind: Some(kind),
        }
    }
}
