//! Error types for metric-index-core.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for discovery and classification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while indexing, searching or classifying metric names.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend could not serve the request (unreachable, closed, timed out).
    ///
    /// Transient: callers may retry with backoff.
    #[error("Discovery backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The query pattern or browse prefix is not well formed.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// An indexed path handed to the classifier breaks the tokenizer contract
    /// (empty path, empty segment, zero document count).
    #[error("Malformed indexed path: {0}")]
    MalformedIndexedPath(String),

    /// Classifier target depth is 0, or too large to address two levels below it.
    #[error("Invalid target depth {0}: must be at least 1 and at most usize::MAX - 2")]
    InvalidTargetDepth(usize),

    /// A count-only depth-1 path was given to a depth-1 classifier.
    ///
    /// In the combined path + token view a single-segment metric name and a
    /// token with the same text share one count, so completeness cannot be
    /// inferred; the backend must send an explicit `PathKind`.
    #[error("Ambiguous completeness for '{0}': depth-1 paths need an explicit path kind")]
    AmbiguousCompleteness(String),

    /// Child paths account for more documents than their parent path.
    #[error(
        "Inconsistent document counts for '{path}': children hold {children} documents, path holds {doc_count}"
    )]
    InconsistentDocCounts {
        /// Parent path.
        path: String,
        /// Document count reported for the parent.
        doc_count: u64,
        /// Sum of the document counts of its direct children.
        children: u64,
    },

    /// Metric identity rejected on insert (empty tenant, malformed name).
    #[error("Invalid metric: {0}")]
    InvalidMetric(String),

    /// Batch insert larger than the configured limit.
    #[error("Batch of {size} metrics exceeds the limit of {max}")]
    BatchTooLarge {
        /// Number of metrics in the rejected batch.
        size: usize,
        /// Configured `limits.max_batch_size`.
        max: usize,
    },

    /// No factory registered under the configured backend key.
    #[error("Unknown discovery backend '{0}'")]
    UnknownBackend(String),

    /// A factory is already registered under this key.
    #[error("Discovery backend '{0}' is already registered")]
    BackendAlreadyRegistered(String),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Global tracing subscriber could not be installed.
    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

impl Error {
    /// Returns true if the operation may succeed when retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }

    /// Returns true for backend/tokenizer contract breaches.
    ///
    /// These indicate a bug in a backend adapter rather than bad user input,
    /// and must never be turned into an empty result.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MalformedIndexedPath(_)
                | Self::AmbiguousCompleteness(_)
                | Self::InconsistentDocCounts { .. }
        )
    }
}
