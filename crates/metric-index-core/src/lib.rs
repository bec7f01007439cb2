//! # Metric Index Core
//!
//! Discovery and level-by-level browsing of dot-delimited, hierarchical metric
//! names (`foo.bar.baz.qux`) across a multi-tenant namespace.
//!
//! ## Components
//!
//! - **Level classifier** ([`MetricIndexData`]): partitions a backend's
//!   `(indexed path, document count)` aggregation relative to a browsed
//!   depth into child tokens and complete metric names.
//! - **Discovery capability** ([`DiscoveryIo`]): the backend contract for
//!   indexing metric identities and searching a tenant's names, with
//!   in-memory and no-op implementations and a static [`BackendRegistry`].
//! - **Tokenization model** ([`tokenizer`]): the path-hierarchy + dotted-token
//!   analysis backends must honor.
//!
//! ## Quick Start
//!
//! ```rust
//! use metric_index_core::{browse, BackendRegistry, DiscoveryConfig, DiscoveryIo, Locator, Metric};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DiscoveryConfig::default();
//!     let backend = BackendRegistry::with_builtin_backends().create(&config)?;
//!
//!     backend.insert_discovery_batch(vec![
//!         Metric::new(Locator::new("acme", "cpu.idle")?),
//!         Metric::new(Locator::new("acme", "cpu.core0.user")?),
//!     ])?;
//!
//!     let level = browse(backend.as_ref(), "acme", "cpu")?;
//!     assert!(level.tokens_with_next_level.contains("core0"));
//!     assert!(level.next_level_complete_names.contains("cpu.idle"));
//!     # Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(
    test,
    allow(clippy::doc_markdown, clippy::uninlined_format_args, clippy::manual_assert)
)]

pub mod browse;
pub mod classifier;
pub mod config;
pub mod discovery;
pub mod error;
pub mod glob;
pub mod logging;
pub mod metric;
pub mod path;
pub mod tokenizer;

pub use browse::browse;
pub use classifier::{LevelClassification, MetricIndexData};
pub use config::{ConfigError, DiscoveryConfig, LimitsConfig, LoggingConfig};
pub use discovery::{BackendFactory, BackendRegistry, DiscoveryIo, InMemoryDiscovery, NoopDiscovery};
pub use error::{Error, Result};
pub use glob::GlobPattern;
pub use metric::{Locator, Metric, MetricName, SearchResult};
pub use path::{IndexedPath, PathKind};
pub use tokenizer::{fragments_of, PathCounts};
