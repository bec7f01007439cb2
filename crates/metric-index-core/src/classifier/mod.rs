//! Level classifier for browse queries.
//!
//! Turns the flat `(indexed path, document count)` output of a backend
//! aggregation into the three answers a browse request needs for a prefix of
//! depth N:
//! - the child tokens at depth N + 1
//! - the complete metric names at depth N
//! - the complete metric names at depth N + 1

mod index_data;


pub use index_data::{LevelClassification, MetricIndexData};
