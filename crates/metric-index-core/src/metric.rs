//! Metric identities and search result types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path;

/// Tenant-scoped identity of a metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Locator {
    tenant_id: String,
    metric_name: String,
}

impl Locator {
    /// Creates a locator after validating both parts.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMetric` if the tenant is empty or the name has
    /// an empty segment.
    pub fn new(tenant_id: impl Into<String>, metric_name: impl Into<String>) -> Result<Self> {
        let locator = Self {
            tenant_id: tenant_id.into(),
            metric_name: metric_name.into(),
        };
        locator.validate()?;
        Ok(locator)
    }

    /// Re-checks invariants, e.g. after deserialization.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMetric` describing the defect.
    pub fn validate(&self) -> Result<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(Error::InvalidMetric(format!(
                "empty tenant for metric '{}'",
                self.metric_name
            )));
        }
        path::validate_path(&self.metric_name)
            .map_err(|e| Error::InvalidMetric(format!("{}: {e}", self.metric_name)))?;
        Ok(())
    }

    /// Tenant owning the metric.
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Full dotted metric name.
    #[must_use]
    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    /// Number of segments in the metric name.
    #[must_use]
    pub fn depth(&self) -> usize {
        path::depth(&self.metric_name)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenant_id, self.metric_name)
    }
}

/// A metric identity plus the metadata stored alongside it in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    locator: Locator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl Metric {
    /// Creates a metric without unit or metadata.
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            unit: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the unit reported in search results.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Identity of the metric.
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Unit, if known.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Arbitrary metadata.
    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }
}

/// One metric matched by a search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SearchResult {
    /// Tenant owning the metric.
    pub tenant_id: String,
    /// Full dotted metric name.
    pub metric_name: String,
    /// Unit, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl SearchResult {
    /// Builds a result from an indexed metric.
    #[must_use]
    pub fn from_metric(metric: &Metric) -> Self {
        Self {
            tenant_id: metric.locator.tenant_id.clone(),
            metric_name: metric.locator.metric_name.clone(),
            unit: metric.unit.clone(),
        }
    }
}

/// A name returned by a metric-name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricName {
    /// Dotted name.
    pub name: String,
    /// True if this is a full metric identifier rather than a prefix.
    pub complete: bool,
}

impl MetricName {
    /// A full metric identifier.
    #[must_use]
    pub fn complete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            complete: true,
        }
    }
}
