//! Static registry mapping a configuration key to a backend factory.
//!
//! The active backend is chosen once at startup from
//! [`DiscoveryConfig::backend`]:
//!
//! ```rust
//! use metric_index_core::discovery::{BackendRegistry, DiscoveryIo};
//! use metric_index_core::DiscoveryConfig;
//!
//! let registry = BackendRegistry::with_builtin_backends();
//! let config = DiscoveryConfig::from_toml_str("backend = \"noop\"").unwrap();
//! let backend = registry.create(&config).unwrap();
//! assert_eq!(backend.backend_name(), "noop");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use super::{DiscoveryIo, InMemoryDiscovery, NoopDiscovery};
use crate::config::DiscoveryConfig;
use crate::error::{Error, Result};

/// Builds a backend from the loaded configuration.
pub type BackendFactory = fn(&DiscoveryConfig) -> Result<Arc<dyn DiscoveryIo>>;

/// Name → factory table for discovery backends.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

fn memory_factory(config: &DiscoveryConfig) -> Result<Arc<dyn DiscoveryIo>> {
    Ok(Arc::new(InMemoryDiscovery::from_config(config)))
}

fn noop_factory(_config: &DiscoveryConfig) -> Result<Arc<dyn DiscoveryIo>> {
    Ok(Arc::new(NoopDiscovery::new()))
}

impl BackendRegistry {
    /// Creates a registry with no backends.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `memory` and `noop` backends.
    #[must_use]
    pub fn with_builtin_backends() -> Self {
        let mut factories: BTreeMap<String, BackendFactory> = BTreeMap::new();
        factories.insert("memory".to_string(), memory_factory);
        factories.insert("noop".to_string(), noop_factory);
        Self { factories }
    }

    /// Registers `factory` under `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::BackendAlreadyRegistered` if `name` is taken.
    pub fn register(&mut self, name: impl Into<String>, factory: BackendFactory) -> Result<()> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(Error::BackendAlreadyRegistered(name));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Registered keys in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiates the backend named by `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownBackend` if no factory is registered under that
    /// key, or whatever the factory itself returns.
    pub fn create(&self, config: &DiscoveryConfig) -> Result<Arc<dyn DiscoveryIo>> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| Error::UnknownBackend(config.backend.clone()))?;
        let backend = factory(config)?;
        info!(backend = %config.backend, "discovery backend initialized");
        Ok(backend)
    }
}
