//! Configuration for discovery backends.
//!
//! Values are layered with `figment`: built-in defaults, then an optional
//! TOML file, then `METRIC_INDEX_*` environment variables. Nested keys use a
//! double underscore, e.g. `METRIC_INDEX_LIMITS__MAX_RESULTS=500`.
//!
//! ```toml
//! backend = "memory"
//!
//! [limits]
//! max_batch_size = 10000
//! max_results = 100000
//!
//! [logging]
//! level = "info"
//! with_target = true
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "METRIC_INDEX_";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A value is outside its accepted range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Dotted key of the offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Registry key of the backend to instantiate (`memory`, `noop`, ...).
    pub backend: String,
    /// Request limits enforced by backends.
    pub limits: LimitsConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            limits: LimitsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest batch accepted by `insert_discovery_batch`.
    pub max_batch_size: usize,
    /// Largest number of results returned by one search call.
    pub max_results: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 10_000,
            max_results: 100_000,
        }
    }
}

/// Logging settings consumed by [`crate::logging::init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Include the event target (module path) in each line.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
        }
    }
}

impl DiscoveryConfig {
    /// Loads configuration from defaults, an optional TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if a source cannot be read or deserialized,
    /// or `ConfigError::InvalidValue` if validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Parse(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string (no environment overrides).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on invalid TOML or
    /// `ConfigError::InvalidValue` if validation fails.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates field ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "backend".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.limits.max_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_batch_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.limits.max_results == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_results".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
