//! Configuration management for the mapping service.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use urm_server::config::ServiceConfig;
//!
//! // Load from file with env overrides
//! let config = ServiceConfig::load("urm.yaml")?;
//!
//! // Or load from environment only
//! let config = ServiceConfig::from_env()?;
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use urm_domain::DEFAULT_NAMESPACE;

/// Environment variable prefix, e.g. `URM_STORAGE__BACKEND`.
const ENV_PREFIX: &str = "URM";

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServiceConfig {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Storage backend settings.
///
/// # Example YAML Configuration
///
/// ```yaml
/// storage:
///   backend: rocksdb
///   data_path: /var/lib/urm
///   namespace: userresourcemappingsv1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Storage backend type: "memory" or "rocksdb"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Data directory path (required if backend is "rocksdb")
    pub data_path: Option<String>,

    /// Namespace holding the mappings
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Create the database directory if it does not exist
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_path: None,
            namespace: default_namespace(),
            create_if_missing: true,
        }
    }
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_true() -> bool {
    true
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServiceConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `URM_` and use `__` as separator.
    /// For example:
    /// - `URM_STORAGE__BACKEND=rocksdb` overrides `storage.backend`
    /// - `URM_LOGGING__JSON=true` overrides `logging.json`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServiceConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let service_config: ServiceConfig = config.try_deserialize()?;
        service_config.validate()?;

        Ok(service_config)
    }

    /// Load configuration from environment variables only.
    ///
    /// Uses default values and allows overrides via `URM_` prefixed env vars.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServiceConfig::default())?)
            .add_source(env_source())
            .build()?;

        let service_config: ServiceConfig = config.try_deserialize()?;
        service_config.validate()?;

        Ok(service_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_backends = ["memory", "rocksdb"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "storage.backend must be one of: {:?}, got: {}",
                    valid_backends, self.storage.backend
                ),
            });
        }

        if self.storage.backend == "rocksdb"
            && self
                .storage
                .data_path
                .as_deref()
                .map_or(true, |s| s.trim().is_empty())
        {
            return Err(ConfigLoadError::Invalid {
                message: "storage.data_path is required when backend is 'rocksdb'".to_string(),
            });
        }

        if self.storage.namespace.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "storage.namespace must not be empty".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

/// `URM_STORAGE__DATA_PATH` -> `storage.data_path`
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
