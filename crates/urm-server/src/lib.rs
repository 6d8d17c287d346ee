//! urm-server: Service wiring for user-resource mappings
//!
//! This crate assembles the mapping service from configuration:
//! - Configuration management (YAML + `URM_` environment overrides)
//! - Structured logging setup
//! - Backend factory producing a `MappingService`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 urm-server                  │
//! ├─────────────────────────────────────────────┤
//! │  config.rs       - Configuration loading    │
//! │  observability/  - Logging setup            │
//! │  factory.rs      - Backend selection        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod factory;
pub mod observability;

// Re-exports for convenience
pub use config::{ConfigLoadError, LoggingSettings, ServiceConfig, StorageSettings};
pub use factory::{build_service, FactoryError};
pub use observability::{init_logging, LoggingConfig};
