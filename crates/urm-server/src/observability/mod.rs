//! Observability infrastructure for the mapping service.
//!
//! This module provides structured logging configuration. Store operations
//! emit `tracing` spans and events; this is where they get a subscriber.

pub mod logging;

pub use logging::{create_json_layer, init_logging, LoggingConfig};
