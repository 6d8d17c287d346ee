//! Storage error types.

use std::time::Duration;

use thiserror::Error;

/// Storage-specific errors reported by a key-value engine.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Namespace has not been created.
    #[error("namespace not found: {namespace}")]
    NamespaceNotFound { namespace: String },

    /// Engine could not be opened.
    #[error("storage connection error: {message}")]
    ConnectionError { message: String },

    /// Transaction could not be started, committed or rolled back.
    #[error("transaction error: {message}")]
    TransactionError { message: String },

    /// A read, write or iteration inside a transaction failed.
    #[error("storage query error: {message}")]
    QueryError { message: String },

    /// Health check failed.
    #[error("health check failed: {message}")]
    HealthCheckFailed { message: String },

    /// Internal error.
    #[error("internal storage error: {message}")]
    InternalError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of an engine health check.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the engine answered the probe.
    pub healthy: bool,
    /// Time taken by the probe.
    pub latency: Duration,
    /// Engine name, for display.
    pub message: Option<String>,
}
