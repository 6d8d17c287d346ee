//! Backend wiring.
//!
//! Turns the `storage` config section into a ready [`MappingService`]:
//! the engine is opened, the namespace is created, and the store is
//! returned behind a trait object so callers do not depend on the engine
//! type.

use std::sync::Arc;

use tracing::info;
use urm_domain::{DomainError, MappingService, MappingStore};
use urm_storage::MemoryEngine;

use crate::config::StorageSettings;

/// Error type for service construction.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("unsupported storage backend: {backend}")]
    UnsupportedBackend { backend: String },

    #[error("storage.data_path is required when backend is 'rocksdb'")]
    MissingDataPath,

    #[error("failed to open storage: {0}")]
    Open(#[from] DomainError),
}

/// Builds the mapping service for the configured backend.
pub fn build_service(settings: &StorageSettings) -> Result<Arc<dyn MappingService>, FactoryError> {
    match settings.backend.as_str() {
        "memory" => {
            let store = MappingStore::open(MemoryEngine::new_shared(), settings.namespace.as_str())?;
            info!(backend = "memory", namespace = %settings.namespace, "mapping store ready");
            Ok(Arc::new(store))
        }
        "rocksdb" => build_rocksdb(settings),
        other => Err(FactoryError::UnsupportedBackend {
            backend: other.to_string(),
        }),
    }
}

#[cfg(feature = "rocksdb")]
fn build_rocksdb(settings: &StorageSettings) -> Result<Arc<dyn MappingService>, FactoryError> {
    use urm_storage::{RocksDBConfig, RocksDBEngine};

    let path = settings
        .data_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(FactoryError::MissingDataPath)?;

    let engine = RocksDBEngine::new(RocksDBConfig {
        path: path.to_string(),
        create_if_missing: settings.create_if_missing,
        ..Default::default()
    })
    .map_err(DomainError::from)?;

    let store = MappingStore::open(Arc::new(engine), settings.namespace.as_str())?;
    info!(backend = "rocksdb", path, namespace = %settings.namespace, "mapping store ready");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn build_rocksdb(_settings: &StorageSettings) -> Result<Arc<dyn MappingService>, FactoryError> {
    Err(FactoryError::UnsupportedBackend {
        backend: "rocksdb (built without the `rocksdb` feature)".to_string(),
    })
}
