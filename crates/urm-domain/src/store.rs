//! Transactional mapping store.
//!
//! # Layout
//!
//! ```text
//! namespace: userresourcemappingsv1 (configurable per store)
//! key:       hex(resource_id) ++ hex(user_id)   see `keys`
//! value:     JSON-encoded UserResourceMapping
//! ```
//!
//! Each operation runs in exactly one engine transaction. `create` checks
//! for an existing key and inserts inside the same read-write transaction,
//! so two concurrent creates of one pair cannot both succeed. Deep
//! resolution runs all of its scans inside one read-only transaction.
//!
//! Scans decode every stored value. A value that fails to decode aborts the
//! scan with `DomainError::Corruption`; partial results are never returned.
//!
//! The synchronous methods block on the engine. [`MappingService`] is
//! implemented on top of them with `tokio::task::spawn_blocking`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use urm_storage::{HealthStatus, KvEngine, ReadTxn};

use crate::error::{DomainError, DomainResult};
use crate::filter::{DeepMappingFilter, MappingFilter};
use crate::keys;
use crate::model::{Id, UserResourceMapping};
use crate::resolver::{DeepResolver, MappingScan};
use crate::service::{
    parse_continuation_token, resolve_page_size, MappingService, PaginatedResult,
    PaginationOptions,
};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "userresourcemappingsv1";

/// Mapping store over one namespace of a [`KvEngine`].
pub struct MappingStore<E> {
    engine: Arc<E>,
    namespace: Arc<str>,
}

impl<E> Clone for MappingStore<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            namespace: Arc::clone(&self.namespace),
        }
    }
}

impl<E> fmt::Debug for MappingStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl<E: KvEngine> MappingStore<E> {
    /// Creates a store over an existing namespace.
    pub fn new(engine: Arc<E>, namespace: impl Into<String>) -> Self {
        Self {
            engine,
            namespace: Arc::from(namespace.into()),
        }
    }

    /// Creates the namespace if needed and returns a store over it.
    pub fn open(engine: Arc<E>, namespace: impl Into<String>) -> DomainResult<Self> {
        let store = Self::new(engine, namespace);
        store.engine.create_namespace(&store.namespace)?;
        Ok(store)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// - `Codec` if either identifier is zero
    /// - `Conflict` if a mapping already exists for the pair
    #[instrument(skip_all, fields(
        namespace = %self.namespace,
        resource_id = %mapping.resource_id,
        user_id = %mapping.user_id
    ))]
    pub fn create(&self, mapping: &UserResourceMapping) -> DomainResult<()> {
        mapping.validate()?;
        let key = keys::mapping_key(mapping)?;
        let value = serde_json::to_vec(mapping).map_err(|e| DomainError::Serialization {
            message: format!("Failed to serialize mapping: {e}"),
        })?;
        let namespace = &*self.namespace;

        self.engine.update(|tx| -> DomainResult<()> {
            if tx.get(namespace, &key)?.is_some_and(|v| !v.is_empty()) {
                return Err(DomainError::Conflict {
                    resource_id: mapping.resource_id,
                    user_id: mapping.user_id,
                });
            }
            tx.put(namespace, &key, &value)?;
            Ok(())
        })?;

        debug!("created user resource mapping");
        Ok(())
    }

    /// Fetches the mapping for a pair.
    #[instrument(skip_all, fields(
        namespace = %self.namespace,
        resource_id = %resource_id,
        user_id = %user_id
    ))]
    pub fn get(&self, resource_id: Id, user_id: Id) -> DomainResult<UserResourceMapping> {
        let key = keys::encode(resource_id, user_id)?;
        self.engine
            .view(|tx| read_record(tx, &self.namespace, &key))?
            .ok_or(DomainError::NotFound {
                resource_id,
                user_id,
            })
    }

    /// Deletes the mapping for a pair.
    #[instrument(skip_all, fields(
        namespace = %self.namespace,
        resource_id = %resource_id,
        user_id = %user_id
    ))]
    pub fn delete(&self, resource_id: Id, user_id: Id) -> DomainResult<()> {
        let key = keys::encode(resource_id, user_id)?;
        let namespace = &*self.namespace;

        self.engine.update(|tx| -> DomainResult<()> {
            if read_record(&*tx, namespace, &key)?.is_none() {
                return Err(DomainError::NotFound {
                    resource_id,
                    user_id,
                });
            }
            tx.delete(namespace, &key)?;
            Ok(())
        })?;

        debug!("deleted user resource mapping");
        Ok(())
    }

    /// Returns every mapping matching `filter` in key order, with the count.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub fn list(
        &self,
        filter: &MappingFilter,
    ) -> DomainResult<(Vec<UserResourceMapping>, usize)> {
        let mappings = self
            .engine
            .view(|tx| scan(tx, &self.namespace, filter))?;
        let count = mappings.len();
        Ok((mappings, count))
    }

    /// Returns one page of [`list`](Self::list).
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub fn list_paginated(
        &self,
        filter: &MappingFilter,
        pagination: &PaginationOptions,
    ) -> DomainResult<PaginatedResult<UserResourceMapping>> {
        let page_size = resolve_page_size(pagination.page_size)?;
        let offset = parse_continuation_token(&pagination.continuation_token)?;

        let (mappings, total) = self.list(filter)?;
        let items: Vec<UserResourceMapping> =
            mappings.into_iter().skip(offset).take(page_size).collect();

        let next_offset = offset + items.len();
        let continuation_token = (next_offset < total).then(|| next_offset.to_string());

        Ok(PaginatedResult {
            items,
            continuation_token,
        })
    }

    /// Deep resolution over a single read-only transaction.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub fn find_deep(
        &self,
        filter: &DeepMappingFilter,
    ) -> DomainResult<(Vec<UserResourceMapping>, usize)> {
        let mappings = self.engine.view(|tx| {
            DeepResolver::new(TxScanner {
                tx,
                namespace: &self.namespace,
            })
            .resolve(filter)
        })?;
        let count = mappings.len();
        Ok((mappings, count))
    }

    pub fn health_check(&self) -> DomainResult<HealthStatus> {
        Ok(self.engine.health_check()?)
    }

    /// Runs `f` against a clone of this store on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(MappingStore<E>) -> DomainResult<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(store))
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: tokio::task::JoinError) -> DomainError {
    DomainError::Internal {
        message: format!("Task join error: {e}"),
    }
}

/// Scanner bound to one open transaction.
struct TxScanner<'a, T: ?Sized> {
    tx: &'a T,
    namespace: &'a str,
}

impl<T: ReadTxn + ?Sized> MappingScan for TxScanner<'_, T> {
    fn scan(&self, filter: &MappingFilter) -> DomainResult<Vec<UserResourceMapping>> {
        scan(self.tx, self.namespace, filter)
    }
}

/// Reads one record. Absent keys and empty values are both `None`.
fn read_record<T: ReadTxn + ?Sized>(
    tx: &T,
    namespace: &str,
    key: &[u8],
) -> DomainResult<Option<UserResourceMapping>> {
    match tx.get(namespace, key)? {
        Some(value) if !value.is_empty() => decode_record(key, &value).map(Some),
        _ => Ok(None),
    }
}

/// Full forward scan of the namespace, keeping records that match `filter`.
fn scan<T: ReadTxn + ?Sized>(
    tx: &T,
    namespace: &str,
    filter: &MappingFilter,
) -> DomainResult<Vec<UserResourceMapping>> {
    let mut matches = Vec::new();
    for item in tx.cursor(namespace)? {
        let (key, value) = item?;
        let mapping = decode_record(&key, &value)?;
        if filter.matches(&mapping) {
            matches.push(mapping);
        }
    }
    Ok(matches)
}

fn decode_record(key: &[u8], value: &[u8]) -> DomainResult<UserResourceMapping> {
    let mapping: UserResourceMapping =
        serde_json::from_slice(value).map_err(|e| corruption(key, e.to_string()))?;

    // A record must live under its own key.
    match keys::mapping_key(&mapping) {
        Ok(expected) if expected == key => Ok(mapping),
        _ => Err(corruption(key, "record does not match its key")),
    }
}

fn corruption(key: &[u8], message: impl Into<String>) -> DomainError {
    let (resource_id, user_id) = match keys::decode(key) {
        Ok((resource_id, user_id)) => (Some(resource_id), Some(user_id)),
        Err(_) => (None, None),
    };
    let key = String::from_utf8_lossy(key).into_owned();
    let message = message.into();
    warn!(key = %key, error = %message, "corrupt user resource mapping");
    DomainError::Corruption {
        key,
        resource_id,
        user_id,
        message,
    }
}

#[async_trait]
impl<E: KvEngine> MappingService for MappingStore<E> {
    async fn create_mapping(&self, mapping: &UserResourceMapping) -> DomainResult<()> {
        let mapping = mapping.clone();
        self.blocking(move |store| store.create(&mapping)).await
    }

    async fn find_mapping(
        &self,
        resource_id: Id,
        user_id: Id,
    ) -> DomainResult<UserResourceMapping> {
        self.blocking(move |store| store.get(resource_id, user_id))
            .await
    }

    async fn find_mappings(
        &self,
        filter: &MappingFilter,
    ) -> DomainResult<(Vec<UserResourceMapping>, usize)> {
        let filter = *filter;
        self.blocking(move |store| store.list(&filter)).await
    }

    async fn find_mappings_paginated(
        &self,
        filter: &MappingFilter,
        pagination: &PaginationOptions,
    ) -> DomainResult<PaginatedResult<UserResourceMapping>> {
        let filter = *filter;
        let pagination = pagination.clone();
        self.blocking(move |store| store.list_paginated(&filter, &pagination))
            .await
    }

    async fn find_deep_mappings(
        &self,
        filter: &DeepMappingFilter,
    ) -> DomainResult<(Vec<UserResourceMapping>, usize)> {
        let filter = *filter;
        self.blocking(move |store| store.find_deep(&filter)).await
    }

    async fn delete_mapping(&self, resource_id: Id, user_id: Id) -> DomainResult<()> {
        self.blocking(move |store| store.delete(resource_id, user_id))
            .await
    }

    async fn health_check(&self) -> DomainResult<HealthStatus> {
        self.blocking(|store| store.health_check()).await
    }
}
