//! Transactional key-value engine boundary.
//!
//! The mapping store only needs a small slice of an embedded engine:
//! namespaced byte keys, point reads and writes, an ordered forward cursor,
//! and scoped read-only / read-write transactions. Engines expose exactly
//! that through [`KvEngine`], [`ReadTxn`] and [`WriteTxn`].
//!
//! # Transaction scopes
//!
//! ```text
//! view(|tx| ...)    read-only, may run in parallel with other views
//! update(|tx| ...)  read-write, serialized against every other transaction;
//!                   commits when the body returns Ok, rolls back on Err
//! ```
//!
//! Scopes are closures so that a transaction can never outlive the call that
//! opened it.

use crate::error::{HealthStatus, StorageError, StorageResult};

/// A single key/value pair yielded by a cursor.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ordered forward cursor over every pair in a namespace.
pub type Cursor<'a> = Box<dyn Iterator<Item = StorageResult<KvPair>> + 'a>;

/// Read access inside a transaction.
pub trait ReadTxn {
    /// Fetches the value stored under `key`, if any.
    fn get(&self, namespace: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Opens a forward cursor positioned at the first key of the namespace.
    ///
    /// Pairs are yielded in ascending byte order of their keys.
    fn cursor<'a>(&'a self, namespace: &str) -> StorageResult<Cursor<'a>>;
}

/// Write access inside a read-write transaction.
pub trait WriteTxn: ReadTxn {
    /// Stores `value` under `key`, replacing any previous value.
    fn put(&mut self, namespace: &str, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&mut self, namespace: &str, key: &[u8]) -> StorageResult<()>;
}

/// An embedded transactional key-value engine.
///
/// Implementations must be thread-safe; the engine handle is the only state
/// shared between concurrent callers. Errors produced by the engine reach the
/// transaction body's error type through `From<StorageError>`.
pub trait KvEngine: Send + Sync + 'static {
    /// Creates `namespace` if it does not exist yet. Idempotent.
    fn create_namespace(&self, namespace: &str) -> StorageResult<()>;

    /// Runs `f` inside a read-only transaction.
    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StorageError>;

    /// Runs `f` inside a read-write transaction.
    ///
    /// Changes are committed when `f` returns `Ok` and discarded when it
    /// returns `Err`.
    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StorageError>;

    /// Probes the engine with a write/read/delete round trip.
    fn health_check(&self) -> StorageResult<HealthStatus>;
}

/// Namespace used by engine health checks.
pub(crate) const HEALTH_NAMESPACE: &str = "__health_check__";

/// Shared health probe: writes, reads back and deletes a marker key.
pub(crate) fn probe<K: KvEngine>(engine: &K) -> StorageResult<()> {
    const KEY: &[u8] = b"probe";
    const VALUE: &[u8] = b"ok";

    engine.create_namespace(HEALTH_NAMESPACE)?;
    engine.update(|tx| -> StorageResult<()> {
        tx.put(HEALTH_NAMESPACE, KEY, VALUE)?;
        match tx.get(HEALTH_NAMESPACE, KEY)? {
            Some(value) if value == VALUE => {}
            _ => {
                return Err(StorageError::HealthCheckFailed {
                    message: "Health check read returned unexpected value".to_string(),
                })
            }
        }
        tx.delete(HEALTH_NAMESPACE, KEY)
    })
}
