//! In-memory engine implementation.
//!
//! Namespaces are ordered maps behind a single `parking_lot::RwLock`:
//! read-only transactions share the lock, a read-write transaction holds it
//! exclusively for its whole scope. Writes are applied in place and recorded
//! in an undo log that is replayed backwards when the transaction body fails
//! or panics.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::error::{HealthStatus, StorageError, StorageResult};
use crate::traits::{probe, Cursor, KvEngine, KvPair, ReadTxn, WriteTxn};

type Bucket = BTreeMap<Vec<u8>, Vec<u8>>;
type Namespaces = HashMap<String, Bucket>;

/// In-memory implementation of [`KvEngine`].
///
/// # Performance Characteristics
///
/// - **Point read/write**: O(log N) (BTreeMap)
/// - **Cursor scan**: O(N) in key order
/// - **Rollback**: O(W) where W is the number of writes in the transaction
#[derive(Debug, Default)]
pub struct MemoryEngine {
    namespaces: RwLock<Namespaces>,
}

impl MemoryEngine {
    /// Creates a new, empty in-memory engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory engine wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

fn bucket<'a>(namespaces: &'a Namespaces, namespace: &str) -> StorageResult<&'a Bucket> {
    namespaces
        .get(namespace)
        .ok_or_else(|| StorageError::NamespaceNotFound {
            namespace: namespace.to_string(),
        })
}

fn scan<'a>(namespaces: &'a Namespaces, namespace: &str) -> StorageResult<Cursor<'a>> {
    let bucket = bucket(namespaces, namespace)?;
    Ok(Box::new(bucket.iter().map(|(k, v)| -> StorageResult<KvPair> {
        Ok((k.clone(), v.clone()))
    })))
}

struct MemoryReadTxn<'a> {
    namespaces: RwLockReadGuard<'a, Namespaces>,
}

impl ReadTxn for MemoryReadTxn<'_> {
    fn get(&self, namespace: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(bucket(&self.namespaces, namespace)?.get(key).cloned())
    }

    fn cursor<'a>(&'a self, namespace: &str) -> StorageResult<Cursor<'a>> {
        scan(&self.namespaces, namespace)
    }
}

/// Previous state of a key touched by a write transaction.
struct UndoEntry {
    namespace: String,
    key: Vec<u8>,
    previous: Option<Vec<u8>>,
}

struct MemoryWriteTxn<'a> {
    namespaces: RwLockWriteGuard<'a, Namespaces>,
    undo: Vec<UndoEntry>,
    committed: bool,
}

impl<'a> MemoryWriteTxn<'a> {
    fn new(namespaces: RwLockWriteGuard<'a, Namespaces>) -> Self {
        Self {
            namespaces,
            undo: Vec::new(),
            committed: false,
        }
    }

    fn bucket_mut(&mut self, namespace: &str) -> StorageResult<&mut Bucket> {
        self.namespaces
            .get_mut(namespace)
            .ok_or_else(|| StorageError::NamespaceNotFound {
                namespace: namespace.to_string(),
            })
    }

    fn rollback(&mut self) {
        let writes = self.undo.len();
        while let Some(entry) = self.undo.pop() {
            let Some(bucket) = self.namespaces.get_mut(&entry.namespace) else {
                continue;
            };
            match entry.previous {
                Some(value) => {
                    bucket.insert(entry.key, value);
                }
                None => {
                    bucket.remove(&entry.key);
                }
            }
        }
        trace!(writes, "rolled back in-memory transaction");
    }
}

impl Drop for MemoryWriteTxn<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

impl ReadTxn for MemoryWriteTxn<'_> {
    fn get(&self, namespace: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(bucket(&self.namespaces, namespace)?.get(key).cloned())
    }

    fn cursor<'a>(&'a self, namespace: &str) -> StorageResult<Cursor<'a>> {
        scan(&self.namespaces, namespace)
    }
}

impl WriteTxn for MemoryWriteTxn<'_> {
    fn put(&mut self, namespace: &str, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let previous = self.bucket_mut(namespace)?.insert(key.to_vec(), value.to_vec());
        self.undo.push(UndoEntry {
            namespace: namespace.to_string(),
            key: key.to_vec(),
            previous,
        });
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &[u8]) -> StorageResult<()> {
        if let Some(previous) = self.bucket_mut(namespace)?.remove(key) {
            self.undo.push(UndoEntry {
                namespace: namespace.to_string(),
                key: key.to_vec(),
                previous: Some(previous),
            });
        }
        Ok(())
    }
}

impl KvEngine for MemoryEngine {
    fn create_namespace(&self, namespace: &str) -> StorageResult<()> {
        self.namespaces
            .write()
            .entry(namespace.to_string())
            .or_default();
        Ok(())
    }

    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StorageError>,
    {
        let txn = MemoryReadTxn {
            namespaces: self.namespaces.read(),
        };
        f(&txn)
    }

    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut txn = MemoryWriteTxn::new(self.namespaces.write());
        let result = f(&mut txn);
        if result.is_ok() {
            txn.committed = true;
        }
        result
    }

    fn health_check(&self) -> StorageResult<HealthStatus> {
        let start = Instant::now();
        probe(self)?;
        Ok(HealthStatus {
            healthy: true,
            latency: start.elapsed(),
            message: Some("memory".to_string()),
        })
    }
}
