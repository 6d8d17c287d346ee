//! RocksDB engine implementation.
//!
//! Embedded, persistent engine built on a pessimistic `TransactionDB`.
//!
//! # Layout
//!
//! ```text
//! namespace  -> column family (created on demand, reopened on restart)
//! key/value  -> raw bytes, as supplied by the caller
//! ```
//!
//! # Transactions
//!
//! - `view` opens a transaction with a snapshot that is never committed;
//!   dropping it rolls it back. Every read inside one `view` goes through
//!   that snapshot, so all scans see the same committed state.
//! - `update` reads through `get_for_update`, which takes an exclusive lock
//!   on the key, so a check-then-insert inside one transaction cannot race
//!   another writer. The transaction commits when the body returns `Ok`.
//!
//! Lock waits that exceed RocksDB's lock timeout surface as
//! `StorageError::TransactionError`; nothing is retried here.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rocksdb::{
    BoundColumnFamily, DBCompressionType, IteratorMode, MultiThreaded, Options, ReadOptions,
    Transaction, TransactionDB, TransactionDBOptions, TransactionOptions, WriteOptions,
};
use tracing::{debug, info};

use crate::error::{HealthStatus, StorageError, StorageResult};
use crate::traits::{probe, Cursor, KvEngine, ReadTxn, WriteTxn};

type Db = TransactionDB<MultiThreaded>;

/// Configuration for the RocksDB engine.
#[derive(Debug, Clone)]
pub struct RocksDBConfig {
    /// Path to the RocksDB database directory.
    pub path: String,
    /// Whether to create the database if it doesn't exist.
    pub create_if_missing: bool,
    /// Whether to enable LZ4 compression (default: true).
    pub enable_compression: bool,
    /// Maximum number of background compaction threads (default: 4).
    pub max_background_jobs: i32,
}

impl Default for RocksDBConfig {
    fn default() -> Self {
        Self {
            path: "./urm-data".to_string(),
            create_if_missing: true,
            enable_compression: true,
            max_background_jobs: 4,
        }
    }
}

/// RocksDB implementation of [`KvEngine`].
pub struct RocksDBEngine {
    db: Db,
    config: RocksDBConfig,
}

impl std::fmt::Debug for RocksDBEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDBEngine")
            .field("path", &self.config.path)
            .finish()
    }
}

impl RocksDBEngine {
    /// Opens (or creates) the database described by `config`.
    ///
    /// Column families that already exist on disk are reopened, so namespaces
    /// survive restarts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConnectionError` if the database cannot be opened.
    pub fn new(config: RocksDBConfig) -> StorageResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);
        opts.create_missing_column_families(true);
        opts.set_max_background_jobs(config.max_background_jobs);

        if config.enable_compression {
            opts.set_compression_type(DBCompressionType::Lz4);
        }

        let existing = list_column_families(&opts, &config.path)?;
        debug!(path = %config.path, column_families = ?existing, "opening rocksdb");

        let db = Db::open_cf(&opts, &TransactionDBOptions::default(), &config.path, existing)
            .map_err(|e| StorageError::ConnectionError {
                message: format!("Failed to open RocksDB at {}: {}", config.path, e),
            })?;

        info!(path = %config.path, "rocksdb engine opened");
        Ok(Self { db, config })
    }

    /// Opens the database at the given path with default configuration.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::new(RocksDBConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    /// Returns the configuration for this engine.
    pub fn config(&self) -> &RocksDBConfig {
        &self.config
    }
}

/// Lists the column families of the database at `path`.
///
/// A directory without a `CURRENT` file holds no database yet and has none.
fn list_column_families(opts: &Options, path: &str) -> StorageResult<Vec<String>> {
    if !Path::new(path).join("CURRENT").exists() {
        return Ok(Vec::new());
    }
    Db::list_cf(opts, path).map_err(|e| StorageError::ConnectionError {
        message: format!("Failed to list column families at {path}: {e}"),
    })
}

fn query_error(e: rocksdb::Error) -> StorageError {
    StorageError::QueryError {
        message: e.to_string(),
    }
}

struct RocksTxn<'a> {
    db: &'a Db,
    txn: Transaction<'a, Db>,
    /// Lock keys on read; set for read-write transactions.
    for_update: bool,
}

impl<'a> RocksTxn<'a> {
    /// Read-only transaction pinned to a snapshot taken at begin.
    fn read(db: &'a Db) -> Self {
        let mut txn_opts = TransactionOptions::default();
        txn_opts.set_snapshot(true);
        Self {
            db,
            txn: db.transaction_opt(&WriteOptions::default(), &txn_opts),
            for_update: false,
        }
    }

    /// Read-write transaction; reads see the latest committed data and lock
    /// what they read.
    fn write(db: &'a Db) -> Self {
        Self {
            db,
            txn: db.transaction(),
            for_update: true,
        }
    }

    /// Read options for this transaction. Read-only transactions read
    /// through their snapshot.
    fn read_options(&self) -> ReadOptions {
        let mut opts = ReadOptions::default();
        if !self.for_update {
            opts.set_snapshot(&self.txn.snapshot());
        }
        opts
    }

    fn cf(&self, namespace: &str) -> StorageResult<Arc<BoundColumnFamily<'a>>> {
        self.db
            .cf_handle(namespace)
            .ok_or_else(|| StorageError::NamespaceNotFound {
                namespace: namespace.to_string(),
            })
    }
}

impl ReadTxn for RocksTxn<'_> {
    fn get(&self, namespace: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let cf = self.cf(namespace)?;
        let opts = self.read_options();
        let value = if self.for_update {
            self.txn.get_for_update_cf_opt(&cf, key, true, &opts)
        } else {
            self.txn.get_cf_opt(&cf, key, &opts)
        };
        value.map_err(query_error)
    }

    fn cursor<'c>(&'c self, namespace: &str) -> StorageResult<Cursor<'c>> {
        let cf = self.cf(namespace)?;
        let iter = self
            .txn
            .iterator_cf_opt(&cf, self.read_options(), IteratorMode::Start);
        Ok(Box::new(iter.map(|item| {
            item.map(|(k, v)| (k.into_vec(), v.into_vec()))
                .map_err(query_error)
        })))
    }
}

impl WriteTxn for RocksTxn<'_> {
    fn put(&mut self, namespace: &str, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let cf = self.cf(namespace)?;
        self.txn.put_cf(&cf, key, value).map_err(query_error)
    }

    fn delete(&mut self, namespace: &str, key: &[u8]) -> StorageResult<()> {
        let cf = self.cf(namespace)?;
        self.txn.delete_cf(&cf, key).map_err(query_error)
    }
}

impl KvEngine for RocksDBEngine {
    fn create_namespace(&self, namespace: &str) -> StorageResult<()> {
        if self.db.cf_handle(namespace).is_some() {
            return Ok(());
        }
        self.db
            .create_cf(namespace, &Options::default())
            .map_err(|e| StorageError::QueryError {
                message: format!("Failed to create column family {namespace}: {e}"),
            })
    }

    fn view<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTxn) -> Result<T, E>,
        E: From<StorageError>,
    {
        let txn = RocksTxn::read(&self.db);
        f(&txn)
    }

    fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTxn) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut txn = RocksTxn::write(&self.db);
        let value = f(&mut txn)?;
        txn.txn.commit().map_err(|e| {
            E::from(StorageError::TransactionError {
                message: format!("Failed to commit transaction: {e}"),
            })
        })?;
        Ok(value)
    }

    fn health_check(&self) -> StorageResult<HealthStatus> {
        let start = Instant::now();
        probe(self)?;
        Ok(HealthStatus {
            healthy: true,
            latency: start.elapsed(),
            message: Some("rocksdb".to_string()),
        })
    }
}
