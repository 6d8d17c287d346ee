//! urm-storage: Transactional key-value engine layer
//!
//! This crate provides the engine boundary used by the user-resource mapping
//! store, including:
//! - KvEngine / ReadTxn / WriteTxn traits
//! - In-memory engine for tests and single-process deployments
//! - RocksDB engine for persistent deployments (feature `rocksdb`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                urm-storage                  │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs  - Engine and transaction traits │
//! │  memory.rs  - In-memory engine              │
//! │  rocksdb.rs - RocksDB engine                │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocksdb;
pub mod traits;

// Re-export commonly used types
pub use error::{HealthStatus, StorageError, StorageResult};
pub use memory::MemoryEngine;
#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDBConfig, RocksDBEngine};
pub use traits::{Cursor, KvEngine, KvPair, ReadTxn, WriteTxn};
