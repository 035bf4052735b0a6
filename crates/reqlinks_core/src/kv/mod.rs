//! Persistent key-value backend contract.
//!
//! # Responsibility
//! - Describe the host storage the document lives in: async get/set of one
//!   named blob.
//! - Provide the SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set` either stores the full value or reports an error; callers never
//!   observe a half-written blob.
//! - Every failure surfaces as [`KvError`]; the store maps it to
//!   `StorageUnavailable`.

mod memory;
mod sqlite;

pub use memory::MemoryKvBackend;
pub use sqlite::SqliteKvBackend;

use crate::db::DbError;
use async_trait::async_trait;

pub type KvResult<T> = Result<T, KvError>;

/// Failure reading or writing the backing store.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored value could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("{0}")]
    Unavailable(String),
}

/// Async access to named blobs in host storage.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> KvResult<()>;
}
