//! SQLite-backed KV backend.
//!
//! # Invariants
//! - One row per key in `kv_store`; `set` is an upsert.
//! - SQLite calls run on the blocking pool, never on async worker threads.

use super::{KvBackend, KvError, KvResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::now_epoch_ms;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SqliteKvBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKvBackend {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> KvResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection that already has migrations applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run_blocking<T, F>(&self, task: F) -> KvResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> KvResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || task(&*lock(&conn)?))
            .await
            .map_err(|err| KvError::Unavailable(format!("sqlite task failed: {err}")))?
    }
}

#[async_trait]
impl KvBackend for SqliteKvBackend {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1;",
                    [key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        let key = key.to_string();
        self.run_blocking(move |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value, now_epoch_ms()],
            )?;
            Ok(())
        })
        .await
    }
}

fn lock(conn: &Mutex<Connection>) -> KvResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| KvError::Unavailable("sqlite connection lock poisoned".to_string()))
}
