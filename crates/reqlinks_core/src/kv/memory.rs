//! Process-local KV backend.

use super::{KvBackend, KvError, KvResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory backend, used by tests and by hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryKvBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> KvResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| KvError::Unavailable("memory kv lock poisoned".to_string()))
    }
}

#[async_trait]
impl KvBackend for MemoryKvBackend {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        self.entries()?.insert(key.to_string(), value);
        Ok(())
    }
}
