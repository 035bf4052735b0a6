//! Typed load/save of the single persisted document.
//!
//! # Invariants
//! - A missing blob loads as `Document::default()`.
//! - A blob that fails to decode is an error, never silently replaced.

use crate::kv::{KvBackend, KvResult};
use crate::model::document::Document;
use log::debug;
use std::sync::Arc;

/// Storage key used by the original extension (`chrome.storage.local` `db`).
pub const DEFAULT_DOCUMENT_KEY: &str = "db";

#[derive(Clone)]
pub struct DocumentRepository {
    kv: Arc<dyn KvBackend>,
    key: String,
}

impl DocumentRepository {
    pub fn new(kv: Arc<dyn KvBackend>) -> Self {
        Self::with_key(kv, DEFAULT_DOCUMENT_KEY)
    }

    pub fn with_key(kv: Arc<dyn KvBackend>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored document, or `None` when nothing is persisted yet.
    pub async fn load_existing(&self) -> KvResult<Option<Document>> {
        match self.kv.get(&self.key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Returns the stored document or the default one.
    pub async fn load(&self) -> KvResult<Document> {
        Ok(self.load_existing().await?.unwrap_or_default())
    }

    pub async fn save(&self, document: &Document) -> KvResult<()> {
        let raw = serde_json::to_string(document)?;
        debug!(
            "event=document_save module=repo key={} bytes={} requirements={}",
            self.key,
            raw.len(),
            document.requirements.len()
        );
        self.kv.set(&self.key, raw).await
    }
}
