//! Document store: the single writer of the persisted document.
//!
//! # Responsibility
//! - Expose requirement and link operations over the one stored document.
//! - Serialize load-mutate-persist cycles so concurrent callers never lose
//!   each other's updates.
//!
//! # Invariants
//! - Each mutating call holds the write gate from load through persist.
//! - Mutations apply to an owned copy; a failed persist is reported and
//!   nothing is cached, so callers never observe a partial update.
//! - Domain failures (`NotFound`, `InvalidArgument`) happen before persist
//!   and leave the stored document untouched.

use crate::kv::{KvBackend, KvError};
use crate::model::document::Document;
use crate::model::link::{Link, LinkId, NewLink};
use crate::model::requirement::{Priority, Requirement, RequirementId};
use crate::repo::document_repo::DocumentRepository;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure kinds reported by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Mutation addressed to a requirement id that does not exist.
    #[error("requirement not found: {0}")]
    NotFound(RequirementId),
    /// Backing KV read or write failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] KvError),
    /// Required input missing, e.g. a link without URL.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl StoreError {
    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

pub struct DocumentStore {
    repo: DocumentRepository,
    write_gate: Mutex<()>,
}

impl DocumentStore {
    pub fn new(repo: DocumentRepository) -> Self {
        Self {
            repo,
            write_gate: Mutex::new(()),
        }
    }

    /// Builds a store over `kv` using the default document key.
    pub fn with_backend(kv: Arc<dyn KvBackend>) -> Self {
        Self::new(DocumentRepository::new(kv))
    }

    /// Returns the current document, or the default one when none is stored.
    pub async fn get(&self) -> StoreResult<Document> {
        Ok(self.repo.load().await?)
    }

    /// Persists the default document when nothing is stored yet.
    ///
    /// Returns `true` when the default document was written.
    pub async fn ensure_initialized(&self) -> StoreResult<bool> {
        let _guard = self.write_gate.lock().await;
        if self.repo.load_existing().await?.is_some() {
            return Ok(false);
        }
        self.repo.save(&Document::default()).await?;
        info!(
            "event=store_init module=store status=ok key={}",
            self.repo.key()
        );
        Ok(true)
    }

    /// Creates a requirement, prepends it and marks it as last selected.
    pub async fn create_requirement(&self, title: Option<&str>) -> StoreResult<Requirement> {
        self.mutate("req_create", |document| {
            let requirement = Requirement::new(title);
            document.insert_requirement(requirement.clone());
            Ok(requirement)
        })
        .await
    }

    /// Sets the last-selected pointer. The id is not checked for existence.
    pub async fn select_requirement(&self, id: &RequirementId) -> StoreResult<bool> {
        self.mutate("req_select", |document| {
            document.last_selected_requirement_id = Some(id.clone());
            Ok(true)
        })
        .await
    }

    /// Renames a requirement; blank `title` keeps the current one.
    pub async fn rename_requirement(
        &self,
        id: &RequirementId,
        title: Option<&str>,
    ) -> StoreResult<Requirement> {
        self.update_requirement("req_rename", id, |requirement| {
            requirement.rename(title);
        })
        .await
    }

    pub async fn set_archived(
        &self,
        id: &RequirementId,
        archived: bool,
    ) -> StoreResult<Requirement> {
        self.update_requirement("req_archive", id, |requirement| {
            requirement.archived = archived;
        })
        .await
    }

    /// Stores `priority` as given; the cycle order is enforced by callers.
    pub async fn set_priority(
        &self,
        id: &RequirementId,
        priority: Priority,
    ) -> StoreResult<Requirement> {
        self.update_requirement("req_set_priority", id, |requirement| {
            requirement.priority = Some(priority);
        })
        .await
    }

    /// Deletes a requirement with its links; absent ids are a no-op.
    pub async fn delete_requirement(&self, id: &RequirementId) -> StoreResult<bool> {
        self.mutate("req_delete", |document| {
            document.remove_requirement(id);
            Ok(true)
        })
        .await
    }

    /// Saves a link under `id` unless its URL is already saved there.
    ///
    /// Returns the link built from `input` even when it was a duplicate and
    /// nothing was inserted. Link lists for unknown ids are created.
    ///
    /// # Errors
    /// - `InvalidArgument` when `input.url` is missing or blank.
    pub async fn add_link(&self, id: &RequirementId, input: NewLink) -> StoreResult<Link> {
        let url = input
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| StoreError::InvalidArgument("link url is required".to_string()))?;
        let link = Link::new(url, input.title.as_deref(), input.favicon.as_deref());

        self.mutate("link_add", |document| {
            if !document.push_link(id, link.clone()) {
                info!("event=link_add module=store status=duplicate req_id={id}");
            }
            Ok(link)
        })
        .await
    }

    /// Removes a link; unknown requirement or link ids are a no-op.
    pub async fn remove_link(&self, id: &RequirementId, link_id: &LinkId) -> StoreResult<bool> {
        self.mutate("link_remove", |document| {
            document.remove_link(id, link_id);
            Ok(true)
        })
        .await
    }

    async fn update_requirement(
        &self,
        op: &'static str,
        id: &RequirementId,
        apply: impl FnOnce(&mut Requirement),
    ) -> StoreResult<Requirement> {
        self.mutate(op, |document| {
            let requirement = document
                .requirement_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            apply(&mut *requirement);
            Ok(requirement.clone())
        })
        .await
    }

    async fn mutate<T>(
        &self,
        op: &'static str,
        apply: impl FnOnce(&mut Document) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let _guard = self.write_gate.lock().await;

        let result = match self.repo.load().await {
            Ok(mut document) => match apply(&mut document) {
                Ok(value) => self
                    .repo
                    .save(&document)
                    .await
                    .map(|()| value)
                    .map_err(StoreError::from),
                Err(err) => Err(err),
            },
            Err(err) => Err(err.into()),
        };

        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => info!("event={op} module=store status=ok duration_ms={duration_ms}"),
            Err(err @ StoreError::StorageUnavailable(_)) => error!(
                "event={op} module=store status=error duration_ms={duration_ms} error_code={} error={err}",
                err.code()
            ),
            Err(err) => warn!(
                "event={op} module=store status=rejected duration_ms={duration_ms} error_code={}",
                err.code()
            ),
        }
        result
    }
}
