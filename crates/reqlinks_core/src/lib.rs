//! Core of the requirement/link tracker.
//!
//! Owns the single persisted document, the operations that read-modify-write
//! it, and the router that serializes UI requests onto those operations.

pub mod config;
pub mod db;
pub mod host;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod router;
pub mod service;

pub use config::CoreConfig;
pub use host::{LogNotificationSink, LogTabOpener, NotificationSink, TabOpener};
pub use kv::{KvBackend, KvError, KvResult, MemoryKvBackend, SqliteKvBackend};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::Document;
pub use model::link::{Link, LinkId, NewLink};
pub use model::requirement::{Priority, Requirement, RequirementId};
pub use repo::document_repo::DocumentRepository;
pub use router::{spawn_router, Envelope, Request, Router, RouterHandle};
pub use service::document_store::{DocumentStore, StoreError, StoreResult};
pub use service::host_actions::{HostActions, PageInfo, QuickAddOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
