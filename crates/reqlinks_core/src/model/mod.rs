//! Persisted domain model for requirements and their saved links.
//!
//! # Responsibility
//! - Define the single aggregate (`Document`) stored under one KV key.
//! - Keep wire field names compatible with previously persisted blobs.
//!
//! # Invariants
//! - Ids are generated once and never reused or rewritten.
//! - Every live requirement owns a (possibly empty) link list.
//! - The last-selected pointer is weak and cleared when its target is deleted.

pub mod document;
pub mod link;
pub mod requirement;

use chrono::Utc;

/// Unix epoch milliseconds, the timestamp unit used across the document.
pub type EpochMillis = i64;

/// Returns the current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> EpochMillis {
    Utc::now().timestamp_millis()
}
