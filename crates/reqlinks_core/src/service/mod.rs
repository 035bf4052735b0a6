//! Core use-case services.
//!
//! # Responsibility
//! - Run every document mutation as one serialized read-modify-write cycle.
//! - Compose store calls with host collaborators (notifications, tabs).
//!
//! # Invariants
//! - Services never touch the KV backend except through `DocumentRepository`.

pub mod document_store;
pub mod host_actions;
