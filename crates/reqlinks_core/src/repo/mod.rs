//! Repository layer over the KV backend.
//!
//! # Responsibility
//! - Map the persisted blob to the typed `Document` and back.
//! - Keep key naming and encoding out of the store's mutation logic.

pub mod document_repo;
