//! Request router between UI surfaces and the document store.
//!
//! # Responsibility
//! - Decode the closed set of `type`-tagged requests.
//! - Forward each request verbatim to one store operation.
//! - Wrap every outcome in the uniform `{ok, data | error}` envelope.
//!
//! # Invariants
//! - The router holds no business rules; validation lives in the store.
//! - Unknown request types get no response.
//! - Requests reaching the actor are handled strictly one at a time.

mod actor;
mod envelope;
mod request;

pub use actor::{spawn_router, RouterHandle};
pub use envelope::Envelope;
pub use request::{Request, KNOWN_REQUEST_TYPES};

use crate::service::document_store::{DocumentStore, StoreResult};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub struct Router {
    store: Arc<DocumentStore>,
}

impl Router {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Runs one request against the store and wraps the outcome.
    pub async fn dispatch(&self, request: Request) -> Envelope {
        let store = &self.store;
        match request {
            Request::GetDocument => respond(store.get().await),
            Request::CreateRequirement { title } => {
                respond(store.create_requirement(title.as_deref()).await)
            }
            Request::SelectRequirement { id } => respond(store.select_requirement(&id).await),
            Request::RenameRequirement { id, title } => {
                respond(store.rename_requirement(&id, title.as_deref()).await)
            }
            Request::ArchiveRequirement { id } => respond(store.set_archived(&id, true).await),
            Request::UnarchiveRequirement { id } => respond(store.set_archived(&id, false).await),
            Request::SetPriority { id, priority } => {
                respond(store.set_priority(&id, priority).await)
            }
            Request::DeleteRequirement { id } => respond(store.delete_requirement(&id).await),
            Request::AddLink { id, link } => respond(store.add_link(&id, link).await),
            Request::RemoveLink { id, link_id } => {
                respond(store.remove_link(&id, &link_id).await)
            }
        }
    }

    /// Decodes a raw message and dispatches it.
    ///
    /// Returns `None` for unknown request types.
    pub async fn handle_message(&self, message: &Value) -> Option<Envelope> {
        match decode_message(message)? {
            Ok(request) => Some(self.dispatch(request).await),
            Err(envelope) => Some(envelope),
        }
    }
}

/// Decodes a raw message into a request.
///
/// `None` means the `type` is unknown (no response is owed). A known type
/// with an undecodable payload yields a failure envelope.
pub(crate) fn decode_message(message: &Value) -> Option<Result<Request, Envelope>> {
    let kind = message.get("type").and_then(Value::as_str);
    let Some(kind) = kind.filter(|kind| KNOWN_REQUEST_TYPES.contains(kind)) else {
        warn!(
            "event=request_dropped module=router status=ignored reason=unknown_type type={}",
            kind.unwrap_or("<missing>")
        );
        return None;
    };

    Some(
        serde_json::from_value::<Request>(message.clone()).map_err(|err| {
            warn!("event=request_decode module=router status=error type={kind} error={err}");
            Envelope::failure(format!("invalid argument: {err}"))
        }),
    )
}

fn respond<T: Serialize>(result: StoreResult<T>) -> Envelope {
    match result {
        Ok(data) => Envelope::success(&data),
        Err(err) => Envelope::failure(err.to_string()),
    }
}
