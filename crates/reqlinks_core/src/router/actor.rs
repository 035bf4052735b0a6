//! Single-writer router task.
//!
//! One tokio task owns the router and drains its mailbox in order, so every
//! request finishes its read-modify-write cycle before the next one starts.

use super::{decode_message, Envelope, Request, Router};
use log::{info, warn};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const MAILBOX_CAPACITY: usize = 64;
const ROUTER_STOPPED_MESSAGE: &str = "router is not running";

struct Job {
    request: Request,
    reply: oneshot::Sender<Envelope>,
}

/// Cloneable sender side of the router mailbox.
#[derive(Clone)]
pub struct RouterHandle {
    tx: mpsc::Sender<Job>,
}

/// Spawns the router task on the current tokio runtime.
///
/// The task exits once every `RouterHandle` has been dropped.
pub fn spawn_router(router: Router) -> (RouterHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
    let task = tokio::spawn(run(router, rx));
    (RouterHandle { tx }, task)
}

impl RouterHandle {
    /// Queues `request` and waits for its envelope.
    pub async fn call(&self, request: Request) -> Envelope {
        let (reply, response) = oneshot::channel();
        if self.tx.send(Job { request, reply }).await.is_err() {
            return Envelope::failure(ROUTER_STOPPED_MESSAGE);
        }
        response
            .await
            .unwrap_or_else(|_| Envelope::failure(ROUTER_STOPPED_MESSAGE))
    }

    /// Decodes a raw message and queues it; `None` for unknown types.
    pub async fn handle_message(&self, message: &Value) -> Option<Envelope> {
        match decode_message(message)? {
            Ok(request) => Some(self.call(request).await),
            Err(envelope) => Some(envelope),
        }
    }
}

async fn run(router: Router, mut rx: mpsc::Receiver<Job>) {
    info!("event=router_start module=router status=ok capacity={MAILBOX_CAPACITY}");
    while let Some(Job { request, reply }) = rx.recv().await {
        let kind = request.kind();
        let envelope = router.dispatch(request).await;
        if reply.send(envelope).is_err() {
            warn!("event=router_reply module=router status=dropped type={kind}");
        }
    }
    info!("event=router_stop module=router status=ok");
}
