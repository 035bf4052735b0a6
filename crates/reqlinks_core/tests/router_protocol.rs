use reqlinks_core::{
    spawn_router, Document, DocumentStore, Envelope, Link, MemoryKvBackend, NewLink, Priority,
    Request, Requirement, RequirementId, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn router() -> Router {
    Router::new(Arc::new(DocumentStore::with_backend(Arc::new(
        MemoryKvBackend::new(),
    ))))
}

async fn send(router: &Router, message: Value) -> Envelope {
    router
        .handle_message(&message)
        .await
        .expect("known request types always get a response")
}

#[tokio::test]
async fn db_get_returns_default_document_envelope() {
    let router = router();
    let envelope = send(&router, json!({ "type": "db:get" })).await;

    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "ok": true,
            "data": { "requirements": [], "linksByReq": {}, "lastSelectedRequirementId": null }
        })
    );
}

#[tokio::test]
async fn full_request_flow_over_the_wire() {
    let router = router();

    let created: Requirement = send(&router, json!({ "type": "req:create", "title": " Ship v2 " }))
        .await
        .into_result()
        .unwrap();
    assert_eq!(created.title, "Ship v2");
    let id = created.id.as_str();

    let link: Link = send(
        &router,
        json!({
            "type": "link:add",
            "id": id,
            "link": { "title": "A", "url": "https://a.com", "favicon": "a.ico" }
        }),
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(link.favicon, "a.ico");

    let renamed: Requirement = send(
        &router,
        json!({ "type": "req:rename", "id": id, "title": "Ship v3" }),
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(renamed.title, "Ship v3");

    let prioritized: Requirement = send(
        &router,
        json!({ "type": "req:setPriority", "id": id, "priority": "high" }),
    )
    .await
    .into_result()
    .unwrap();
    assert_eq!(prioritized.priority, Some(Priority::High));

    let archived: Requirement = send(&router, json!({ "type": "req:archive", "id": id }))
        .await
        .into_result()
        .unwrap();
    assert!(archived.archived);
    let restored: Requirement = send(&router, json!({ "type": "req:unarchive", "id": id }))
        .await
        .into_result()
        .unwrap();
    assert!(!restored.archived);

    let removed: bool = send(
        &router,
        json!({ "type": "link:remove", "id": id, "linkId": link.id.as_str() }),
    )
    .await
    .into_result()
    .unwrap();
    assert!(removed);

    let selected: bool = send(&router, json!({ "type": "req:select", "id": id }))
        .await
        .into_result()
        .unwrap();
    assert!(selected);

    let deleted: bool = send(&router, json!({ "type": "req:delete", "id": id }))
        .await
        .into_result()
        .unwrap();
    assert!(deleted);

    let document: Document = send(&router, json!({ "type": "db:get" }))
        .await
        .into_result()
        .unwrap();
    assert_eq!(document, Document::default());
}

#[tokio::test]
async fn store_failures_become_error_envelopes() {
    let router = router();

    let envelope = send(
        &router,
        json!({ "type": "req:rename", "id": "missing", "title": "x" }),
    )
    .await;
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({ "ok": false, "error": "requirement not found: missing" })
    );

    let envelope = send(
        &router,
        json!({ "type": "link:add", "id": "r", "link": { "title": "no url" } }),
    )
    .await;
    assert!(!envelope.ok);
    assert!(envelope.error.unwrap().starts_with("invalid argument"));
}

#[tokio::test]
async fn unknown_or_missing_type_gets_no_response() {
    let router = router();

    assert!(router.handle_message(&json!({ "type": "req:explode" })).await.is_none());
    assert!(router.handle_message(&json!({ "id": "r" })).await.is_none());
    assert!(router.handle_message(&json!({ "type": 7 })).await.is_none());
}

#[tokio::test]
async fn malformed_payload_for_known_type_is_a_failure() {
    let router = router();

    let envelope = send(&router, json!({ "type": "req:select" })).await;
    assert!(!envelope.ok);

    let envelope = send(
        &router,
        json!({ "type": "req:setPriority", "id": "r", "priority": "urgent" }),
    )
    .await;
    assert!(!envelope.ok);
    assert!(envelope.error.unwrap().contains("invalid argument"));
}

#[tokio::test]
async fn handle_serializes_requests_through_the_actor() {
    let (handle, task) = spawn_router(router());

    let created: Requirement = handle
        .call(Request::CreateRequirement {
            title: Some("actor".to_string()),
        })
        .await
        .into_result()
        .unwrap();

    let link: Link = handle
        .call(Request::AddLink {
            id: created.id.clone(),
            link: NewLink::with_url("https://a.com"),
        })
        .await
        .into_result()
        .unwrap();
    assert_eq!(link.title, "https://a.com");

    assert!(handle
        .handle_message(&json!({ "type": "nope" }))
        .await
        .is_none());

    let document: Document = handle
        .handle_message(&json!({ "type": "db:get" }))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(document.links_for(&created.id).len(), 1);

    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn stopped_router_reports_failure() {
    let (handle, task) = spawn_router(router());
    task.abort();
    let _ = task.await;

    let envelope = handle
        .call(Request::SelectRequirement {
            id: RequirementId::from("r"),
        })
        .await;
    assert!(!envelope.ok);
    assert_eq!(envelope.error.as_deref(), Some("router is not running"));
}
