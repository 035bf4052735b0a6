use async_trait::async_trait;
use reqlinks_core::{
    Document, DocumentStore, KvBackend, KvError, KvResult, LinkId, MemoryKvBackend, NewLink,
    Priority, RequirementId, StoreError,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Memory backend whose reads/writes can be switched off.
#[derive(Default)]
struct FlakyKv {
    inner: MemoryKvBackend,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KvBackend for FlakyKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("read refused".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("write refused".to_string()));
        }
        self.inner.set(key, value).await
    }
}

fn memory_store() -> DocumentStore {
    DocumentStore::with_backend(Arc::new(MemoryKvBackend::new()))
}

#[tokio::test]
async fn get_returns_default_document_when_nothing_is_stored() {
    let store = memory_store();
    assert_eq!(store.get().await.unwrap(), Document::default());
}

#[tokio::test]
async fn ensure_initialized_writes_default_once() {
    let kv = Arc::new(MemoryKvBackend::new());
    let store = DocumentStore::with_backend(kv.clone());

    assert!(store.ensure_initialized().await.unwrap());
    assert!(kv.get("db").await.unwrap().is_some());

    store.create_requirement(Some("keep me")).await.unwrap();
    assert!(!store.ensure_initialized().await.unwrap());
    assert_eq!(store.get().await.unwrap().requirements.len(), 1);
}

#[tokio::test]
async fn create_requirement_prepends_selects_and_initializes_links() {
    let store = memory_store();

    let first = store.create_requirement(Some("first")).await.unwrap();
    let second = store.create_requirement(Some("  second  ")).await.unwrap();
    let blank = store.create_requirement(Some("   ")).await.unwrap();

    assert_eq!(second.title, "second");
    assert_eq!(blank.title, "Untitled");
    assert!(!first.archived && !second.archived && !blank.archived);

    let document = store.get().await.unwrap();
    let ids: Vec<&RequirementId> = document.requirements.iter().map(|r| &r.id).collect();
    assert_eq!(ids, vec![&blank.id, &second.id, &first.id]);
    assert_eq!(document.last_selected_requirement_id, Some(blank.id.clone()));
    for id in [&first.id, &second.id, &blank.id] {
        assert_eq!(document.links_by_req.get(id), Some(&Vec::new()));
    }
}

#[tokio::test]
async fn created_ids_are_unique() {
    let store = memory_store();
    let mut seen = HashSet::new();
    for index in 0..50 {
        let requirement = store
            .create_requirement(Some(format!("item {index}").as_str()))
            .await
            .unwrap();
        assert!(seen.insert(requirement.id));
    }
}

#[tokio::test]
async fn select_requirement_accepts_unknown_ids() {
    let store = memory_store();
    let ghost = RequirementId::from("req_not_created_yet");

    assert!(store.select_requirement(&ghost).await.unwrap());
    assert_eq!(
        store.get().await.unwrap().last_selected_requirement_id,
        Some(ghost)
    );
}

#[tokio::test]
async fn rename_with_blank_title_keeps_previous_title() {
    let store = memory_store();
    let requirement = store.create_requirement(Some("original")).await.unwrap();

    let unchanged = store
        .rename_requirement(&requirement.id, Some("   "))
        .await
        .unwrap();
    assert_eq!(unchanged.title, "original");

    let renamed = store
        .rename_requirement(&requirement.id, Some(" renamed "))
        .await
        .unwrap();
    assert_eq!(renamed.title, "renamed");
    assert_eq!(renamed.created_at, requirement.created_at);
    assert_eq!(
        store.get().await.unwrap().requirements[0].title,
        "renamed"
    );
}

#[tokio::test]
async fn missing_requirement_reports_not_found_and_leaves_document_unmodified() {
    let store = memory_store();
    store.create_requirement(Some("present")).await.unwrap();
    let before = store.get().await.unwrap();
    let missing = RequirementId::from("missing");

    let err = store
        .rename_requirement(&missing, Some("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == &missing));
    assert_eq!(err.to_string(), "requirement not found: missing");

    let err = store.set_archived(&missing, true).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let err = store
        .set_priority(&missing, Priority::High)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    assert_eq!(store.get().await.unwrap(), before);
}

#[tokio::test]
async fn archive_unarchive_and_priority_update_the_requirement() {
    let store = memory_store();
    let requirement = store.create_requirement(Some("task")).await.unwrap();

    assert!(store.set_archived(&requirement.id, true).await.unwrap().archived);
    assert!(!store.set_archived(&requirement.id, false).await.unwrap().archived);

    let updated = store
        .set_priority(&requirement.id, Priority::Medium)
        .await
        .unwrap();
    assert_eq!(updated.priority, Some(Priority::Medium));
    assert_eq!(updated.effective_priority().next(), Priority::High);
}

#[tokio::test]
async fn delete_requirement_cascades_links_and_clears_selection() {
    let store = memory_store();
    let keep = store.create_requirement(Some("keep")).await.unwrap();
    let doomed = store.create_requirement(Some("doomed")).await.unwrap();
    store
        .add_link(&doomed.id, NewLink::with_url("https://a.com"))
        .await
        .unwrap();

    assert!(store.delete_requirement(&doomed.id).await.unwrap());

    let document = store.get().await.unwrap();
    assert!(!document.links_by_req.contains_key(&doomed.id));
    assert!(document.requirement(&doomed.id).is_none());
    assert_eq!(document.last_selected_requirement_id, None);
    assert!(document.requirement(&keep.id).is_some());

    assert!(store.delete_requirement(&doomed.id).await.unwrap());
}

#[tokio::test]
async fn delete_keeps_selection_pointing_elsewhere() {
    let store = memory_store();
    let other = store.create_requirement(Some("other")).await.unwrap();
    let selected = store.create_requirement(Some("selected")).await.unwrap();

    store.delete_requirement(&other.id).await.unwrap();
    assert_eq!(
        store.get().await.unwrap().last_selected_requirement_id,
        Some(selected.id)
    );
}

#[tokio::test]
async fn remove_link_after_delete_does_not_restore_the_list() {
    let store = memory_store();
    let doomed = store.create_requirement(Some("doomed")).await.unwrap();
    let link = store
        .add_link(&doomed.id, NewLink::with_url("https://a.com"))
        .await
        .unwrap();
    store.delete_requirement(&doomed.id).await.unwrap();

    assert!(store.remove_link(&doomed.id, &link.id).await.unwrap());
    assert!(store
        .remove_link(&RequirementId::from("req_unknown"), &LinkId::from("lnk_any"))
        .await
        .unwrap());

    let document = store.get().await.unwrap();
    assert!(document.requirements.is_empty());
    assert!(document.links_by_req.is_empty());
}

#[tokio::test]
async fn duplicate_url_is_a_silent_no_op() {
    let store = memory_store();
    let requirement = store.create_requirement(Some("links")).await.unwrap();

    let first = store
        .add_link(&requirement.id, NewLink::with_url("https://a.com"))
        .await
        .unwrap();
    let attempted = store
        .add_link(
            &requirement.id,
            NewLink::with_url("https://a.com")
                .titled("dup")
                .favicon("dup.ico"),
        )
        .await
        .unwrap();

    assert_eq!(attempted.title, "dup");
    assert_ne!(attempted.id, first.id);

    let document = store.get().await.unwrap();
    let links = document.links_for(&requirement.id);
    assert_eq!(links.len(), 1);
    assert_eq!(links[0], first);
}

#[tokio::test]
async fn add_link_requires_url() {
    let store = memory_store();
    let requirement = store.create_requirement(Some("links")).await.unwrap();

    for input in [NewLink::default(), NewLink::with_url("   ").titled("blank")] {
        let err = store.add_link(&requirement.id, input).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }
    assert!(store.get().await.unwrap().links_for(&requirement.id).is_empty());
}

#[tokio::test]
async fn add_link_tolerates_unknown_requirement() {
    let store = memory_store();
    let orphan = RequirementId::from("req_orphan");

    let link = store
        .add_link(&orphan, NewLink::with_url("https://orphan.example"))
        .await
        .unwrap();

    let document = store.get().await.unwrap();
    assert!(document.requirements.is_empty());
    assert_eq!(document.links_for(&orphan), &[link]);
}

#[tokio::test]
async fn remove_link_filters_only_the_target() {
    let store = memory_store();
    let requirement = store.create_requirement(Some("links")).await.unwrap();
    let a = store
        .add_link(&requirement.id, NewLink::with_url("https://a.com"))
        .await
        .unwrap();
    let b = store
        .add_link(&requirement.id, NewLink::with_url("https://b.com"))
        .await
        .unwrap();

    assert!(store.remove_link(&requirement.id, &a.id).await.unwrap());
    assert!(store
        .remove_link(&requirement.id, &LinkId::from("lnk_missing"))
        .await
        .unwrap());

    assert_eq!(store.get().await.unwrap().links_for(&requirement.id), &[b]);
}

#[tokio::test]
async fn ship_v2_scenario() {
    let store = memory_store();
    let requirement = store.create_requirement(Some("Ship v2")).await.unwrap();

    store
        .add_link(&requirement.id, NewLink::with_url("https://a.com"))
        .await
        .unwrap();
    store
        .add_link(&requirement.id, NewLink::with_url("https://a.com").titled("dup"))
        .await
        .unwrap();
    store
        .add_link(&requirement.id, NewLink::with_url("https://b.com"))
        .await
        .unwrap();
    store.set_archived(&requirement.id, true).await.unwrap();

    let document = store.get().await.unwrap();
    assert_eq!(document.requirements.len(), 1);
    assert!(document.requirements[0].archived);
    let urls: Vec<&str> = document
        .links_for(&requirement.id)
        .iter()
        .map(|link| link.url.as_str())
        .collect();
    assert_eq!(urls, vec!["https://b.com", "https://a.com"]);
}

#[tokio::test]
async fn failed_persist_is_reported_and_not_applied() {
    let kv = Arc::new(FlakyKv::default());
    let store = DocumentStore::with_backend(kv.clone());
    let requirement = store.create_requirement(Some("stable")).await.unwrap();
    let before = store.get().await.unwrap();

    kv.fail_writes.store(true, Ordering::SeqCst);
    let err = store
        .rename_requirement(&requirement.id, Some("lost"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable(_)));
    assert!(err.to_string().starts_with("storage unavailable"));
    assert!(store.create_requirement(Some("lost")).await.is_err());

    kv.fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(store.get().await.unwrap(), before);
}

#[tokio::test]
async fn unreadable_storage_fails_every_operation() {
    let kv = Arc::new(FlakyKv::default());
    let store = DocumentStore::with_backend(kv.clone());
    kv.fail_reads.store(true, Ordering::SeqCst);

    assert!(matches!(
        store.get().await,
        Err(StoreError::StorageUnavailable(_))
    ));
    assert!(matches!(
        store.delete_requirement(&RequirementId::from("x")).await,
        Err(StoreError::StorageUnavailable(_))
    ));
}

#[tokio::test]
async fn corrupt_blob_is_reported_instead_of_replaced() {
    let kv = Arc::new(MemoryKvBackend::new());
    kv.set("db", "{not json".to_string()).await.unwrap();
    let store = DocumentStore::with_backend(kv.clone());

    assert!(matches!(
        store.create_requirement(Some("x")).await,
        Err(StoreError::StorageUnavailable(KvError::Codec(_)))
    ));
    assert_eq!(kv.get("db").await.unwrap().as_deref(), Some("{not json"));
}
