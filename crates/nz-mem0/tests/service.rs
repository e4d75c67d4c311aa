//! End-to-end tests over the bootstrapped memory service.

use nz_mem0::{bootstrap, bootstrap_dispatcher};
use nz_mem0_config::{DatabaseConfig, Mem0Config};
use nz_mem0_memory::{EmbeddingBackend, MemoryStore, RecordStore};
use nz_mem0_test_utils::{FailingIndex, StubEmbedder, StubIndex};
use nz_mem0_tools::{AuditLog, ToolDispatcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn file_config(path: &std::path::Path) -> Mem0Config {
    Mem0Config::builder()
        .database(DatabaseConfig {
            path: path.to_string_lossy().to_string(),
        })
        .build()
}

/// Without a vector backend configured, store/retrieve/recent/delete stay
/// fully functional and search degrades to no results.
#[tokio::test]
async fn bootstrap_without_index_degrades_gracefully() {
    let temp = tempdir().expect("tempdir");
    let config = file_config(&temp.path().join("mem0.db"));
    let store = bootstrap(&config).await.expect("bootstrap");

    store
        .store("s1", "pref", &json!({ "color": "blue" }), None)
        .await
        .expect("store");

    let record = store
        .retrieve("s1", "pref")
        .await
        .expect("retrieve")
        .expect("present");
    assert_eq!(record.value, json!({ "color": "blue" }));

    let matches = store.search("s1", "blue", 5).await.expect("search");
    assert!(matches.is_empty());

    let recent = store.recent("s1", 10).await.expect("recent");
    assert_eq!(recent.len(), 1);

    assert!(store.delete("s1", "pref").await.expect("delete"));
    assert!(!store.delete("s1", "pref").await.expect("repeat delete"));
}

/// The SQLite file is the source of truth: records written by one service
/// instance are visible to the next one opening the same path.
#[tokio::test]
async fn records_persist_across_bootstraps() {
    let temp = tempdir().expect("tempdir");
    let config = file_config(&temp.path().join("mem0.db"));

    let first = bootstrap(&config).await.expect("first bootstrap");
    first
        .store("s1", "note", &json!("remember me"), None)
        .await
        .expect("store");
    drop(first);

    let second = bootstrap(&config).await.expect("second bootstrap");
    let record = second
        .retrieve("s1", "note")
        .await
        .expect("retrieve")
        .expect("present");
    assert_eq!(record.value, json!("remember me"));
}

/// Full add/get/recent/delete cycle through the JSON tool surface.
#[tokio::test]
async fn dispatcher_round_trips_over_json() {
    let temp = tempdir().expect("tempdir");
    let config = file_config(&temp.path().join("mem0.db"));
    let dispatcher = bootstrap_dispatcher(&config).await.expect("dispatcher");

    let stored = dispatcher
        .invoke(
            "mem0.add",
            json!({ "session_id": "s1", "key": "pref", "value": { "color": "blue" } }),
            Some("trace-1"),
        )
        .await
        .expect("add");
    let stored = serde_json::to_value(&stored).expect("serialize");
    assert_eq!(stored["receipt"]["id"], json!("s1:pref"));

    let fetched = dispatcher
        .invoke("mem0.get", json!({ "session_id": "s1", "key": "pref" }), None)
        .await
        .expect("get");
    let fetched = serde_json::to_value(&fetched).expect("serialize");
    assert_eq!(fetched["record"]["value"], json!({ "color": "blue" }));

    let recent = dispatcher
        .invoke("mem0.recent", json!({ "session_id": "s1" }), None)
        .await
        .expect("recent");
    let recent = serde_json::to_value(&recent).expect("serialize");
    assert_eq!(recent["results"][0]["key"], json!("pref"));

    let deleted = dispatcher
        .invoke(
            "mem0.delete",
            json!({ "session_id": "s1", "key": "pref" }),
            None,
        )
        .await
        .expect("delete");
    assert_eq!(
        serde_json::to_value(&deleted).expect("serialize"),
        json!({ "deleted": true })
    );
}

/// With a live index, searching for the stored text surfaces its key.
#[tokio::test]
async fn search_finds_stored_text_with_live_index() {
    let records = Arc::new(RecordStore::open_in_memory().expect("open"));
    let store = MemoryStore::new(
        records,
        Arc::new(StubIndex::default()),
        EmbeddingBackend::hash_only(32),
    );

    store
        .store("s1", "pref", &json!({ "color": "blue" }), None)
        .await
        .expect("store");

    // The hash embedding of the serialized value matches itself exactly.
    let query = serde_json::to_string(&json!({ "color": "blue" })).expect("serialize");
    let matches = store.search("s1", &query, 5).await.expect("search");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].key, "pref");
    assert!(matches[0].score > 0.99);
}

/// A caller-provided model replaces the hash fallback for encoding, and the
/// deployment dimension follows the model.
#[tokio::test]
async fn model_backed_store_searches_through_the_model() {
    let records = Arc::new(RecordStore::open_in_memory().expect("open"));
    let store = MemoryStore::new(
        records,
        Arc::new(StubIndex::default()),
        EmbeddingBackend::with_model(Arc::new(StubEmbedder::default())),
    );

    store
        .store("s1", "pref", &json!("blue"), None)
        .await
        .expect("store");

    let query = serde_json::to_string(&json!("blue")).expect("serialize");
    let matches = store.search("s1", &query, 5).await.expect("search");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].key, "pref");
}

/// An index outage mid-flight must not turn tool search calls into errors.
#[tokio::test]
async fn dispatcher_search_survives_index_outage() {
    let records = Arc::new(RecordStore::open_in_memory().expect("open"));
    let store = MemoryStore::new(
        records,
        Arc::new(FailingIndex),
        EmbeddingBackend::hash_only(32),
    );
    let dispatcher = ToolDispatcher::new(Arc::new(store), AuditLog::new(false));

    dispatcher
        .invoke(
            "mem0.add",
            json!({ "session_id": "s1", "key": "pref", "value": "blue" }),
            None,
        )
        .await
        .expect("add tolerates index failure");

    let outcome = dispatcher
        .invoke(
            "mem0.search",
            json!({ "session_id": "s1", "query": "blue" }),
            None,
        )
        .await
        .expect("search degrades");
    assert_eq!(
        serde_json::to_value(&outcome).expect("serialize"),
        json!({ "results": [] })
    );
}
