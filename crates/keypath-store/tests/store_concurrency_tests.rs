use keypath_store::{Document, DocumentStore, StoreError, DEFAULT_INDENT};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::thread;

fn seeded_store(content: &str) -> (tempfile::TempDir, Arc<DocumentStore>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.json");
    fs::write(&path, content).unwrap();
    (dir, Arc::new(DocumentStore::new(path)))
}

#[test]
fn guarded_read_modify_write_is_serialized() {
    let (_dir, store) = seeded_store(r#"{"count": 0}"#);
    let threads = 8;
    let per_thread = 25;

    thread::scope(|s| {
        for _ in 0..threads {
            let store = Arc::clone(&store);
            s.spawn(move || {
                for _ in 0..per_thread {
                    let mut guard = store.lock();
                    let mut doc = guard.load(true).unwrap();
                    let n = doc.root()["count"].as_u64().unwrap();
                    doc.root_mut().insert("count".into(), json!(n + 1));
                    guard.save(doc, DEFAULT_INDENT).unwrap();
                }
            });
        }
    });

    store.clear_cache();
    let doc = store.load(false).unwrap();
    assert_eq!(doc.root()["count"], json!(threads * per_thread));
    assert_eq!(store.cache_stats().writes, (threads * per_thread) as u64);
}

#[test]
fn concurrent_readers_see_whole_documents() {
    let (_dir, store) = seeded_store(r#"{"items": []}"#);

    thread::scope(|s| {
        let writer = Arc::clone(&store);
        s.spawn(move || {
            for i in 0..50 {
                let mut guard = writer.lock();
                let mut doc = guard.load(true).unwrap();
                doc.root_mut()
                    .get_mut("items")
                    .and_then(|v| v.as_array_mut())
                    .unwrap()
                    .push(json!(i));
                guard.save(doc, DEFAULT_INDENT).unwrap();
            }
        });

        let path = store.path().to_path_buf();
        s.spawn(move || {
            for _ in 0..50 {
                let bytes = fs::read(&path).unwrap();
                let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
                assert!(parsed["items"].is_array());
            }
        });
    });
}

#[test]
fn failed_load_leaves_file_untouched() {
    let (_dir, store) = seeded_store("{broken");
    let before = fs::read(store.path()).unwrap();

    let result = store.load(true);
    assert!(matches!(result, Err(StoreError::InvalidJson { .. })));
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

#[test]
fn save_over_existing_replaces_whole_content() {
    let (_dir, store) = seeded_store(r#"{"old": "value", "keep": false}"#);
    let doc = Document::from_value(json!({"new": 1})).unwrap();
    store.save(doc, DEFAULT_INDENT).unwrap();

    let written = fs::read_to_string(store.path()).unwrap();
    assert_eq!(written, "{\n  \"new\": 1\n}\n");
}
