// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tempfile::TempDir;

fn temp_store() -> (TempDir, JsonStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path().join("store")).unwrap();
    (dir, store)
}

#[tokio::test]
async fn missing_slot_reads_as_none() {
    let (_dir, store) = temp_store();

    assert!(store.get("pending").await.unwrap().is_none());
    assert_eq!(
        store.get_or("pending", json!([])).await.unwrap(),
        json!([])
    );
}

#[tokio::test]
async fn set_then_get_returns_value() {
    let (_dir, store) = temp_store();

    store.set("pending", json!([{"title": "A"}])).await.unwrap();

    assert_eq!(
        store.get("pending").await.unwrap(),
        Some(json!([{"title": "A"}]))
    );
}

#[tokio::test]
async fn set_replaces_previous_value_and_leaves_no_temp_file() {
    let (_dir, store) = temp_store();

    store.set("pending", json!([1, 2, 3])).await.unwrap();
    store.set("pending", json!([])).await.unwrap();

    assert_eq!(store.get("pending").await.unwrap(), Some(json!([])));

    let files: Vec<_> = std::fs::read_dir(store.base_path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files, vec!["pending.json"]);
}

#[tokio::test]
async fn values_survive_reopening() {
    let (dir, store) = temp_store();
    store.set("pending", json!(["kept"])).await.unwrap();
    drop(store);

    let reopened = JsonStore::open(dir.path().join("store")).unwrap();
    assert_eq!(
        reopened.get("pending").await.unwrap(),
        Some(json!(["kept"]))
    );
}

#[tokio::test]
async fn corrupt_slot_is_a_json_error() {
    let (_dir, store) = temp_store();
    std::fs::write(store.base_path().join("pending.json"), "{not json").unwrap();

    let result = store.get("pending").await;
    assert!(matches!(result, Err(StorageError::Json(_))));
}

#[tokio::test]
async fn path_like_keys_are_rejected() {
    let (_dir, store) = temp_store();

    for key in ["", "../escape", "a/b", "with space"] {
        let result = store.set(key, json!(null)).await;
        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "key {:?} should be rejected",
            key
        );
    }
}
