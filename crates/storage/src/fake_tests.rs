// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[tokio::test]
async fn fake_store_records_calls() {
    let store = FakeStore::new();

    store.set("pending", json!([1])).await.unwrap();
    store.get("pending").await.unwrap();

    assert_eq!(
        store.calls(),
        vec![
            StoreCall::Set {
                key: "pending".to_string(),
                value: json!([1]),
            },
            StoreCall::Get {
                key: "pending".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn injected_failures_are_consumed() {
    let store = FakeStore::new();
    store.fail_sets(1);

    assert!(store.set("pending", json!([1])).await.is_err());
    assert!(store.value("pending").is_none());

    store.set("pending", json!([2])).await.unwrap();
    assert_eq!(store.value("pending"), Some(json!([2])));
}

#[tokio::test]
async fn overlapping_operations_are_observed() {
    let store = FakeStore::new();

    let (a, b) = tokio::join!(store.get("pending"), store.get("pending"));
    a.unwrap();
    b.unwrap();

    assert_eq!(store.max_in_flight(), 2);
}
