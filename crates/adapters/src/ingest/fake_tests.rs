// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gleaner_core::Source;
use std::time::Duration;

fn entry(title: &str) -> Entry {
    Entry::new(title, "body", Source::browser("https://example.com"))
}

#[tokio::test]
async fn fake_ingest_records_calls() {
    let adapter = FakeIngestAdapter::new();

    adapter
        .send_batch(&Batch::new(vec![entry("A"), entry("B")]))
        .await
        .unwrap();
    adapter.send_entry(&entry("C")).await.unwrap();

    assert_eq!(adapter.calls().len(), 2);
    assert_eq!(adapter.batches(), vec![vec![entry("A"), entry("B")]]);
    assert_eq!(
        adapter.calls()[1],
        IngestCall::Entry { entry: entry("C") }
    );
}

#[tokio::test]
async fn fake_ingest_fails_requested_attempts() {
    let adapter = FakeIngestAdapter::new();
    adapter.fail_next(2);

    assert!(adapter.send_entry(&entry("A")).await.is_err());
    assert!(adapter.send_entry(&entry("A")).await.is_err());
    assert!(adapter.send_entry(&entry("A")).await.is_ok());
    assert_eq!(adapter.completed(), 3);
}

#[tokio::test]
async fn held_attempts_wait_for_release() {
    let adapter = FakeIngestAdapter::new();
    adapter.hold();

    let adapter_clone = adapter.clone();
    let attempt = tokio::spawn(async move { adapter_clone.send_entry(&entry("A")).await });

    while adapter.calls().is_empty() {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(adapter.completed(), 0);

    adapter.release();
    attempt.await.unwrap().unwrap();
    assert_eq!(adapter.completed(), 1);
}
