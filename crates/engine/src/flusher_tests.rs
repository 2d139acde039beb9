// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gleaner_adapters::FakeIngestAdapter;
use gleaner_core::{Entry, RetryPolicy, Source};
use gleaner_storage::{FakeStore, StoreCall};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

const INTERVAL: Duration = Duration::from_secs(10);

fn entry(title: &str) -> Entry {
    Entry::new(title, "body", Source::browser("https://example.com"))
}

fn setup(
    policy: RetryPolicy,
) -> (
    Arc<Buffer<FakeStore, FakeIngestAdapter>>,
    FakeStore,
    FakeIngestAdapter,
    FlushSchedule,
) {
    let store = FakeStore::new();
    let ingest = FakeIngestAdapter::new();
    let buffer = Arc::new(Buffer::new(store.clone(), ingest.clone()));
    (buffer, store, ingest, FlushSchedule::new(INTERVAL, policy))
}

#[tokio::test(start_paused = true)]
async fn tick_delivers_pending_entries() {
    let (buffer, _store, ingest, schedule) = setup(RetryPolicy::Fixed);
    buffer.append(entry("A")).await.unwrap();
    let start = Instant::now();

    let task = FlushTask::spawn(Arc::clone(&buffer), schedule);

    sleep_until(start + Duration::from_secs(9)).await;
    assert!(ingest.batches().is_empty());

    sleep_until(start + Duration::from_secs(11)).await;
    assert_eq!(ingest.batches(), vec![vec![entry("A")]]);
    assert_eq!(buffer.pending().await.unwrap(), 0);

    task.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failed_cycle_is_retried_on_next_tick() {
    let (buffer, _store, ingest, schedule) = setup(RetryPolicy::Fixed);
    buffer.append(entry("A")).await.unwrap();
    ingest.fail_next(1);
    let start = Instant::now();

    let task = FlushTask::spawn(Arc::clone(&buffer), schedule);

    sleep_until(start + Duration::from_secs(11)).await;
    assert_eq!(ingest.batches().len(), 1);
    assert_eq!(buffer.pending().await.unwrap(), 1);

    sleep_until(start + Duration::from_secs(21)).await;
    assert_eq!(ingest.batches().len(), 2);
    assert_eq!(buffer.pending().await.unwrap(), 0);

    task.stop().await;
}

#[tokio::test(start_paused = true)]
async fn backoff_spaces_out_retries() {
    let (buffer, _store, ingest, _) = setup(RetryPolicy::Fixed);
    let schedule = FlushSchedule::new(
        INTERVAL,
        RetryPolicy::backoff(2, Duration::from_secs(300)),
    );
    buffer.append(entry("A")).await.unwrap();
    ingest.fail_next(2);
    let start = Instant::now();

    let task = FlushTask::spawn(Arc::clone(&buffer), schedule);

    // Attempts land at 10s, then +20s, then +40s
    for (at, attempts) in [(9, 0), (11, 1), (29, 1), (31, 2), (69, 2), (71, 3)] {
        sleep_until(start + Duration::from_secs(at)).await;
        assert_eq!(ingest.batches().len(), attempts, "at {}s", at);
    }
    assert_eq!(buffer.pending().await.unwrap(), 0);

    task.stop().await;
}

#[tokio::test(start_paused = true)]
async fn idle_ticks_do_not_write() {
    let (buffer, store, ingest, schedule) = setup(RetryPolicy::Fixed);
    let start = Instant::now();

    let task = FlushTask::spawn(Arc::clone(&buffer), schedule);
    sleep_until(start + Duration::from_secs(95)).await;
    task.stop().await;

    assert!(ingest.calls().is_empty());
    assert_eq!(store.set_count(), 0);
    let reads = store
        .calls()
        .iter()
        .filter(|c| matches!(c, StoreCall::Get { .. }))
        .count();
    assert_eq!(reads, 9);
}

#[tokio::test(start_paused = true)]
async fn stop_waits_for_in_flight_cycle() {
    let (buffer, store, ingest, schedule) = setup(RetryPolicy::Fixed);
    buffer.append(entry("A")).await.unwrap();
    ingest.hold();
    let start = Instant::now();

    let task = FlushTask::spawn(Arc::clone(&buffer), schedule);
    sleep_until(start + Duration::from_secs(11)).await;
    assert_eq!(ingest.batches().len(), 1);
    assert_eq!(ingest.completed(), 0);

    let stopping = tokio::spawn(task.stop());
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!stopping.is_finished());

    ingest.release();
    stopping.await.unwrap();

    assert_eq!(ingest.completed(), 1);
    assert_eq!(store.value(gleaner_storage::PENDING_KEY), Some(serde_json::json!([])));
    assert!(!buffer.is_locked());
}

#[tokio::test(start_paused = true)]
async fn stop_before_first_tick_sends_nothing() {
    let (buffer, store, ingest, schedule) = setup(RetryPolicy::Fixed);

    let task = FlushTask::spawn(Arc::clone(&buffer), schedule);
    task.stop().await;

    assert!(ingest.calls().is_empty());
    assert!(store.calls().is_empty());
}
