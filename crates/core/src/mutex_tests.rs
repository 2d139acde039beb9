// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::timeout;

const NO_DEADLOCK: Duration = Duration::from_secs(5);

/// Yield until `count` requests are queued behind the current holder
async fn wait_for_waiters(mutex: &FifoMutex, count: usize) {
    while mutex.waiting() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn uncontended_lock_is_granted_immediately() {
    let mutex = FifoMutex::new();
    assert!(!mutex.is_locked());

    let ticket = mutex.lock().await;
    assert!(mutex.is_locked());
    assert_eq!(ticket.number(), 0);

    drop(ticket);
    assert!(!mutex.is_locked());
}

#[tokio::test]
async fn tickets_are_numbered_in_request_order() {
    let mutex = FifoMutex::new();

    let first = mutex.lock().await.number();
    let second = mutex.lock().await.number();
    let third = mutex.lock().await.number();

    assert_eq!((first, second, third), (0, 1, 2));
}

#[tokio::test]
async fn waiters_are_granted_in_fifo_order() {
    let mutex = FifoMutex::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    let gate = mutex.lock().await;

    let mut handles = Vec::new();
    for id in 0..8 {
        let mutex_clone = mutex.clone();
        let order_clone = Arc::clone(&order);
        handles.push(tokio::spawn(async move {
            let _ticket = mutex_clone.lock().await;
            order_clone.lock().unwrap().push(id);
            // Suspend inside the section; nobody may overtake
            tokio::task::yield_now().await;
        }));
        wait_for_waiters(&mutex, id + 1).await;
    }

    drop(gate);
    for handle in handles {
        timeout(NO_DEADLOCK, handle).await.unwrap().unwrap();
    }

    assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    assert!(!mutex.is_locked());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn at_most_one_section_runs_at_a_time() {
    let mutex = FifoMutex::new();
    let active = Arc::new(AtomicUsize::new(0));
    let max_active = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let mutex = mutex.clone();
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            tokio::spawn(async move {
                let _ticket = mutex.lock().await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                active.fetch_sub(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in handles {
        timeout(NO_DEADLOCK, handle).await.unwrap().unwrap();
    }

    assert_eq!(max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn early_error_return_releases_lock() {
    async fn failing_section(mutex: &FifoMutex) -> Result<(), String> {
        let _ticket = mutex.lock().await;
        Err("storage unavailable".to_string())?;
        Ok(())
    }

    let mutex = FifoMutex::new();
    assert!(failing_section(&mutex).await.is_err());

    assert!(!mutex.is_locked());
    timeout(NO_DEADLOCK, mutex.lock()).await.unwrap();
}

#[tokio::test]
async fn panicking_section_releases_lock() {
    let mutex = FifoMutex::new();
    let mutex_clone = mutex.clone();

    let result = tokio::spawn(async move {
        let _ticket = mutex_clone.lock().await;
        panic!("section blew up");
    })
    .await;

    assert!(result.is_err());
    assert!(!mutex.is_locked());
    timeout(NO_DEADLOCK, mutex.lock()).await.unwrap();
}

#[tokio::test]
async fn abandoned_waiter_is_skipped() {
    let mutex = FifoMutex::new();
    let gate = mutex.lock().await;

    let mutex_clone = mutex.clone();
    let abandoned = tokio::spawn(async move {
        let _ticket = mutex_clone.lock().await;
    });
    wait_for_waiters(&mutex, 1).await;
    abandoned.abort();
    assert!(abandoned.await.unwrap_err().is_cancelled());

    let mutex_clone = mutex.clone();
    let next = tokio::spawn(async move { mutex_clone.lock().await.number() });
    wait_for_waiters(&mutex, 2).await;

    drop(gate);
    let number = timeout(NO_DEADLOCK, next).await.unwrap().unwrap();
    assert_eq!(number, 2);
    assert!(!mutex.is_locked());
}

#[tokio::test]
async fn grant_racing_with_abandonment_is_passed_on() {
    let mutex = FifoMutex::new();
    let gate = mutex.lock().await;

    let mutex_clone = mutex.clone();
    let waiter = tokio::spawn(async move {
        let _ticket = mutex_clone.lock().await;
    });
    wait_for_waiters(&mutex, 1).await;

    // Hand the lock to the waiter, then cancel it before it ever runs again
    drop(gate);
    assert!(mutex.is_locked());
    waiter.abort();
    assert!(waiter.await.unwrap_err().is_cancelled());

    assert!(!mutex.is_locked());
    timeout(NO_DEADLOCK, mutex.lock()).await.unwrap();
}
