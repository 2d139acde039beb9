// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake key-value store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::store::{validate_key, KvStore, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Recorded store operation
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Get { key: String },
    Set { key: String, value: Value },
}

#[derive(Default)]
struct FakeStoreState {
    slots: HashMap<String, Value>,
    calls: Vec<StoreCall>,
    fail_gets: u32,
    fail_sets: u32,
    in_flight: usize,
    max_in_flight: usize,
}

/// In-memory store that records calls, injects failures, and yields inside
/// every operation so overlapping callers would be observable.
#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeStoreState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seed a slot without recording a call
    pub fn insert(&self, key: &str, value: Value) {
        self.state().slots.insert(key.to_string(), value);
    }

    /// Current slot contents, without recording a call
    pub fn value(&self, key: &str) -> Option<Value> {
        self.state().slots.get(key).cloned()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Number of recorded writes
    pub fn set_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| matches!(c, StoreCall::Set { .. }))
            .count()
    }

    /// Fail the next `count` reads
    pub fn fail_gets(&self, count: u32) {
        self.state().fail_gets = count;
    }

    /// Fail the next `count` writes
    pub fn fail_sets(&self, count: u32) {
        self.state().fail_sets = count;
    }

    /// Highest number of operations that were ever in progress at once
    pub fn max_in_flight(&self) -> usize {
        self.state().max_in_flight
    }

    fn enter(&self) {
        let mut state = self.state();
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
    }

    fn exit(&self) {
        self.state().in_flight -= 1;
    }
}

fn injected(op: &str) -> StorageError {
    StorageError::Io(std::io::Error::other(format!("injected {} failure", op)))
}

#[async_trait]
impl KvStore for FakeStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        validate_key(key)?;
        self.enter();
        tokio::task::yield_now().await;

        let result = {
            let mut state = self.state();
            state.calls.push(StoreCall::Get {
                key: key.to_string(),
            });
            if state.fail_gets > 0 {
                state.fail_gets -= 1;
                Err(injected("get"))
            } else {
                Ok(state.slots.get(key).cloned())
            }
        };

        tokio::task::yield_now().await;
        self.exit();
        result
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        validate_key(key)?;
        self.enter();
        tokio::task::yield_now().await;

        let result = {
            let mut state = self.state();
            state.calls.push(StoreCall::Set {
                key: key.to_string(),
                value: value.clone(),
            });
            if state.fail_sets > 0 {
                state.fail_sets -= 1;
                Err(injected("set"))
            } else {
                state.slots.insert(key.to_string(), value);
                Ok(())
            }
        };

        tokio::task::yield_now().await;
        self.exit();
        result
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
