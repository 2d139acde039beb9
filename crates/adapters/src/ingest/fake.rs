// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake ingestion adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{IngestAdapter, IngestError};
use async_trait::async_trait;
use gleaner_core::{Batch, Entry};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Recorded delivery attempt
#[derive(Debug, Clone, PartialEq)]
pub enum IngestCall {
    Batch { items: Vec<Entry> },
    Entry { entry: Entry },
}

#[derive(Default)]
struct FakeIngestState {
    calls: Vec<IngestCall>,
    failures: u32,
    completed: usize,
}

/// Fake ingestion adapter for testing.
///
/// Records every attempt, fails the next N attempts on request, and can hold
/// attempts in flight until released.
#[derive(Clone)]
pub struct FakeIngestAdapter {
    inner: Arc<Mutex<FakeIngestState>>,
    held: Arc<watch::Sender<bool>>,
}

impl Default for FakeIngestAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::default(),
            held: Arc::new(watch::Sender::new(false)),
        }
    }
}

impl FakeIngestAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeIngestState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded attempts, successful or not
    pub fn calls(&self) -> Vec<IngestCall> {
        self.state().calls.clone()
    }

    /// Items of every batch attempt, in order
    pub fn batches(&self) -> Vec<Vec<Entry>> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                IngestCall::Batch { items } => Some(items.clone()),
                IngestCall::Entry { .. } => None,
            })
            .collect()
    }

    /// Number of attempts that have finished (either way)
    pub fn completed(&self) -> usize {
        self.state().completed
    }

    /// Fail the next `count` attempts
    pub fn fail_next(&self, count: u32) {
        self.state().failures = count;
    }

    /// Keep new and in-flight attempts waiting until `release` is called
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    pub fn release(&self) {
        self.held.send_replace(false);
    }

    async fn attempt(&self, call: IngestCall) -> Result<(), IngestError> {
        self.state().calls.push(call);

        let mut held = self.held.subscribe();
        // The sender lives in self, so this only errors if it was dropped
        let _ = held.wait_for(|h| !*h).await;

        let mut state = self.state();
        state.completed += 1;
        if state.failures > 0 {
            state.failures -= 1;
            return Err(IngestError::Transport("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IngestAdapter for FakeIngestAdapter {
    async fn send_batch(&self, batch: &Batch) -> Result<(), IngestError> {
        self.attempt(IngestCall::Batch {
            items: batch.items.clone(),
        })
        .await
    }

    async fn send_entry(&self, entry: &Entry) -> Result<(), IngestError> {
        self.attempt(IngestCall::Entry {
            entry: entry.clone(),
        })
        .await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
