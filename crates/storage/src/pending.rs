// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed access to the pending queue slot
//!
//! The pending queue is the ordered list of entries not yet delivered. This
//! adapter only translates between the slot's JSON and `Entry` values; callers
//! must hold the buffer's lock around every load/save pair.

use crate::store::{KvStore, StorageError};
use gleaner_core::Entry;
use serde_json::Value;

/// Slot holding the pending queue
pub const PENDING_KEY: &str = "pending";

#[derive(Clone, Debug)]
pub struct PendingQueue<S> {
    store: S,
    key: String,
}

impl<S: KvStore> PendingQueue<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, PENDING_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Read the queue; an unwritten slot is an empty queue
    pub async fn load(&self) -> Result<Vec<Entry>, StorageError> {
        let value = self
            .store
            .get_or(&self.key, Value::Array(Vec::new()))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Replace the queue
    pub async fn save(&self, entries: &[Entry]) -> Result<(), StorageError> {
        self.store
            .set(&self.key, serde_json::to_value(entries)?)
            .await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.save(&[]).await
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
