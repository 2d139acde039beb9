// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value store trait

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

/// Async key-value persistence over named slots.
///
/// Each `set` replaces the whole slot; readers never see a half-written value.
#[async_trait]
pub trait KvStore: Clone + Send + Sync + 'static {
    /// Read a slot, `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Replace a slot
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Read a slot, falling back to `default` if it was never written
    async fn get_or(&self, key: &str, default: Value) -> Result<Value, StorageError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }
}

/// Keys become file names, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
