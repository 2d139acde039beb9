// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based storage
//!
//! One file per key under the base directory. Writes go to a temporary file
//! that is synced and then renamed over the slot, so a crash mid-write leaves
//! the previous value in place.

use crate::store::{validate_key, KvStore, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// JSON file-based storage
#[derive(Clone, Debug)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    /// Open a store at the given path, creating the directory if needed
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!(".{}.json.tmp", key))
    }
}

#[async_trait]
impl KvStore for JsonStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        validate_key(key)?;
        let json = match fs::read_to_string(self.path_for(key)).await {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        validate_key(key)?;
        let json = serde_json::to_vec_pretty(&value)?;
        let temp_path = self.temp_path_for(key);

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, self.path_for(key)).await?;
        tracing::trace!(key, bytes = json.len(), "slot written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
