// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the buffer

use gleaner_storage::StorageError;
use thiserror::Error;

/// Errors that abort an append or flush cycle.
///
/// Delivery failures are not errors here: a flush that could not deliver
/// reports `FlushOutcome::Deferred` and keeps the queue.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
