// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote ingestion endpoint adapters

mod http;

pub use http::HttpIngestAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeIngestAdapter, IngestCall};

use async_trait::async_trait;
use gleaner_core::{Batch, Entry};
use thiserror::Error;

/// Errors from delivery attempts
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("endpoint responded with status {0}")]
    Status(u16),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("delivery task failed: {0}")]
    Task(String),
}

/// Adapter for the remote ingestion endpoint.
///
/// `Ok(())` means the transport considered the request successful; that is the
/// only acknowledgement the endpoint gives.
#[async_trait]
pub trait IngestAdapter: Clone + Send + Sync + 'static {
    /// Deliver a whole batch in one request
    async fn send_batch(&self, batch: &Batch) -> Result<(), IngestError>;

    /// Deliver a single entry (immediate delivery mode)
    async fn send_entry(&self, entry: &Entry) -> Result<(), IngestError>;
}
