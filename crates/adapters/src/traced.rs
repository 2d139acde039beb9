// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::ingest::{IngestAdapter, IngestError};
use async_trait::async_trait;
use gleaner_core::{Batch, Entry};
use tracing::Instrument;

/// Wrapper that adds tracing to any IngestAdapter
#[derive(Clone, Debug)]
pub struct TracedIngestAdapter<I> {
    inner: I,
}

impl<I> TracedIngestAdapter<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

#[async_trait]
impl<I: IngestAdapter> IngestAdapter for TracedIngestAdapter<I> {
    async fn send_batch(&self, batch: &Batch) -> Result<(), IngestError> {
        let span = tracing::info_span!("ingest.batch", items = batch.len());

        async {
            let bytes: usize = batch.items.iter().map(|e| e.content().len()).sum();
            tracing::debug!(content_bytes = bytes, "sending");

            let start = std::time::Instant::now();
            let result = self.inner.send_batch(batch).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "batch delivered"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "batch delivery failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn send_entry(&self, entry: &Entry) -> Result<(), IngestError> {
        let span = tracing::info_span!("ingest.entry", url = %entry.source().url);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.send_entry(entry).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "entry delivered"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "entry delivery failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
