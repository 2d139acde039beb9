// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending-queue buffer
//!
//! Every read-modify-write of the pending queue happens while holding a
//! ticket from the buffer's [`FifoMutex`]. The ticket is a local in each
//! operation, so any `?` return releases it.

use crate::error::BufferError;
use gleaner_adapters::IngestAdapter;
use gleaner_core::{Batch, CaptureEvent, Entry, Extractor, FifoMutex, TextExtractor};
use gleaner_storage::{KvStore, PendingQueue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How captured entries reach the endpoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Queue entries; the flush cycle delivers them in batches
    #[default]
    Batched,
    /// Send each entry as it arrives, queueing it only if the send fails
    Immediate,
}

/// What happened to a capture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOutcome {
    /// No readable content; nothing was stored
    Dropped,
    /// Appended to the pending queue
    Queued,
    /// Sent straight to the endpoint (immediate mode)
    Delivered,
}

/// Result of one flush cycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlushOutcome {
    /// Queue was empty; nothing written, nothing sent
    Idle,
    /// Batch accepted and the queue cleared
    Delivered { count: usize },
    /// Delivery failed; the queue is unchanged
    Deferred { pending: usize, reason: String },
}

/// Durable buffer between capture producers and the ingestion endpoint
pub struct Buffer<S, I> {
    queue: PendingQueue<S>,
    ingest: I,
    mutex: FifoMutex,
    extractor: Arc<dyn Extractor>,
    mode: DeliveryMode,
}

impl<S, I> Buffer<S, I>
where
    S: KvStore,
    I: IngestAdapter,
{
    pub fn new(store: S, ingest: I) -> Self {
        Self {
            queue: PendingQueue::new(store),
            ingest,
            mutex: FifoMutex::new(),
            extractor: Arc::new(TextExtractor::new()),
            mode: DeliveryMode::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn with_delivery_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Whether an append or flush is in progress. Advisory only.
    pub fn is_locked(&self) -> bool {
        self.mutex.is_locked()
    }

    /// Append an entry to the end of the pending queue
    pub async fn append(&self, entry: Entry) -> Result<(), BufferError> {
        let _ticket = self.mutex.lock().await;

        let mut entries = self.queue.load().await?;
        entries.push(entry);
        self.queue.save(&entries).await?;

        tracing::debug!(pending = entries.len(), "entry appended");
        Ok(())
    }

    /// Turn a capture into an entry and hand it to the delivery mode.
    ///
    /// Pages without readable content are dropped without touching the store.
    pub async fn capture(&self, event: CaptureEvent) -> Result<CaptureOutcome, BufferError> {
        let entry = match event {
            CaptureEvent::Entry { entry } => entry,
            CaptureEvent::Page { url, html, title } => {
                let Some(extracted) = self.extractor.extract(&html) else {
                    tracing::debug!(url = %url, "no readable content, capture dropped");
                    return Ok(CaptureOutcome::Dropped);
                };
                Entry::from_page(
                    &url,
                    extracted.title.as_deref(),
                    title.as_deref(),
                    extracted.content,
                )
            }
        };

        self.submit(entry).await
    }

    /// Queue or send an entry according to the delivery mode
    pub async fn submit(&self, entry: Entry) -> Result<CaptureOutcome, BufferError> {
        match self.mode {
            DeliveryMode::Batched => {
                self.append(entry).await?;
                Ok(CaptureOutcome::Queued)
            }
            DeliveryMode::Immediate => match self.ingest.send_entry(&entry).await {
                Ok(()) => Ok(CaptureOutcome::Delivered),
                Err(e) => {
                    tracing::warn!(
                        url = %entry.source().url,
                        error = %e,
                        "immediate delivery failed, queueing entry"
                    );
                    self.append(entry).await?;
                    Ok(CaptureOutcome::Queued)
                }
            },
        }
    }

    /// Run one flush cycle: deliver the whole queue as one batch and clear it
    /// only if delivery succeeded.
    pub async fn flush(&self) -> Result<FlushOutcome, BufferError> {
        let _ticket = self.mutex.lock().await;

        let entries = self.queue.load().await?;
        if entries.is_empty() {
            return Ok(FlushOutcome::Idle);
        }

        let batch = Batch::new(entries);
        match self.ingest.send_batch(&batch).await {
            Ok(()) => {
                // A failure here means the batch may be delivered twice
                self.queue.clear().await?;
                Ok(FlushOutcome::Delivered { count: batch.len() })
            }
            Err(e) => Ok(FlushOutcome::Deferred {
                pending: batch.len(),
                reason: e.to_string(),
            }),
        }
    }

    /// Number of entries waiting for delivery. Waits behind any section in
    /// progress, including a delivery.
    pub async fn pending(&self) -> Result<usize, BufferError> {
        let _ticket = self.mutex.lock().await;
        Ok(self.queue.load().await?.len())
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
