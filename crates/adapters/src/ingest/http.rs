// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP ingestion adapter

use super::{IngestAdapter, IngestError};
use async_trait::async_trait;
use gleaner_core::{Batch, Entry};
use std::sync::Arc;
use std::time::Duration;

/// POSTs JSON to the ingestion endpoint.
///
/// ureq is blocking, so each request runs on the blocking thread pool. The
/// global timeout bounds how long a stalled endpoint can hold the buffer lock.
#[derive(Clone)]
pub struct HttpIngestAdapter {
    agent: ureq::Agent,
    endpoint: Arc<str>,
}

impl HttpIngestAdapter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
            endpoint: Arc::from(endpoint.into()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_json(&self, body: String) -> Result<(), IngestError> {
        let agent = self.agent.clone();
        let endpoint = Arc::clone(&self.endpoint);

        tokio::task::spawn_blocking(move || {
            agent
                .post(&*endpoint)
                .header("Content-Type", "application/json")
                .send(body)
                .map(|_| ())
                .map_err(IngestError::from)
        })
        .await
        .map_err(|e| IngestError::Task(e.to_string()))?
    }
}

impl std::fmt::Debug for HttpIngestAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIngestAdapter")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl From<ureq::Error> for IngestError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => IngestError::Status(status),
            other => IngestError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl IngestAdapter for HttpIngestAdapter {
    async fn send_batch(&self, batch: &Batch) -> Result<(), IngestError> {
        self.post_json(serde_json::to_string(batch)?).await
    }

    async fn send_entry(&self, entry: &Entry) -> Result<(), IngestError> {
        self.post_json(serde_json::to_string(entry)?).await
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
