// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background flush task
//!
//! Runs one flush cycle after every scheduled delay. Cycles are serialized
//! with appends through the buffer's lock; this task only decides when to
//! start one.

use crate::buffer::{Buffer, FlushOutcome};
use crate::schedule::FlushSchedule;
use gleaner_adapters::IngestAdapter;
use gleaner_storage::KvStore;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Handle to the running flush loop
pub struct FlushTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl FlushTask {
    pub fn spawn<S, I>(buffer: Arc<Buffer<S, I>>, schedule: FlushSchedule) -> Self
    where
        S: KvStore,
        I: IngestAdapter,
    {
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run(buffer, schedule, stop_rx));
        Self { stop, handle }
    }

    /// Stop scheduling cycles. A cycle already in progress runs to completion
    /// before this returns.
    pub async fn stop(self) {
        let Self { stop, handle } = self;
        // The loop may already have exited; nothing to signal then
        let _ = stop.send(());
        if let Err(e) = handle.await {
            error!("flush task ended abnormally: {}", e);
        }
    }
}

async fn run<S, I>(
    buffer: Arc<Buffer<S, I>>,
    mut schedule: FlushSchedule,
    mut stop: oneshot::Receiver<()>,
) where
    S: KvStore,
    I: IngestAdapter,
{
    info!(interval = ?schedule.interval(), "flush task started");

    loop {
        let delay = schedule.next_delay();
        tokio::select! {
            _ = &mut stop => break,
            _ = tokio::time::sleep(delay) => {}
        }

        let result = buffer.flush().await;
        match &result {
            Ok(FlushOutcome::Idle) => debug!("flush cycle idle"),
            Ok(FlushOutcome::Delivered { count }) => info!(count, "batch delivered"),
            Ok(FlushOutcome::Deferred { pending, reason }) => {
                warn!(pending, reason = %reason, "delivery failed, will retry")
            }
            Err(e) => error!("flush cycle failed: {}", e),
        }
        schedule.record(&result);

        if schedule.failures() > 0 {
            debug!(
                failures = schedule.failures(),
                next = ?schedule.next_delay(),
                "retry scheduled"
            );
        }
    }

    info!("flush task stopped");
}

#[cfg(test)]
#[path = "flusher_tests.rs"]
mod tests;
