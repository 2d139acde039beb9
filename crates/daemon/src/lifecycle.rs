// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

use std::fs::File;
use std::sync::Arc;

use fs2::FileExt;
use gleaner_adapters::{HttpIngestAdapter, TracedIngestAdapter};
use gleaner_daemon::Config;
use gleaner_engine::{Buffer, BufferError, FlushOutcome, FlushSchedule, FlushTask};
use gleaner_storage::{JsonStore, StorageError};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::server::DaemonContext;

/// Buffer with the concrete store and ingestion adapter (wrapped with tracing)
pub type DaemonBuffer = Buffer<JsonStore, TracedIngestAdapter<HttpIngestAdapter>>;

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    /// Shared with connection handlers
    pub ctx: Arc<DaemonContext<JsonStore, TracedIngestAdapter<HttpIngestAdapter>>>,
    flusher: FlushTask,
}

impl DaemonState {
    /// Shutdown the daemon gracefully
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // 1. Stop the periodic flush (waits for an in-flight cycle)
        self.flusher.stop().await;

        // 2. One last attempt so a clean stop leaves nothing behind when the endpoint is up
        match self.ctx.buffer.flush().await {
            Ok(FlushOutcome::Idle) => {}
            Ok(FlushOutcome::Delivered { count }) => info!(count, "final flush delivered"),
            Ok(FlushOutcome::Deferred { pending, reason }) => {
                warn!(pending, "final flush failed, entries kept for next start: {}", reason)
            }
            Err(e) => warn!("final flush failed: {}", e),
        }

        // 3. Remove socket file
        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        // 4. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 5. Lock file is released when self.lock_file is dropped

        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(std::path::PathBuf, std::io::Error),

    #[error("Could not determine log directory")]
    NoLogDir,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            // A lock failure means another daemon owns these files
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create state directory (needed for lock, store, etc.)
    std::fs::create_dir_all(&config.state_dir)?;
    if let Some(parent) = config.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 2. Acquire lock file FIRST - prevents races. Opened without truncation
    //    so a losing instance does not wipe the running daemon's PID.
    let mut lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    use std::io::Write;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    // 3. Open the store and report anything left from the previous run
    let store = JsonStore::open(&config.store_path)?;
    let ingest = TracedIngestAdapter::new(HttpIngestAdapter::new(
        config.endpoint.clone(),
        config.request_timeout,
    ));
    let buffer: Arc<DaemonBuffer> =
        Arc::new(Buffer::new(store, ingest).with_delivery_mode(config.delivery));

    let pending = buffer.pending().await?;
    if pending > 0 {
        warn!("Found {} undelivered entries from previous run", pending);
    }

    // 4. Remove stale socket and bind (LAST - only after all validation passes)
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    // 5. Start the periodic flush
    let schedule = FlushSchedule::new(config.flush_interval, config.retry.clone());
    let flusher = FlushTask::spawn(Arc::clone(&buffer), schedule);

    info!(
        endpoint = %config.endpoint,
        delivery = ?config.delivery,
        "Daemon started with state in {}",
        config.state_dir.display()
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        listener,
        ctx: Arc::new(DaemonContext::new(buffer)),
        flusher,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    // Remove socket if we created it
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }

    // Remove PID/lock file
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
