// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use gleaner_core::CaptureEvent;
use gleaner_daemon::protocol::{self, ProtocolError, DEFAULT_TIMEOUT};
use gleaner_daemon::{Config, Request, Response};
use gleaner_engine::FlushOutcome;
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests that never wait on the buffer (ping, shutdown)
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("GLEANER_TIMEOUT_IPC_MS").unwrap_or(DEFAULT_TIMEOUT)
}

/// Timeout for waiting for process to exit
pub fn timeout_exit() -> Duration {
    parse_duration_ms("GLEANER_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval for retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("GLEANER_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Snapshot returned by the status request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonStatus {
    pub version: String,
    pub uptime_secs: u64,
    pub pending: usize,
    pub locked: bool,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
    /// Requests that take the buffer lock may wait behind a delivery in
    /// progress before running their own
    locked_timeout: Duration,
}

/// Longest a daemon may spend in one delivery plus one queued behind it
pub fn delivery_budget(config: &Config) -> Duration {
    config.request_timeout * 2
}

impl DaemonClient {
    /// Connect to existing daemon
    pub fn connect(config: &Config) -> Result<Self, ClientError> {
        if !config.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }

        Ok(Self {
            socket_path: config.socket_path.clone(),
            locked_timeout: delivery_budget(config) + timeout_ipc(),
        })
    }

    /// Send a request and receive a response with specific timeouts
    async fn send_with_timeout(
        &self,
        request: Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = match UnixStream::connect(&self.socket_path).await {
            Ok(stream) => stream,
            // Socket file left behind by a daemon that died
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                return Err(ClientError::DaemonNotRunning);
            }
            Err(e) => return Err(e.into()),
        };
        let (mut reader, mut writer) = stream.into_split();

        protocol::write_request(&mut writer, &request, write_timeout).await?;
        let response = protocol::read_response(&mut reader, read_timeout).await?;
        Ok(response)
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, timeout_ipc(), timeout_ipc())
            .await
    }

    /// Submit a capture; returns whether the daemon kept it
    pub async fn capture(&self, event: CaptureEvent) -> Result<bool, ClientError> {
        match self
            .send_with_timeout(Request::Capture { event }, self.locked_timeout, timeout_ipc())
            .await?
        {
            Response::Captured { accepted } => Ok(accepted),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Run a flush cycle now
    pub async fn flush(&self) -> Result<FlushOutcome, ClientError> {
        match self
            .send_with_timeout(Request::Flush, self.locked_timeout, timeout_ipc())
            .await?
        {
            Response::Flushed { outcome } => Ok(outcome),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Get daemon status
    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self
            .send_with_timeout(Request::Status, self.locked_timeout, timeout_ipc())
            .await?
        {
            Response::Status {
                version,
                uptime_secs,
                pending,
                locked,
            } => Ok(DaemonStatus {
                version,
                uptime_secs,
                pending,
                locked,
            }),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

/// Stop the daemon (graceful first, then forceful)
/// Returns true if daemon was stopped, false if it wasn't running
pub async fn daemon_stop(config: &Config) -> Result<bool, ClientError> {
    let client = match DaemonClient::connect(config) {
        Ok(c) => c,
        Err(ClientError::DaemonNotRunning) => return Ok(false),
        Err(e) => return Err(e),
    };

    let shutdown_result = match client.shutdown().await {
        Err(ClientError::DaemonNotRunning) => return Ok(false),
        other => other,
    };

    if let Some(pid) = read_daemon_pid(&config.lock_path) {
        // Shutdown lets the in-flight cycle finish, then runs a final flush
        if shutdown_result.is_ok() {
            wait_for_exit(pid, shutdown_grace(config)).await;
        }

        // Force kill if still running
        if process_exists(pid) {
            force_kill_daemon(pid);
            wait_for_exit(pid, timeout_exit()).await;
        }
    }

    Ok(true)
}

/// How long a graceful stop may take before the daemon is killed
pub fn shutdown_grace(config: &Config) -> Duration {
    timeout_exit() + delivery_budget(config)
}

/// Wait for a process to exit
async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(poll_interval()).await;
    }
    false
}

/// Get the PID from the daemon PID file, if it exists
pub fn read_daemon_pid(lock_path: &Path) -> Option<u32> {
    std::fs::read_to_string(lock_path)
        .ok()
        .and_then(|content| content.trim().parse::<u32>().ok())
}

/// Check if a process with the given PID exists
pub fn process_exists(pid: u32) -> bool {
    // Use kill -0 to check if process exists without sending a signal
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Force kill a daemon process
pub fn force_kill_daemon(pid: u32) -> bool {
    Command::new("kill")
        .args(["-9", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
