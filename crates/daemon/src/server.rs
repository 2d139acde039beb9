// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use std::sync::Arc;
use std::time::Instant;

use gleaner_adapters::IngestAdapter;
use gleaner_engine::{Buffer, CaptureOutcome};
use gleaner_storage::KvStore;
use tokio::net::UnixStream;
use tokio::sync::Notify;
use tracing::{debug, error, info};

use gleaner_daemon::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// State shared by every connection handler
pub struct DaemonContext<S, I> {
    pub buffer: Arc<Buffer<S, I>>,
    pub start_time: Instant,
    /// Signalled once a client asks the daemon to stop
    pub shutdown: Notify,
}

impl<S, I> DaemonContext<S, I> {
    pub fn new(buffer: Arc<Buffer<S, I>>) -> Self {
        Self {
            buffer,
            start_time: Instant::now(),
            shutdown: Notify::new(),
        }
    }
}

/// Handle a single client connection
pub async fn handle_connection<S, I>(
    ctx: &DaemonContext<S, I>,
    stream: UnixStream,
) -> Result<(), ServerError>
where
    S: KvStore,
    I: IngestAdapter,
{
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    let response = handle_request(ctx, request).await;

    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

/// Handle a single request and return a response
pub async fn handle_request<S, I>(ctx: &DaemonContext<S, I>, request: Request) -> Response
where
    S: KvStore,
    I: IngestAdapter,
{
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Capture { event } => {
            let url = event.url().to_string();
            match ctx.buffer.capture(event).await {
                Ok(outcome) => {
                    info!(url = %url, outcome = ?outcome, "capture handled");
                    Response::Captured {
                        accepted: outcome != CaptureOutcome::Dropped,
                    }
                }
                Err(e) => {
                    error!(url = %url, "capture failed: {}", e);
                    Response::Error {
                        message: e.to_string(),
                    }
                }
            }
        }

        Request::Flush => match ctx.buffer.flush().await {
            Ok(outcome) => {
                info!(outcome = ?outcome, "manual flush");
                Response::Flushed { outcome }
            }
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::Status => {
            let locked = ctx.buffer.is_locked();
            match ctx.buffer.pending().await {
                Ok(pending) => Response::Status {
                    version: PROTOCOL_VERSION.to_string(),
                    uptime_secs: ctx.start_time.elapsed().as_secs(),
                    pending,
                    locked,
                },
                Err(e) => Response::Error {
                    message: e.to_string(),
                },
            }
        }

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
