// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gleaner buffering engine: append, capture and flush over the pending queue

mod buffer;
mod error;
mod flusher;
mod schedule;

pub use buffer::{Buffer, CaptureOutcome, DeliveryMode, FlushOutcome};
pub use error::BufferError;
pub use flusher::FlushTask;
pub use schedule::FlushSchedule;
