// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gleaner-core: Core types for the gleaner capture buffer
//!
//! This crate provides:
//! - The captured document model (entries, sources, batches)
//! - Capture events submitted by producers
//! - A FIFO async mutex that serializes access to the pending queue
//! - The retry policy used by the flush cycle
//! - The extractor seam for turning raw pages into entries

pub mod entry;
pub mod event;
pub mod extract;
pub mod mutex;
pub mod retry;

pub use entry::{Batch, Entry, Source, BROWSER_SOURCE};
pub use event::CaptureEvent;
pub use extract::{Extracted, Extractor, TextExtractor};
pub use mutex::{FifoMutex, LockTicket};
pub use retry::RetryPolicy;
