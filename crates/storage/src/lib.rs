// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Durable key-value storage for the pending queue

pub mod json;
pub mod pending;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use json::JsonStore;
pub use pending::{PendingQueue, PENDING_KEY};
pub use store::{KvStore, StorageError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};
