// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gleaner daemon library: configuration and the socket protocol shared with the CLI

pub mod config;
pub mod protocol;

pub use config::{Config, ConfigError, Settings};
pub use protocol::{ProtocolError, Request, Response};
