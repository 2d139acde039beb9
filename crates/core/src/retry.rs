// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy for the flush cycle
//!
//! A failed delivery leaves the pending queue untouched; the next flush cycle
//! retries it. The policy decides how long that next cycle waits.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the flush cycle spaces attempts after failures
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Always wait the flush interval
    #[default]
    Fixed,
    /// Multiply the wait by `multiplier` per consecutive failure, capped at `max`
    Backoff {
        #[serde(default = "default_multiplier")]
        multiplier: u32,
        #[serde(with = "humantime_serde", default = "default_max")]
        max: Duration,
    },
}

fn default_multiplier() -> u32 {
    2
}

fn default_max() -> Duration {
    Duration::from_secs(300)
}

impl RetryPolicy {
    pub fn backoff(multiplier: u32, max: Duration) -> Self {
        RetryPolicy::Backoff { multiplier, max }
    }

    /// Wait before the next flush after `failures` consecutive failed cycles
    pub fn delay(&self, interval: Duration, failures: u32) -> Duration {
        match self {
            RetryPolicy::Fixed => interval,
            RetryPolicy::Backoff { multiplier, max } => {
                if failures == 0 {
                    return interval;
                }
                // Never shorter than the base interval, even with a small cap
                let cap = (*max).max(interval);
                let factor = (*multiplier).max(1).saturating_pow(failures);
                interval.checked_mul(factor).map_or(cap, |d| d.min(cap))
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
