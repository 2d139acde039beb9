// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flush cadence: base interval plus retry policy over consecutive failures

use crate::buffer::FlushOutcome;
use crate::error::BufferError;
use gleaner_core::RetryPolicy;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FlushSchedule {
    interval: Duration,
    policy: RetryPolicy,
    failures: u32,
}

impl FlushSchedule {
    pub fn new(interval: Duration, policy: RetryPolicy) -> Self {
        Self {
            interval,
            policy,
            failures: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait before the next cycle
    pub fn next_delay(&self) -> Duration {
        self.policy.delay(self.interval, self.failures)
    }

    /// Feed a cycle result back in. Deferred deliveries and storage errors
    /// count as failures; anything else resets the streak.
    pub fn record(&mut self, result: &Result<FlushOutcome, BufferError>) {
        match result {
            Ok(FlushOutcome::Deferred { .. }) | Err(_) => {
                self.failures = self.failures.saturating_add(1);
            }
            Ok(FlushOutcome::Idle) | Ok(FlushOutcome::Delivered { .. }) => {
                self.failures = 0;
            }
        }
    }

    /// Consecutive failed cycles
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
