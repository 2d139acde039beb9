// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO async mutex guarding the pending queue
//!
//! Critical sections await storage and network I/O while holding the lock, so
//! a flag checked before suspension is not enough. Every `lock()` call takes a
//! ticket number at request time and waits in an explicit queue; release hands
//! the lock straight to the oldest live waiter through a oneshot channel.
//!
//! Release happens when the [`LockTicket`] is dropped, so a section that
//! returns early through `?` or unwinds still lets the next waiter in.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct LockState {
    /// Ticket currently inside its critical section
    holder: Option<u64>,
    next_ticket: u64,
    waiters: VecDeque<Waiter>,
}

#[derive(Debug)]
struct Waiter {
    ticket: u64,
    grant: oneshot::Sender<()>,
}

/// First-in-first-out async mutual exclusion.
///
/// Holds no data; it only orders access to a resource kept elsewhere.
/// Clones share the same lock.
#[derive(Debug, Clone, Default)]
pub struct FifoMutex {
    state: Arc<Mutex<LockState>>,
}

impl FifoMutex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access. Requests are granted in the order they were made.
    pub async fn lock(&self) -> LockTicket {
        let (ticket, grant) = {
            let mut state = lock_state(&self.state);
            let ticket = state.next_ticket;
            state.next_ticket += 1;

            if state.holder.is_none() {
                state.holder = Some(ticket);
                tracing::trace!(ticket, "lock granted immediately");
                return LockTicket {
                    state: Arc::clone(&self.state),
                    ticket,
                };
            }

            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(Waiter { ticket, grant: tx });
            tracing::trace!(ticket, waiting = state.waiters.len(), "lock queued");
            (ticket, rx)
        };

        Pending {
            state: Arc::clone(&self.state),
            ticket,
            grant: Some(grant),
        }
        .granted()
        .await
    }

    /// Whether a critical section is active. Advisory only.
    pub fn is_locked(&self) -> bool {
        lock_state(&self.state).holder.is_some()
    }

    /// Number of queued requests. Advisory only; may count abandoned waiters.
    pub fn waiting(&self) -> usize {
        lock_state(&self.state).waiters.len()
    }
}

/// Proof of exclusive access. Dropping it ends the critical section.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the ticket is dropped"]
pub struct LockTicket {
    state: Arc<Mutex<LockState>>,
    ticket: u64,
}

impl LockTicket {
    /// Position of this request in the global request order
    pub fn number(&self) -> u64 {
        self.ticket
    }
}

impl Drop for LockTicket {
    fn drop(&mut self) {
        release(&self.state, self.ticket);
    }
}

/// A queued `lock()` request that has not been granted yet
struct Pending {
    state: Arc<Mutex<LockState>>,
    ticket: u64,
    grant: Option<oneshot::Receiver<()>>,
}

impl Pending {
    async fn granted(mut self) -> LockTicket {
        if let Some(grant) = self.grant.as_mut() {
            // Senders are only dropped after a successful send or once this
            // receiver is closed, so the wait ends with a grant.
            let _ = grant.await;
        }
        self.grant = None;

        LockTicket {
            state: Arc::clone(&self.state),
            ticket: self.ticket,
        }
    }
}

impl Drop for Pending {
    // The lock() future was dropped while queued. Close the channel so release
    // skips this waiter; if the grant already landed, pass it on.
    fn drop(&mut self) {
        if let Some(mut grant) = self.grant.take() {
            grant.close();
            if grant.try_recv().is_ok() {
                tracing::trace!(ticket = self.ticket, "abandoned grant released");
                release(&self.state, self.ticket);
            }
        }
    }
}

fn release(state: &Mutex<LockState>, ticket: u64) {
    let mut state = lock_state(state);
    debug_assert_eq!(state.holder, Some(ticket));

    while let Some(waiter) = state.waiters.pop_front() {
        if waiter.grant.send(()).is_ok() {
            tracing::trace!(from = ticket, to = waiter.ticket, "lock handed off");
            state.holder = Some(waiter.ticket);
            return;
        }
    }

    tracing::trace!(ticket, "lock released");
    state.holder = None;
}

fn lock_state(state: &Mutex<LockState>) -> MutexGuard<'_, LockState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "mutex_tests.rs"]
mod tests;
