// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Trailing-edge debounce as an explicit state machine.
//!
//! `Idle -> Pending -> (Fired | Cancelled)`. Rescheduling while pending replaces the arguments and
//! pushes the deadline out, so a burst of calls collapses into one firing carrying the last value.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
    Fired,
    Cancelled,
}

#[derive(Debug)]
struct Pending<T> {
    args: T,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    state: DebounceState,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, state: DebounceState::Idle, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Schedules `args`, replacing anything already pending.
    pub fn schedule(&mut self, args: T, now: Instant) {
        self.pending = Some(Pending { args, deadline: now + self.delay });
        self.state = DebounceState::Pending;
    }

    /// Returns the pending arguments once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|pending| now >= pending.deadline);
        if due {
            self.fire()
        } else {
            None
        }
    }

    /// Fires immediately if anything is pending.
    pub fn flush(&mut self) -> Option<T> {
        self.fire()
    }

    /// Drops the pending arguments; returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        if self.pending.take().is_some() {
            self.state = DebounceState::Cancelled;
            true
        } else {
            false
        }
    }

    /// Sleeps until the pending deadline and fires. Returns `None` when nothing is pending.
    pub async fn wait(&mut self) -> Option<T> {
        loop {
            let deadline = self.deadline()?;
            tokio::time::sleep_until(deadline).await;
            if let Some(args) = self.poll(Instant::now()) {
                return Some(args);
            }
        }
    }

    fn fire(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        self.state = DebounceState::Fired;
        Some(pending.args)
    }
}
