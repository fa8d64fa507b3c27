// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::Cell;

/// Identity of one asynchronous request; compare against [`RequestCounter::is_current`] when the
/// response arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter. Starting a request supersedes every earlier one; superseded
/// responses are dropped on arrival rather than cancelled in flight.
///
/// Tokens are issued through a shared reference so a newer request can start while an older one
/// is still awaiting its response.
#[derive(Debug, Clone, Default)]
pub struct RequestCounter {
    latest: Cell<u64>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RequestToken {
        self.invalidate();
        RequestToken(self.latest.get())
    }

    /// Supersedes any outstanding request without starting a new one.
    pub fn invalidate(&self) {
        self.latest.set(self.latest.get() + 1);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest.get()
    }
}
