// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::Cell;
use std::rc::Rc;

/// Coarse per-widget re-entrancy flag.
///
/// Held while the widget writes into host state so that change callbacks fired by that write can
/// see it and bail out instead of feeding the write back in. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct SyncGuard {
    held: Rc<Cell<bool>>,
}

impl SyncGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    /// Takes the flag, or returns `None` if it is already held.
    pub fn try_enter(&self) -> Option<SyncGuardToken> {
        if self.held.replace(true) {
            return None;
        }
        Some(SyncGuardToken { held: Rc::clone(&self.held) })
    }
}

/// Releases the flag on drop.
#[derive(Debug)]
pub struct SyncGuardToken {
    held: Rc<Cell<bool>>,
}

impl Drop for SyncGuardToken {
    fn drop(&mut self) {
        self.held.set(false);
    }
}
