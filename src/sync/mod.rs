// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keeping prompt text and the LoRA list in step: debounce, re-entrancy guard, and the widget
//! that ties them together.

pub mod debounce;
pub mod guard;
pub mod request;
pub mod widget;

pub use debounce::{DebounceState, Debouncer};
pub use guard::{SyncGuard, SyncGuardToken};
pub use request::{RequestCounter, RequestToken};
pub use widget::{HostBinding, LoraWidget};
