// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Process-side caches.

pub mod trigger_lookup;
pub mod ttl_cache;

pub use trigger_lookup::TriggerWordLookup;
pub use ttl_cache::TtlCache;
