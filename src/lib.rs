// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lorasync: LoRA prompt-syntax reconciliation for node-editor widgets.
//!
//! Free prompt text carries inline `<lora:name:strength[:clip]>` tokens; the widget shows them as
//! a structured list. This crate parses and formats the tokens, reconciles text and list in both
//! directions, groups trigger words into toggle tags, and drives the autocomplete dropdown.

pub mod api;
pub mod config;
pub mod format;
pub mod model;
pub mod ops;
pub mod query;
pub mod store;
pub mod sync;
