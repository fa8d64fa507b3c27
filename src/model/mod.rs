// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: LoRA entries, the ordered entry list, trigger tags, strengths, and node modes.

pub mod entry;
pub mod kind;
pub mod node;
pub mod strength;
pub mod trigger;

pub use entry::{LoraEntry, LoraList};
pub use kind::{ModelKind, ParseModelKindError};
pub use node::{ModeChange, NodeId, NodeMode};
pub use strength::{
    format_strength, normalize_strength, parse_strength, round_strength, should_include_clip,
    step_strength, DEFAULT_STRENGTH, STRENGTH_EPSILON,
};
pub use trigger::TriggerTag;
