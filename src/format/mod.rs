// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text formats embedded in prompts: inline LoRA tokens and trigger-word lists.

pub mod lora;
pub mod trigger_words;

pub use lora::{format_lora, parse_loras, LoraToken, LoraTokens};
pub use trigger_words::{
    apply_highlights, encode_tag, group_trigger_words, join_active_tags, split_trigger_words,
    GroupOptions,
};
