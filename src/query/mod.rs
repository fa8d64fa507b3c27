// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive lookups: autocomplete, per-kind insertion/preview behavior, and trigger-word
//! highlighting across the node graph.

pub mod autocomplete;
pub mod behavior;
pub mod highlight;

pub use autocomplete::{
    apply_insertion, extract_search_term, fetch_results, Autocomplete, AutocompleteOptions,
    AutocompleteState, Commit, Key, KeyOutcome, SearchRequest, SearchTerm,
};
pub use behavior::{Behavior, ModelBehavior, PreviewSlot};
pub use highlight::{collect_active_lora_names, GraphNode, NodeGraph, TriggerHighlighter};
