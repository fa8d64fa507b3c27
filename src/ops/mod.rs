// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reconciliation between free prompt text and the structured LoRA list.
//!
//! Text is authoritative for which LoRAs exist and their base strengths; the list is
//! authoritative for `active`, `expanded`, and ordering. [`merge_loras`] folds text edits into the
//! list, [`apply_list_to_text`] writes list edits back into the text, and [`apply_op`] performs the
//! widget-level list mutations in between.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;

use crate::format::lora::{parse_loras, LoraToken};
use crate::model::strength::strengths_differ;
use crate::model::{LoraEntry, LoraList};

/// Comma-separated prompt pieces under construction.
///
/// Plain text has whitespace runs collapsed and commas treated as separators. Token text is
/// copied verbatim, so names containing commas or repeated spaces survive untouched.
#[derive(Debug, Default)]
struct PromptPieces {
    pieces: Vec<String>,
    current: String,
    pending_space: bool,
}

impl PromptPieces {
    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == ',' {
                self.end_piece();
            } else if ch.is_whitespace() {
                self.pending_space = !self.current.is_empty();
            } else {
                self.separate();
                self.current.push(ch);
            }
        }
    }

    fn push_token(&mut self, token: &str) {
        self.separate();
        self.current.push_str(token);
    }

    fn separate(&mut self) {
        if mem::take(&mut self.pending_space) {
            self.current.push(' ');
        }
    }

    fn end_piece(&mut self) {
        self.pending_space = false;
        if !self.current.is_empty() {
            self.pieces.push(mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> String {
        self.end_piece();
        self.pieces.join(", ")
    }
}

/// Cleans `text` while passing each token through `rewrite`; `None` deletes the token.
fn rebuild_prompt(
    text: &str,
    mut rewrite: impl FnMut(&LoraToken<'_>) -> Option<String>,
) -> String {
    let mut pieces = PromptPieces::default();
    let mut cursor = 0;
    for token in parse_loras(text) {
        pieces.push_text(&text[cursor..token.span.start]);
        if let Some(replacement) = rewrite(&token) {
            pieces.push_token(&replacement);
        }
        cursor = token.span.end;
    }
    pieces.push_text(&text[cursor..]);
    pieces.finish()
}

/// Collapses whitespace, drops empty comma pieces, and normalizes separators to `", "`.
///
/// Tokens are left exactly as written.
pub fn clean_prompt_text(text: &str) -> String {
    rebuild_prompt(text, |token| Some(text[token.span.clone()].to_owned()))
}

/// Rewrites `original_text` so its tokens reflect `entries`.
///
/// Tokens for listed names are reformatted from the entry's current strengths, tokens for
/// unlisted names are removed, and listed names missing from the text are appended in list order.
pub fn apply_list_to_text(original_text: &str, entries: &LoraList) -> String {
    let lookup = entries.index_by_name();
    let mut retained: HashSet<&str> = HashSet::new();

    let mut text = rebuild_prompt(original_text, |token| {
        let index = *lookup.get(token.name)?;
        let entry = &entries.entries()[index];
        retained.insert(entry.name.as_str());
        Some(entry.to_token(token.has_clip()))
    });

    let missing = entries
        .iter()
        .filter(|entry| !retained.contains(entry.name.as_str()))
        .map(|entry| entry.to_token(false))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&missing.join(" "));
    }

    text
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ParsedLora {
    strength: f64,
    clip_strength: Option<f64>,
}

/// Folds parsed tokens into `current`.
///
/// Names absent from the tokens are dropped. Names present in both keep their list position,
/// `active`, and `expanded` state while taking the token's strength. New names are appended in
/// text order. A token whose clip diverges from its strength expands the entry so the clip
/// remains visible.
pub fn merge_loras<'t>(
    tokens: impl IntoIterator<Item = LoraToken<'t>>,
    current: &LoraList,
) -> LoraList {
    let mut order: Vec<&'t str> = Vec::new();
    let mut parsed: HashMap<&'t str, ParsedLora> = HashMap::new();
    for token in tokens {
        let value = ParsedLora { strength: token.strength(), clip_strength: token.clip_strength() };
        if parsed.insert(token.name, value).is_none() {
            order.push(token.name);
        }
    }

    let mut merged = LoraList::new();
    for entry in current.iter() {
        let Some(value) = parsed.get(entry.name.as_str()) else {
            continue;
        };
        let mut entry = entry.clone();
        apply_parsed(&mut entry, *value);
        merged.upsert(entry);
    }

    for name in order {
        if merged.contains(name) {
            continue;
        }
        let value = parsed[name];
        let mut entry = LoraEntry::new(name, value.strength);
        apply_parsed(&mut entry, value);
        merged.upsert(entry);
    }

    merged
}

fn apply_parsed(entry: &mut LoraEntry, value: ParsedLora) {
    entry.set_strength(value.strength);
    if let Some(clip) = value.clip_strength {
        if strengths_differ(clip, value.strength) {
            entry.expanded = true;
        }
        if entry.expanded {
            entry.set_clip_strength(clip);
        }
    }
}

/// Parses `text` and merges its tokens into `current`.
pub fn merge_text(text: &str, current: &LoraList) -> LoraList {
    merge_loras(parse_loras(text), current)
}

/// Widget-level list mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum LoraOp {
    Add { name: String, strength: f64 },
    Remove { name: String },
    SetStrength { name: String, strength: f64 },
    StepStrength { name: String, delta: f64 },
    SetClipStrength { name: String, clip_strength: f64 },
    Toggle { name: String },
    SetActive { name: String, active: bool },
    SetAllActive { active: bool },
    SetExpanded { name: String, expanded: bool },
    Move { name: String, to_index: usize },
}

impl LoraOp {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Add { name, .. }
            | Self::Remove { name }
            | Self::SetStrength { name, .. }
            | Self::StepStrength { name, .. }
            | Self::SetClipStrength { name, .. }
            | Self::Toggle { name }
            | Self::SetActive { name, .. }
            | Self::SetExpanded { name, .. }
            | Self::Move { name, .. } => Some(name),
            Self::SetAllActive { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoraOpError {
    NotFound { name: String },
    InvalidName { name: String },
}

impl fmt::Display for LoraOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "lora not found in list: {name}"),
            Self::InvalidName { name } => {
                write!(f, "invalid lora name {name:?}: must be non-empty without ':' or '>'")
            }
        }
    }
}

impl std::error::Error for LoraOpError {}

pub fn apply_op(list: &mut LoraList, op: &LoraOp) -> Result<(), LoraOpError> {
    match op {
        LoraOp::Add { name, strength } => {
            let name = name.trim();
            if name.is_empty() || name.contains([':', '>']) {
                return Err(LoraOpError::InvalidName { name: name.to_owned() });
            }
            list.upsert(LoraEntry::new(name, *strength));
            Ok(())
        }
        LoraOp::Remove { name } => {
            list.remove(name).map(drop).ok_or_else(|| not_found(name))
        }
        LoraOp::SetStrength { name, strength } => {
            entry_mut(list, name)?.set_strength(*strength);
            Ok(())
        }
        LoraOp::StepStrength { name, delta } => {
            let entry = entry_mut(list, name)?;
            let next = crate::model::step_strength(entry.strength, *delta);
            entry.set_strength(next);
            Ok(())
        }
        LoraOp::SetClipStrength { name, clip_strength } => {
            let entry = entry_mut(list, name)?;
            // Editing the clip implies an independent clip control.
            entry.expanded = true;
            entry.set_clip_strength(*clip_strength);
            Ok(())
        }
        LoraOp::Toggle { name } => {
            let entry = entry_mut(list, name)?;
            entry.active = !entry.active;
            Ok(())
        }
        LoraOp::SetActive { name, active } => {
            entry_mut(list, name)?.active = *active;
            Ok(())
        }
        LoraOp::SetAllActive { active } => {
            for entry in list.iter_mut() {
                entry.active = *active;
            }
            Ok(())
        }
        LoraOp::SetExpanded { name, expanded } => {
            entry_mut(list, name)?.set_expanded(*expanded);
            Ok(())
        }
        LoraOp::Move { name, to_index } => {
            if list.move_to(name, *to_index) {
                Ok(())
            } else {
                Err(not_found(name))
            }
        }
    }
}

fn entry_mut<'a>(list: &'a mut LoraList, name: &str) -> Result<&'a mut LoraEntry, LoraOpError> {
    list.get_mut(name).ok_or_else(|| not_found(name))
}

fn not_found(name: &str) -> LoraOpError {
    LoraOpError::NotFound { name: name.to_owned() }
}
