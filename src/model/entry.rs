// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::strength::{
    format_strength, parse_strength, round_strength, should_include_clip, strengths_differ,
    DEFAULT_STRENGTH,
};
use crate::format::lora::format_lora;

/// One structured LoRA reference as shown by the list widget.
///
/// `clip_strength` mirrors `strength` whenever the entry is collapsed; the mutators below keep
/// that invariant so callers never have to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawLoraEntry")]
pub struct LoraEntry {
    pub name: String,
    pub strength: f64,
    pub clip_strength: f64,
    pub active: bool,
    pub expanded: bool,
}

impl LoraEntry {
    pub fn new(name: impl Into<String>, strength: f64) -> Self {
        let strength = finite_or_default(strength);
        Self { name: name.into(), strength, clip_strength: strength, active: true, expanded: false }
    }

    pub fn with_clip(mut self, clip_strength: f64) -> Self {
        self.clip_strength = finite_or_default(clip_strength);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn set_strength(&mut self, strength: f64) {
        self.strength = finite_or_default(strength);
        if !self.expanded {
            self.clip_strength = self.strength;
        }
    }

    pub fn set_clip_strength(&mut self, clip_strength: f64) {
        self.clip_strength = finite_or_default(clip_strength);
    }

    /// Collapsing snaps the clip strength back onto the model strength.
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
        if !expanded {
            self.clip_strength = self.strength;
        }
    }

    pub fn strength_text(&self) -> String {
        format_strength(self.strength)
    }

    pub fn clip_strength_text(&self) -> String {
        format_strength(self.clip_strength)
    }

    /// Formats the inline token for this entry.
    ///
    /// `had_clip_in_source` seeds the clip-inclusion decision so an explicit clip segment the user
    /// typed survives a rewrite.
    pub fn to_token(&self, had_clip_in_source: bool) -> String {
        let include_clip = should_include_clip(
            self.strength,
            Some(self.clip_strength),
            self.expanded,
            had_clip_in_source,
        );
        let clip = include_clip.then_some(round_strength(self.clip_strength));
        format_lora(&self.name, round_strength(self.strength), clip)
    }
}

fn finite_or_default(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        DEFAULT_STRENGTH
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawStrength {
    Number(f64),
    Text(String),
}

impl RawStrength {
    fn value(&self) -> f64 {
        match self {
            Self::Number(value) => finite_or_default(*value),
            Self::Text(raw) => parse_strength(raw),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLoraEntry {
    name: String,
    #[serde(default)]
    strength: Option<RawStrength>,
    #[serde(default)]
    clip_strength: Option<RawStrength>,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    expanded: bool,
}

fn default_active() -> bool {
    true
}

impl From<RawLoraEntry> for LoraEntry {
    fn from(raw: RawLoraEntry) -> Self {
        let strength = raw.strength.as_ref().map_or(DEFAULT_STRENGTH, RawStrength::value);
        let clip_strength = raw.clip_strength.as_ref().map_or(strength, RawStrength::value);
        // A diverging clip is only representable on an expanded entry.
        let expanded = raw.expanded || strengths_differ(clip_strength, strength);
        let clip_strength = if expanded { clip_strength } else { strength };
        Self { name: raw.name, strength, clip_strength, active: raw.active, expanded }
    }
}

/// Ordered LoRA entries with unique names.
///
/// List order is render and serialize order. Inserting a name that already exists replaces the
/// entry in place, so duplicates collapse with the last write winning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LoraEntry>", into = "Vec<LoraEntry>")]
pub struct LoraList {
    entries: Vec<LoraEntry>,
}

impl LoraList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LoraEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoraEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LoraEntry> {
        self.entries.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&LoraEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LoraEntry> {
        self.entries.iter_mut().find(|entry| entry.name == name)
    }

    /// Replaces an existing entry in place or appends a new one.
    pub fn upsert(&mut self, entry: LoraEntry) {
        match self.position(&entry.name) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<LoraEntry> {
        let index = self.position(name)?;
        Some(self.entries.remove(index))
    }

    /// Moves `name` to `to_index` (clamped to the end of the list).
    pub fn move_to(&mut self, name: &str, to_index: usize) -> bool {
        let Some(from) = self.position(name) else {
            return false;
        };
        let entry = self.entries.remove(from);
        let to_index = to_index.min(self.entries.len());
        self.entries.insert(to_index, entry);
        true
    }

    pub fn retain(&mut self, keep: impl FnMut(&LoraEntry) -> bool) {
        self.entries.retain(keep);
    }

    /// Name -> index lookup over the current order.
    pub fn index_by_name(&self) -> HashMap<&str, usize> {
        self.entries.iter().enumerate().map(|(index, entry)| (entry.name.as_str(), index)).collect()
    }

    /// Tokens for active entries only, joined by `", "`; what the node actually applies.
    pub fn active_text(&self) -> String {
        self.entries
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.to_token(false))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn into_entries(self) -> Vec<LoraEntry> {
        self.entries
    }
}

impl From<Vec<LoraEntry>> for LoraList {
    fn from(entries: Vec<LoraEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<LoraList> for Vec<LoraEntry> {
    fn from(list: LoraList) -> Self {
        list.entries
    }
}

impl FromIterator<LoraEntry> for LoraList {
    fn from_iter<I: IntoIterator<Item = LoraEntry>>(iter: I) -> Self {
        let mut list = Self::new();
        for entry in iter {
            list.upsert(entry);
        }
        list
    }
}

impl<'a> IntoIterator for &'a LoraList {
    type Item = &'a LoraEntry;
    type IntoIter = std::slice::Iter<'a, LoraEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
