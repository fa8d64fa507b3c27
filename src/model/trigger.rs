// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// One toggleable trigger word (or word group) derived from a trigger-word message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerTag {
    pub text: String,
    pub active: bool,
    /// Only set when per-tag strength adjustment is enabled.
    #[serde(default)]
    pub strength: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub highlighted: bool,
}

impl TriggerTag {
    pub fn new(text: impl Into<String>, active: bool) -> Self {
        Self { text: text.into(), active, strength: None, highlighted: false }
    }

    pub fn with_strength(mut self, strength: Option<f64>) -> Self {
        self.strength = strength;
        self
    }
}
