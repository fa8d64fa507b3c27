// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON payloads of the `/lm/...` endpoints.
//!
//! Every response carries a `success` flag; missing fields default so a partial or failed
//! response reads as "nothing".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub relative_paths: Vec<String>,
}

impl SearchResponse {
    pub fn into_paths(self) -> Vec<String> {
        if self.success {
            self.relative_paths
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TriggerWordsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub trigger_words: Vec<String>,
}

impl TriggerWordsResponse {
    pub fn into_words(self) -> Vec<String> {
        if self.success {
            self.trigger_words
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertTextRequest<'a> {
    pub relative_path: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InsertTextResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub text: Option<String>,
}

/// Preview tooltip metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewInfo {
    pub preview_url: String,
    pub display_name: String,
    /// Bitmask of license restrictions, when the model declares any.
    #[serde(default)]
    pub license_flags: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub license_flags: Option<u32>,
}

impl PreviewResponse {
    /// `None` unless the response succeeded with a usable URL. The display name falls back to
    /// `name`.
    pub fn into_preview(self, name: &str) -> Option<PreviewInfo> {
        if !self.success {
            return None;
        }
        let preview_url = self.preview_url.filter(|url| !url.is_empty())?;
        Some(PreviewInfo {
            preview_url,
            display_name: self.display_name.unwrap_or_else(|| name.to_owned()),
            license_flags: self.license_flags,
        })
    }
}
