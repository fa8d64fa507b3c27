// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Network collaborators: search, trigger-word lookup, insertion text, and preview metadata.
//!
//! Callers treat every failure as "no result"; [`ApiError`] exists so the reason can be logged.

pub mod http;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod types;

use std::fmt;

use crate::model::ModelKind;

pub use http::HttpLmApi;
pub use types::PreviewInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Transport { path: String, message: String },
    Status { path: String, status: u16 },
    Decode { path: String, message: String },
    Unsuccessful { path: String },
}

impl ApiError {
    pub(crate) fn transport(path: &str, err: impl fmt::Display) -> Self {
        Self::Transport { path: path.to_owned(), message: err.to_string() }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { path, message } => write!(f, "request to {path} failed: {message}"),
            Self::Status { path, status } => write!(f, "{path} returned HTTP {status}"),
            Self::Decode { path, message } => {
                write!(f, "invalid response from {path}: {message}")
            }
            Self::Unsuccessful { path } => write!(f, "{path} reported failure"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The model-library service as seen by the widgets.
#[allow(async_fn_in_trait)]
pub trait LmApi {
    /// Ranked relative paths matching `query`.
    async fn search(
        &self,
        kind: ModelKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, ApiError>;

    async fn trigger_words(&self, name: &str) -> Result<Vec<String>, ApiError>;

    /// Host-formatted text to insert for a selected path.
    async fn insert_text(&self, kind: ModelKind, relative_path: &str) -> Result<String, ApiError>;

    async fn preview(&self, kind: ModelKind, name: &str) -> Result<PreviewInfo, ApiError>;
}
