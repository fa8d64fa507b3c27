// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use super::{ApiError, LmApi, PreviewInfo};
use crate::model::ModelKind;

/// Scripted [`LmApi`] for tests. Unscripted lookups fail with `ApiError::Unsuccessful`.
///
/// `delays` holds per-name response latency for trigger-word and preview lookups; pair it with
/// paused tokio time.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    pub search_results: HashMap<String, Vec<String>>,
    pub trigger_words: HashMap<String, Vec<String>>,
    pub insert_texts: HashMap<String, String>,
    pub previews: HashMap<String, PreviewInfo>,
    pub delays: HashMap<String, Duration>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls.borrow().iter().filter(|call| call.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    async fn respond_after(&self, name: &str) {
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
    }
}

fn missing(path: &str) -> ApiError {
    ApiError::Unsuccessful { path: path.to_owned() }
}

impl LmApi for FakeApi {
    async fn search(
        &self,
        kind: ModelKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, ApiError> {
        self.record(format!("search:{kind}:{query}"));
        let mut results =
            self.search_results.get(query).cloned().ok_or_else(|| missing("search"))?;
        results.truncate(limit);
        Ok(results)
    }

    async fn trigger_words(&self, name: &str) -> Result<Vec<String>, ApiError> {
        self.record(format!("trigger_words:{name}"));
        self.respond_after(name).await;
        self.trigger_words.get(name).cloned().ok_or_else(|| missing("trigger_words"))
    }

    async fn insert_text(&self, kind: ModelKind, relative_path: &str) -> Result<String, ApiError> {
        self.record(format!("insert_text:{kind}:{relative_path}"));
        self.insert_texts.get(relative_path).cloned().ok_or_else(|| missing("insert_text"))
    }

    async fn preview(&self, kind: ModelKind, name: &str) -> Result<PreviewInfo, ApiError> {
        self.record(format!("preview:{kind}:{name}"));
        self.respond_after(name).await;
        self.previews.get(name).cloned().ok_or_else(|| missing("preview"))
    }
}
