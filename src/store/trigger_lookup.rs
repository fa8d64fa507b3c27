// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::{Ref, RefCell};

use tokio::time::Instant;
use tracing::warn;

use super::ttl_cache::TtlCache;
use crate::api::LmApi;
use crate::config::SyncConfig;

/// Trigger words per LoRA name, fetched on demand and cached.
///
/// Failed lookups are cached as empty so an unreachable backend is not hammered on every
/// keystroke. Lookups take `&self` so overlapping refreshes can share one cache; the cache is
/// never borrowed across an await.
#[derive(Debug)]
pub struct TriggerWordLookup {
    cache: RefCell<TtlCache<String, Vec<String>>>,
}

impl TriggerWordLookup {
    pub fn new(cache: TtlCache<String, Vec<String>>) -> Self {
        Self { cache: RefCell::new(cache) }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(TtlCache::new(config.trigger_cache_ttl))
    }

    pub fn cache(&self) -> Ref<'_, TtlCache<String, Vec<String>>> {
        self.cache.borrow()
    }

    pub async fn trigger_words<A: LmApi>(
        &self,
        api: &A,
        name: &str,
        now: Instant,
    ) -> Vec<String> {
        let cached = self.cache.borrow_mut().get(name, now).cloned();
        if let Some(words) = cached {
            return words;
        }

        let words = match api.trigger_words(name).await {
            Ok(words) => words,
            Err(err) => {
                warn!(name, %err, "trigger word lookup failed");
                Vec::new()
            }
        };
        self.cache.borrow_mut().put(name.to_owned(), words.clone(), now);
        words
    }

    /// Trigger words for several names, in order, without duplicates.
    pub async fn trigger_words_for<A: LmApi>(
        &self,
        api: &A,
        names: &[String],
        now: Instant,
    ) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            for word in self.trigger_words(api, name, now).await {
                if !out.contains(&word) {
                    out.push(word);
                }
            }
        }
        out
    }
}
