// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime settings with `LORASYNC_*` environment overrides.

use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8188";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period before list edits are written back into the prompt text.
    pub debounce: Duration,
    /// Delay between the last keystroke and an autocomplete search.
    pub search_delay: Duration,
    pub min_search_chars: usize,
    /// Delay before the first autocomplete result is selected.
    pub auto_select_delay: Duration,
    pub search_limit: usize,
    pub trigger_cache_ttl: Duration,
    pub base_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(80),
            search_delay: Duration::from_millis(200),
            min_search_chars: 1,
            auto_select_delay: Duration::from_millis(50),
            search_limit: 20,
            trigger_cache_ttl: Duration::from_secs(5 * 60),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid {name}: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| match env::var(name) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => Some("<non-unicode>".to_owned()),
        })
    }

    /// Builds a config from defaults plus whatever `lookup` returns for each `LORASYNC_*` name.
    /// Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |name: &str| {
            lookup(name).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
        };

        if let Some(raw) = get("LORASYNC_DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(parse_env("LORASYNC_DEBOUNCE_MS", &raw)?);
        }
        if let Some(raw) = get("LORASYNC_SEARCH_DELAY_MS") {
            config.search_delay =
                Duration::from_millis(parse_env("LORASYNC_SEARCH_DELAY_MS", &raw)?);
        }
        if let Some(raw) = get("LORASYNC_MIN_SEARCH_CHARS") {
            config.min_search_chars = parse_env("LORASYNC_MIN_SEARCH_CHARS", &raw)?;
        }
        if let Some(raw) = get("LORASYNC_SEARCH_LIMIT") {
            let limit: usize = parse_env("LORASYNC_SEARCH_LIMIT", &raw)?;
            if limit == 0 {
                return Err(invalid("LORASYNC_SEARCH_LIMIT", &raw));
            }
            config.search_limit = limit;
        }
        if let Some(raw) = get("LORASYNC_TRIGGER_CACHE_TTL_SECS") {
            config.trigger_cache_ttl =
                Duration::from_secs(parse_env("LORASYNC_TRIGGER_CACHE_TTL_SECS", &raw)?);
        }
        if let Some(raw) = get("LORASYNC_BASE_URL") {
            if !(raw.starts_with("http://") || raw.starts_with("https://")) {
                return Err(invalid("LORASYNC_BASE_URL", &raw));
            }
            config.base_url = raw.trim_end_matches('/').to_owned();
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| invalid(name, raw))
}

fn invalid(name: &str, raw: &str) -> ConfigError {
    ConfigError::InvalidEnv { name: name.to_owned(), value: raw.to_owned() }
}
