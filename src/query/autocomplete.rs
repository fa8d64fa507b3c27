// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Autocomplete dropdown state: `Idle -> Debouncing -> Searching -> (Showing | Idle)`.
//!
//! The state machine is clock-driven (`now` is passed in) and never performs I/O itself;
//! [`Autocomplete::poll`] hands out search requests, [`fetch_results`] executes one against an
//! [`LmApi`], and [`Autocomplete::on_results`] takes the answer back. The state machine is not
//! borrowed while a search is in flight, so newer input can supersede it.

use std::ops::Range;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::LmApi;
use crate::config::SyncConfig;
use crate::model::ModelKind;
use crate::sync::request::{RequestCounter, RequestToken};

/// The word being completed and where it sits in the text (byte offsets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub term: String,
    pub span: Range<usize>,
}

/// Extracts the term before `cursor`: everything after the last `,` or `>`, trimmed.
///
/// The span starts at the first non-space character of the term and ends at the cursor, so a
/// commit replaces trailing spaces too.
pub fn extract_search_term(text: &str, cursor: usize) -> SearchTerm {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    let before = &text[..cursor];
    let segment_start = before.rfind([',', '>']).map_or(0, |index| index + 1);
    let segment = &before[segment_start..];
    let start = segment_start + (segment.len() - segment.trim_start().len());
    SearchTerm { term: before[start..].trim_end().to_owned(), span: start..cursor }
}

/// Replaces `span` with `insert`; returns the new text and the cursor just after the insertion.
pub fn apply_insertion(text: &str, span: Range<usize>, insert: &str) -> (String, usize) {
    let start = span.start.min(text.len());
    let end = span.end.clamp(start, text.len());
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..start]);
    out.push_str(insert);
    out.push_str(&text[end..]);
    (out, start + insert.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub kind: ModelKind,
    pub query: String,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteState {
    Idle,
    Debouncing { term: SearchTerm, deadline: Instant },
    Searching { term: SearchTerm, token: RequestToken },
    Showing { term: SearchTerm, items: Vec<String>, selected: Option<usize>, select_at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

/// A selection the caller should turn into inserted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub item: String,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The dropdown is not open; let the key through.
    Ignored,
    Moved(usize),
    Commit(Commit),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutocompleteOptions {
    pub search_delay: Duration,
    pub min_chars: usize,
    pub auto_select_delay: Duration,
    pub limit: usize,
}

impl From<&SyncConfig> for AutocompleteOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            search_delay: config.search_delay,
            min_chars: config.min_search_chars,
            auto_select_delay: config.auto_select_delay,
            limit: config.search_limit,
        }
    }
}

#[derive(Debug)]
pub struct Autocomplete {
    kind: ModelKind,
    options: AutocompleteOptions,
    state: AutocompleteState,
    requests: RequestCounter,
}

impl Autocomplete {
    pub fn new(kind: ModelKind, options: AutocompleteOptions) -> Self {
        Self { kind, options, state: AutocompleteState::Idle, requests: RequestCounter::new() }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn state(&self) -> &AutocompleteState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, AutocompleteState::Showing { .. })
    }

    pub fn items(&self) -> &[String] {
        match &self.state {
            AutocompleteState::Showing { items, .. } => items,
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match &self.state {
            AutocompleteState::Showing { selected, .. } => *selected,
            _ => None,
        }
    }

    /// Text or cursor changed. Restarts the search delay, or closes for a too-short term.
    pub fn on_input(&mut self, text: &str, cursor: usize, now: Instant) {
        let term = extract_search_term(text, cursor);
        if term.term.is_empty() || term.term.chars().count() < self.options.min_chars {
            self.close();
            return;
        }
        // Any in-flight search is for an older term.
        self.requests.invalidate();
        self.state =
            AutocompleteState::Debouncing { term, deadline: now + self.options.search_delay };
    }

    /// Advances timers. Returns a search request once the input has been quiet long enough.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        match &mut self.state {
            AutocompleteState::Debouncing { term, deadline } if now >= *deadline => {
                let term = term.clone();
                let token = self.requests.next();
                let request = SearchRequest {
                    token,
                    kind: self.kind,
                    query: term.term.clone(),
                    limit: self.options.limit,
                };
                self.state = AutocompleteState::Searching { term, token };
                Some(request)
            }
            AutocompleteState::Showing { selected, select_at, items, .. } => {
                if selected.is_none() && now >= *select_at && !items.is_empty() {
                    *selected = Some(0);
                }
                None
            }
            _ => None,
        }
    }

    /// Feeds search results back in. Returns `false` for responses to superseded requests.
    pub fn on_results(&mut self, token: RequestToken, items: Vec<String>, now: Instant) -> bool {
        let AutocompleteState::Searching { term, token: pending } = &self.state else {
            debug!(token = token.get(), "dropping search results: no search pending");
            return false;
        };
        if *pending != token || !self.requests.is_current(token) {
            debug!(token = token.get(), "dropping superseded search results");
            return false;
        }

        if items.is_empty() {
            self.state = AutocompleteState::Idle;
        } else {
            self.state = AutocompleteState::Showing {
                term: term.clone(),
                items,
                selected: None,
                select_at: now + self.options.auto_select_delay,
            };
        }
        true
    }

    pub fn on_key(&mut self, key: Key) -> KeyOutcome {
        if key == Key::Escape {
            return if matches!(self.state, AutocompleteState::Idle) {
                KeyOutcome::Ignored
            } else {
                self.close();
                KeyOutcome::Closed
            };
        }

        let AutocompleteState::Showing { term, items, selected, .. } = &mut self.state else {
            return KeyOutcome::Ignored;
        };
        let last = items.len().saturating_sub(1);
        match key {
            Key::Down => {
                let next = selected.map_or(0, |index| (index + 1).min(last));
                *selected = Some(next);
                KeyOutcome::Moved(next)
            }
            Key::Up => {
                let next = selected.map_or(0, |index| index.saturating_sub(1));
                *selected = Some(next);
                KeyOutcome::Moved(next)
            }
            Key::Enter => {
                let Some(item) = selected.and_then(|index| items.get(index)).cloned() else {
                    return KeyOutcome::Ignored;
                };
                let commit = Commit { item, span: term.span.clone() };
                self.close();
                KeyOutcome::Commit(commit)
            }
            Key::Escape => KeyOutcome::Closed,
        }
    }

    pub fn close(&mut self) {
        self.requests.invalidate();
        self.state = AutocompleteState::Idle;
    }
}

/// Executes `request`. Failures read as "no results".
pub async fn fetch_results<A: LmApi>(api: &A, request: &SearchRequest) -> Vec<String> {
    match api.search(request.kind, &request.query, request.limit).await {
        Ok(items) => items,
        Err(err) => {
            warn!(query = %request.query, %err, "autocomplete search failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::{fixture, rstest};
    use tokio::time::Instant;

    use super::{
        apply_insertion, extract_search_term, fetch_results, Autocomplete, AutocompleteOptions,
        AutocompleteState, Commit, Key, KeyOutcome,
    };
    use crate::api::test_utils::FakeApi;
    use crate::config::SyncConfig;
    use crate::model::ModelKind;

    #[rstest]
    #[case("foo, bar", 8, "bar", 5..8)]
    #[case("<lora:x:1>, ba", 14, "ba", 12..14)]
    #[case("<lora:x:1>ba", 12, "ba", 10..12)]
    #[case("foo, bar ", 9, "bar", 5..9)]
    #[case("foo, bar", 3, "foo", 0..3)]
    #[case("foo,", 4, "", 4..4)]
    #[case("", 0, "", 0..0)]
    #[case("abc", 99, "abc", 0..3)]
    fn search_term_cases(
        #[case] text: &str,
        #[case] cursor: usize,
        #[case] term: &str,
        #[case] span: std::ops::Range<usize>,
    ) {
        let found = extract_search_term(text, cursor);
        assert_eq!(found.term, term);
        assert_eq!(found.span, span);
    }

    #[test]
    fn search_term_respects_char_boundaries() {
        let found = extract_search_term("a, héllo", 5);
        assert_eq!(found.term, "h");
        assert_eq!(found.span, 3..4);
    }

    #[test]
    fn insertion_replaces_span_and_moves_cursor() {
        let (text, cursor) = apply_insertion("cat, ink, dog", 5..8, "<lora:ink:1.00>, ");
        assert_eq!(text, "cat, <lora:ink:1.00>, , dog");
        assert_eq!(cursor, 22);
    }

    #[fixture]
    fn autocomplete() -> Autocomplete {
        let options = AutocompleteOptions {
            min_chars: 2,
            ..AutocompleteOptions::from(&SyncConfig::default())
        };
        Autocomplete::new(ModelKind::Loras, options)
    }

    fn ms(start: Instant, millis: u64) -> Instant {
        start + Duration::from_millis(millis)
    }

    #[rstest]
    fn short_terms_stay_idle(mut autocomplete: Autocomplete) {
        let now = Instant::now();
        autocomplete.on_input("foo, b", 6, now);
        assert_eq!(autocomplete.state(), &AutocompleteState::Idle);
        assert_eq!(autocomplete.poll(ms(now, 1_000)), None);
    }

    #[rstest]
    fn typing_restarts_the_search_delay(mut autocomplete: Autocomplete) {
        let start = Instant::now();
        autocomplete.on_input("in", 2, start);
        autocomplete.on_input("ink", 3, ms(start, 150));

        assert_eq!(autocomplete.poll(ms(start, 250)), None);
        let request = autocomplete.poll(ms(start, 350)).expect("request");
        assert_eq!(request.query, "ink");
        assert_eq!(request.kind, ModelKind::Loras);
        assert_eq!(request.limit, 20);
        assert!(matches!(autocomplete.state(), AutocompleteState::Searching { .. }));
    }

    #[rstest]
    fn empty_results_return_to_idle(mut autocomplete: Autocomplete) {
        let start = Instant::now();
        autocomplete.on_input("ink", 3, start);
        let request = autocomplete.poll(ms(start, 200)).expect("request");
        assert!(autocomplete.on_results(request.token, Vec::new(), ms(start, 210)));
        assert_eq!(autocomplete.state(), &AutocompleteState::Idle);
    }

    #[rstest]
    fn stale_results_are_dropped(mut autocomplete: Autocomplete) {
        let start = Instant::now();
        autocomplete.on_input("ink", 3, start);
        let old = autocomplete.poll(ms(start, 200)).expect("request");

        autocomplete.on_input("inks", 4, ms(start, 210));
        assert!(!autocomplete.on_results(old.token, vec!["ink.safetensors".into()], ms(start, 220)));
        assert!(matches!(autocomplete.state(), AutocompleteState::Debouncing { .. }));
    }

    #[rstest]
    fn results_auto_select_then_navigate_with_clamping(mut autocomplete: Autocomplete) {
        let start = Instant::now();
        autocomplete.on_input("cat, in", 7, start);
        let request = autocomplete.poll(ms(start, 200)).expect("request");
        let items = vec!["ink.safetensors".to_owned(), "inkwash.safetensors".to_owned()];
        assert!(autocomplete.on_results(request.token, items, ms(start, 300)));
        assert!(autocomplete.is_visible());
        assert_eq!(autocomplete.selected(), None);

        assert_eq!(autocomplete.poll(ms(start, 349)), None);
        assert_eq!(autocomplete.selected(), None);
        autocomplete.poll(ms(start, 350));
        assert_eq!(autocomplete.selected(), Some(0));

        assert_eq!(autocomplete.on_key(Key::Up), KeyOutcome::Moved(0));
        assert_eq!(autocomplete.on_key(Key::Down), KeyOutcome::Moved(1));
        assert_eq!(autocomplete.on_key(Key::Down), KeyOutcome::Moved(1));

        let outcome = autocomplete.on_key(Key::Enter);
        assert_eq!(
            outcome,
            KeyOutcome::Commit(Commit { item: "inkwash.safetensors".to_owned(), span: 5..7 })
        );
        assert_eq!(autocomplete.state(), &AutocompleteState::Idle);
        assert_eq!(autocomplete.on_key(Key::Down), KeyOutcome::Ignored);
    }

    #[rstest]
    fn escape_forces_idle(mut autocomplete: Autocomplete) {
        let start = Instant::now();
        assert_eq!(autocomplete.on_key(Key::Escape), KeyOutcome::Ignored);
        autocomplete.on_input("ink", 3, start);
        assert_eq!(autocomplete.on_key(Key::Escape), KeyOutcome::Closed);
        assert_eq!(autocomplete.poll(ms(start, 1_000)), None);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_searches_collapse_to_no_results(mut autocomplete: Autocomplete) {
        let mut api = FakeApi::default();
        api.search_results.insert("ink".to_owned(), vec!["ink.safetensors".to_owned()]);
        let start = Instant::now();

        autocomplete.on_input("ink", 3, start);
        let request = autocomplete.poll(ms(start, 200)).expect("request");
        let items = fetch_results(&api, &request).await;
        assert!(autocomplete.on_results(request.token, items, ms(start, 210)));
        assert_eq!(autocomplete.items(), ["ink.safetensors"]);

        autocomplete.on_input("nope", 4, ms(start, 300));
        let request = autocomplete.poll(ms(start, 500)).expect("request");
        let items = fetch_results(&api, &request).await;
        assert!(items.is_empty());
        assert!(autocomplete.on_results(request.token, items, ms(start, 510)));
        assert_eq!(autocomplete.state(), &AutocompleteState::Idle);
    }

    #[rstest]
    #[tokio::test]
    async fn typing_during_a_search_drops_its_results(mut autocomplete: Autocomplete) {
        let mut api = FakeApi::default();
        api.search_results.insert("in".to_owned(), vec!["inpaint.safetensors".to_owned()]);
        let start = Instant::now();

        autocomplete.on_input("in", 2, start);
        let first = autocomplete.poll(ms(start, 200)).expect("request");
        let in_flight = fetch_results(&api, &first);

        autocomplete.on_input("ink", 3, ms(start, 250));
        let second = autocomplete.poll(ms(start, 450)).expect("request");
        assert!(second.token > first.token);

        let stale = in_flight.await;
        assert_eq!(stale, ["inpaint.safetensors"]);
        assert!(!autocomplete.on_results(first.token, stale, ms(start, 460)));
        assert!(matches!(autocomplete.state(), AutocompleteState::Searching { .. }));
    }
}
