// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Trigger-word messages: splitting into toggle tags, carrying state across updates, and
//! re-encoding the active tags for the prompt.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::OnceLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::model::strength::format_strength;
use crate::model::TriggerTag;

fn comma_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",{2,}").expect("valid comma run regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupOptions {
    /// Split on runs of two or more commas instead of on every comma.
    pub group_mode: bool,
    /// State for tags that did not exist before.
    pub default_active: bool,
    /// Carry per-tag strengths across updates.
    pub allow_strength_adjustment: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self { group_mode: false, default_active: true, allow_strength_adjustment: false }
    }
}

/// Splits `message` into tag texts according to the grouping mode.
pub fn split_trigger_words(message: &str, group_mode: bool) -> Vec<String> {
    if message.trim().is_empty() {
        return Vec::new();
    }

    if group_mode {
        let re = comma_run_regex();
        if re.is_match(message) {
            return re
                .split(message)
                .map(str::trim)
                .filter(|group| !group.is_empty())
                .map(str::to_owned)
                .collect();
        }
        return vec![message.trim().to_owned()];
    }

    message.split(',').map(str::trim).filter(|word| !word.is_empty()).map(str::to_owned).collect()
}

/// Builds fresh tags for `message`, reusing state from `existing` where the text matches.
///
/// Existing tags are consumed first-to-first, so repeated texts pair up positionally.
pub fn group_trigger_words(
    message: &str,
    options: GroupOptions,
    existing: &[TriggerTag],
) -> Vec<TriggerTag> {
    let mut previous: HashMap<&str, VecDeque<&TriggerTag>> = HashMap::new();
    for tag in existing {
        previous.entry(tag.text.as_str()).or_default().push_back(tag);
    }

    split_trigger_words(message, options.group_mode)
        .into_iter()
        .map(|text| {
            let matched = previous.get_mut(text.as_str()).and_then(VecDeque::pop_front);
            match matched {
                Some(prior) => {
                    let strength =
                        if options.allow_strength_adjustment { prior.strength } else { None };
                    TriggerTag::new(text, prior.active).with_strength(strength)
                }
                None => TriggerTag::new(text, options.default_active),
            }
        })
        .collect()
}

/// Prompt text for one tag: `(text:0.80)` when it carries a strength, plain text otherwise.
pub fn encode_tag(tag: &TriggerTag) -> String {
    match tag.strength {
        Some(strength) => format!("({}:{})", tag.text, format_strength(strength)),
        None => tag.text.clone(),
    }
}

/// Encoded active tags joined by `", "`.
pub fn join_active_tags(tags: &[TriggerTag]) -> String {
    tags.iter().filter(|tag| tag.active).map(encode_tag).collect::<Vec<_>>().join(", ")
}

pub fn normalize_trigger_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Normalized set used for highlight matching.
pub fn trigger_word_set<'a>(words: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    words
        .into_iter()
        .map(normalize_trigger_word)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Whether a tag's text, or any comma-separated piece of it, is in `active_words`.
pub fn tag_matches(text: &str, active_words: &HashSet<String>) -> bool {
    if active_words.contains(&normalize_trigger_word(text)) {
        return true;
    }
    let pieces: SmallVec<[String; 4]> = text
        .split(',')
        .map(normalize_trigger_word)
        .filter(|piece| !piece.is_empty())
        .collect();
    pieces.iter().any(|piece| active_words.contains(piece))
}

/// Sets `highlighted` on every tag; returns how many are highlighted.
pub fn apply_highlights(tags: &mut [TriggerTag], active_words: &HashSet<String>) -> usize {
    let mut count = 0;
    for tag in tags.iter_mut() {
        tag.highlighted = tag_matches(&tag.text, active_words);
        count += usize::from(tag.highlighted);
    }
    count
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        apply_highlights, encode_tag, group_trigger_words, join_active_tags, split_trigger_words,
        trigger_word_set, GroupOptions,
    };
    use crate::model::TriggerTag;

    fn texts(tags: &[TriggerTag]) -> Vec<&str> {
        tags.iter().map(|tag| tag.text.as_str()).collect()
    }

    #[rstest]
    #[case("tag1, tag2,tag3", false, &["tag1", "tag2", "tag3"])]
    #[case("a,b,,c,d", true, &["a,b", "c,d"])]
    #[case("a,,,b", true, &["a", "b"])]
    #[case(" a, b ", true, &["a, b"])]
    #[case("a,b,,c,d", false, &["a", "b", "c", "d"])]
    #[case(",, a ,,", true, &["a"])]
    #[case("", false, &[])]
    #[case("   ", true, &[])]
    fn split_cases(#[case] message: &str, #[case] group_mode: bool, #[case] expected: &[&str]) {
        assert_eq!(split_trigger_words(message, group_mode), expected);
    }

    #[test]
    fn new_tags_use_default_active() {
        let options = GroupOptions { default_active: false, ..GroupOptions::default() };
        let tags = group_trigger_words("tag1, tag2,tag3", options, &[]);
        assert_eq!(texts(&tags), ["tag1", "tag2", "tag3"]);
        assert!(tags.iter().all(|tag| !tag.active && tag.strength.is_none()));
    }

    #[test]
    fn regrouping_preserves_inactive_group() {
        let options = GroupOptions { group_mode: true, ..GroupOptions::default() };
        let existing = [TriggerTag::new("a,b", false)];
        let tags = group_trigger_words("a,b,,c,d", options, &existing);
        assert_eq!(texts(&tags), ["a,b", "c,d"]);
        assert!(!tags[0].active);
        assert!(tags[1].active);
    }

    #[test]
    fn duplicate_texts_pair_positionally() {
        let existing = [TriggerTag::new("x", false), TriggerTag::new("x", true)];
        let tags = group_trigger_words("x, x, x", GroupOptions::default(), &existing);
        assert_eq!(tags.iter().map(|tag| tag.active).collect::<Vec<_>>(), [false, true, true]);
    }

    #[test]
    fn strength_survives_only_when_adjustment_allowed() {
        let existing = [TriggerTag::new("x", true).with_strength(Some(1.2))];

        let kept = group_trigger_words(
            "x",
            GroupOptions { allow_strength_adjustment: true, ..GroupOptions::default() },
            &existing,
        );
        assert_eq!(kept[0].strength, Some(1.2));

        let dropped = group_trigger_words("x", GroupOptions::default(), &existing);
        assert_eq!(dropped[0].strength, None);
    }

    #[test]
    fn encoding_wraps_weighted_tags() {
        assert_eq!(encode_tag(&TriggerTag::new("blue hair", true)), "blue hair");
        assert_eq!(
            encode_tag(&TriggerTag::new("blue hair", true).with_strength(Some(1.25))),
            "(blue hair:1.25)"
        );

        let tags = [
            TriggerTag::new("a", true),
            TriggerTag::new("b", false),
            TriggerTag::new("c", true).with_strength(Some(0.5)),
        ];
        assert_eq!(join_active_tags(&tags), "a, (c:0.50)");
    }

    #[test]
    fn highlight_matches_whole_text_or_pieces() {
        let active = trigger_word_set(["  Blue Hair ", "smile"]);
        let mut tags = [
            TriggerTag::new("blue hair", true),
            TriggerTag::new("red eyes, Smile", true),
            TriggerTag::new("frown", true),
        ];
        assert_eq!(apply_highlights(&mut tags, &active), 2);
        assert_eq!(tags.iter().map(|tag| tag.highlighted).collect::<Vec<_>>(), [true, true, false]);
    }
}
