// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Inline LoRA token syntax: `<lora:NAME:STRENGTH>` and `<lora:NAME:STRENGTH:CLIP>`.

use std::ops::Range;
use std::sync::OnceLock;

use regex::{CaptureMatches, Regex};

use crate::model::strength::{format_strength, parse_strength};

fn lora_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<lora:([^:>]+):([^:>]+)(?::([^:>]+))?>").expect("valid lora token regex")
    })
}

/// One token found in free text. Strength fields are kept raw so callers can tell whether a clip
/// segment was written at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoraToken<'t> {
    pub name: &'t str,
    pub raw_strength: &'t str,
    pub raw_clip_strength: Option<&'t str>,
    pub span: Range<usize>,
}

impl LoraToken<'_> {
    pub fn strength(&self) -> f64 {
        parse_strength(self.raw_strength)
    }

    pub fn clip_strength(&self) -> Option<f64> {
        self.raw_clip_strength.map(parse_strength)
    }

    pub fn has_clip(&self) -> bool {
        self.raw_clip_strength.is_some()
    }
}

/// Left-to-right tokens in `text`. Call [`parse_loras`] again to restart.
pub struct LoraTokens<'t> {
    inner: CaptureMatches<'static, 't>,
}

impl<'t> Iterator for LoraTokens<'t> {
    type Item = LoraToken<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.inner.next()?;
        let whole = caps.get(0)?;
        Some(LoraToken {
            name: caps.get(1)?.as_str(),
            raw_strength: caps.get(2)?.as_str(),
            raw_clip_strength: caps.get(3).map(|m| m.as_str()),
            span: whole.range(),
        })
    }
}

pub fn parse_loras(text: &str) -> LoraTokens<'_> {
    LoraTokens { inner: lora_token_regex().captures_iter(text) }
}

/// Formats a token; strengths are emitted in canonical 2-decimal form.
pub fn format_lora(name: &str, strength: f64, clip_strength: Option<f64>) -> String {
    match clip_strength {
        Some(clip) => {
            format!("<lora:{name}:{}:{}>", format_strength(strength), format_strength(clip))
        }
        None => format!("<lora:{name}:{}>", format_strength(strength)),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{format_lora, parse_loras};

    #[test]
    fn parse_finds_tokens_in_order() {
        let text = "a cat, <lora:style:0.8>, sitting <lora:detail:1:0.5> <lora:style:0.3>";
        let tokens = parse_loras(text).collect::<Vec<_>>();
        assert_eq!(
            tokens.iter().map(|t| (t.name, t.strength(), t.clip_strength())).collect::<Vec<_>>(),
            [("style", 0.8, None), ("detail", 1.0, Some(0.5)), ("style", 0.3, None)]
        );
        assert_eq!(&text[tokens[0].span.clone()], "<lora:style:0.8>");
    }

    #[test]
    fn parse_is_restartable() {
        let text = "<lora:a:1> <lora:b:2>";
        assert_eq!(parse_loras(text).count(), 2);
        assert_eq!(parse_loras(text).next().map(|t| t.name), Some("a"));
    }

    #[rstest]
    #[case("<lora:a>")]
    #[case("<lora::1>")]
    #[case("lora:a:1")]
    #[case("<lora:a:1:2:3>")]
    #[case("<LORA:a:1>")]
    fn parse_skips_malformed_tokens(#[case] text: &str) {
        assert_eq!(parse_loras(text).count(), 0, "{text}");
    }

    #[test]
    fn non_numeric_strength_parses_to_default() {
        let token = parse_loras("<lora:a:strong>").next().expect("token");
        assert_eq!(token.raw_strength, "strong");
        assert_eq!(token.strength(), 1.0);
    }

    #[test]
    fn names_may_contain_paths_and_spaces() {
        let token = parse_loras("<lora:sub dir/My Lora v2:0.7>").next().expect("token");
        assert_eq!(token.name, "sub dir/My Lora v2");
    }

    #[test]
    fn format_emits_optional_clip() {
        assert_eq!(format_lora("x", 0.8, None), "<lora:x:0.80>");
        assert_eq!(format_lora("x", 0.8, Some(0.5)), "<lora:x:0.80:0.50>");
    }
}
