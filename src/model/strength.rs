// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Strength values: canonical 2-decimal formatting and the clip-inclusion policy.

/// Strength used whenever a value is missing, unparseable, or not finite.
pub const DEFAULT_STRENGTH: f64 = 1.0;

/// Clip and model strengths closer than this are treated as equal.
pub const STRENGTH_EPSILON: f64 = 1e-6;

/// Parses a raw strength (as typed into text or a widget) into a finite number.
///
/// Anything that does not parse to a finite value falls back to [`DEFAULT_STRENGTH`].
pub fn parse_strength(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => DEFAULT_STRENGTH,
    }
}

/// Rounds to 2 decimals, half away from zero.
pub fn round_strength(value: f64) -> f64 {
    if !value.is_finite() {
        return DEFAULT_STRENGTH;
    }
    let scaled = value * 100.0;
    // Magnitudes this large are already integral.
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / 100.0;
    // Avoid emitting "-0.00".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Canonical string form of a numeric strength, e.g. `0.8` -> `"0.80"`.
pub fn format_strength(value: f64) -> String {
    format!("{:.2}", round_strength(value))
}

/// Canonical string form of a raw strength; `"abc"` -> `"1.00"`.
pub fn normalize_strength(raw: &str) -> String {
    format_strength(parse_strength(raw))
}

/// Applies an arrow-key style adjustment and re-rounds the result.
pub fn step_strength(value: f64, delta: f64) -> f64 {
    round_strength(value + delta)
}

pub fn strengths_differ(a: f64, b: f64) -> bool {
    (a - b).abs() > STRENGTH_EPSILON
}

/// Decides whether a serialized token carries the clip segment.
///
/// A clip that diverges from the model strength is always kept. An equal clip is kept only when
/// the entry is expanded or the source text already spelled it out.
pub fn should_include_clip(
    strength: f64,
    clip_strength: Option<f64>,
    expanded: bool,
    had_clip_in_source: bool,
) -> bool {
    match clip_strength {
        None => had_clip_in_source,
        Some(clip) if strengths_differ(clip, strength) => true,
        Some(_) => expanded || had_clip_in_source,
    }
}
