// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::time::Duration;

use criterion::Criterion;
use lorasync::model::{LoraEntry, LoraList};

fn env_setting<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse().ok()).unwrap_or(default)
}

/// Criterion settings for reconcile/trigger micro-benchmarks.
///
/// Every iteration is a few microseconds, so the defaults favour many samples over long windows.
/// `LORASYNC_BENCH_QUICK=1` shrinks everything for a smoke run.
pub fn criterion_config() -> Criterion {
    let quick = env_setting("LORASYNC_BENCH_QUICK", 0u8) != 0;
    let (samples, warm_up_ms, measure_ms) =
        if quick { (10, 200, 500) } else { (100, 1_000, 3_000) };
    let samples: usize = env_setting("LORASYNC_BENCH_SAMPLES", samples);
    let warm_up_ms: u64 = env_setting("LORASYNC_BENCH_WARMUP_MS", warm_up_ms);
    let measure_ms: u64 = env_setting("LORASYNC_BENCH_MEASURE_MS", measure_ms);

    Criterion::default()
        .sample_size(samples.clamp(10, 500))
        .warm_up_time(Duration::from_millis(warm_up_ms))
        .measurement_time(Duration::from_millis(measure_ms.max(100)))
        .noise_threshold(0.03)
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    LargeLongPrompt,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeLongPrompt => "large_long_prompt",
        }
    }

    fn lora_count(self) -> usize {
        match self {
            Self::Small => 3,
            Self::Medium => 20,
            Self::LargeLongPrompt => 80,
        }
    }

    fn filler_words(self) -> usize {
        match self {
            Self::Small => 8,
            Self::Medium => 60,
            Self::LargeLongPrompt => 600,
        }
    }
}

/// Prompt with `lora_count` tokens spread between filler words.
pub fn prompt(case: Case) -> String {
    let loras = case.lora_count();
    let words = case.filler_words();
    let stride = (words / loras).max(1);
    let mut parts: Vec<String> = Vec::with_capacity(words + loras);
    let mut next_lora = 0;
    for index in 0..words {
        parts.push(format!("word{index}"));
        if index % stride == 0 && next_lora < loras {
            let strength = 0.05 * ((next_lora % 20) as f64);
            parts.push(format!("<lora:lora_{next_lora:03}:{strength:.2}>"));
            next_lora += 1;
        }
    }
    while next_lora < loras {
        parts.push(format!("<lora:lora_{next_lora:03}:1>"));
        next_lora += 1;
    }
    parts.join(", ")
}

/// The list as the widget would hold it after every third entry was removed and one added.
pub fn edited_list(case: Case) -> LoraList {
    let mut entries = (0..case.lora_count())
        .filter(|index| index % 3 != 0)
        .map(|index| LoraEntry::new(format!("lora_{index:03}"), 0.75))
        .collect::<Vec<_>>();
    entries.push(LoraEntry::new("added", 0.5).with_clip(0.25));
    entries.into()
}

/// Trigger-word message; group mode splits on the `,,` every fourth word.
pub fn trigger_message(case: Case) -> String {
    let words = case.filler_words();
    let mut out = String::new();
    for index in 0..words {
        if index > 0 {
            out.push_str(if index % 4 == 0 { ",, " } else { ", " });
        }
        out.push_str(&format!("trigger {index}"));
    }
    out
}

pub fn checksum(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
