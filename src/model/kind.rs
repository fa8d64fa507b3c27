// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Model families the autocomplete and preview endpoints understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Loras,
    Embeddings,
    Checkpoints,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [Self::Loras, Self::Embeddings, Self::Checkpoints];

    /// Path segment used by the `/lm/<kind>/...` endpoints.
    pub fn route(self) -> &'static str {
        match self {
            Self::Loras => "loras",
            Self::Embeddings => "embeddings",
            Self::Checkpoints => "checkpoints",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModelKindError {
    value: String,
}

impl fmt::Display for ParseModelKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model kind: {}", self.value)
    }
}

impl std::error::Error for ParseModelKindError {}

impl FromStr for ModelKind {
    type Err = ParseModelKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.route() == s)
            .ok_or_else(|| ParseModelKindError { value: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::ModelKind;

    #[test]
    fn parses_routes() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.route().parse::<ModelKind>(), Ok(kind));
        }
        assert!("lora".parse::<ModelKind>().is_err());
    }
}
