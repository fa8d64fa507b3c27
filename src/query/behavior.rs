// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-model-kind autocomplete behavior: what text a selection inserts and whether hovering a
//! result shows a preview.

use std::cell::RefCell;

use tracing::{debug, warn};

use crate::api::{LmApi, PreviewInfo};
use crate::model::ModelKind;
use crate::sync::request::{RequestCounter, RequestToken};

/// Capabilities every model kind provides to the autocomplete dropdown.
#[allow(async_fn_in_trait)]
pub trait ModelBehavior {
    fn kind(&self) -> ModelKind;

    fn init(&mut self) {}

    fn destroy(&mut self) {
        self.hide_preview();
    }

    /// Text inserted for a selected path. Never fails: falls back to a local default.
    async fn insert_text<A: LmApi>(&self, api: &A, relative_path: &str) -> String {
        match api.insert_text(self.kind(), relative_path).await {
            Ok(text) => text,
            Err(err) => {
                warn!(kind = %self.kind(), relative_path, %err, "insert text lookup failed");
                self.fallback_insert_text(relative_path)
            }
        }
    }

    fn fallback_insert_text(&self, relative_path: &str) -> String {
        format!("{}, ", relative_path.trim())
    }

    /// Fetches and shows the preview for `name`.
    ///
    /// Calls may overlap: a call that is overtaken by a newer one, or by
    /// [`hide_preview`](Self::hide_preview), returns `None` and leaves the visible preview alone.
    async fn show_preview<A: LmApi>(&self, api: &A, name: &str) -> Option<PreviewInfo>;

    fn hide_preview(&self);
}

/// Latest-wins preview state shared by the behaviors that show previews.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    requests: RequestCounter,
    visible: RefCell<Option<PreviewInfo>>,
}

impl PreviewSlot {
    pub fn begin(&self) -> RequestToken {
        self.requests.next()
    }

    /// Stores the result if `token` is still the latest request.
    pub fn finish(&self, token: RequestToken, result: Option<PreviewInfo>) -> Option<PreviewInfo> {
        if !self.requests.is_current(token) {
            debug!(token = token.get(), "dropping superseded preview response");
            return None;
        }
        *self.visible.borrow_mut() = result.clone();
        result
    }

    pub fn hide(&self) {
        self.requests.invalidate();
        *self.visible.borrow_mut() = None;
    }

    pub fn visible(&self) -> Option<PreviewInfo> {
        self.visible.borrow().clone()
    }
}

/// Fetches preview metadata; failures are logged and read as "no preview".
pub async fn fetch_preview<A: LmApi>(
    api: &A,
    kind: ModelKind,
    name: &str,
) -> Option<PreviewInfo> {
    match api.preview(kind, name).await {
        Ok(info) => Some(info),
        Err(err) => {
            warn!(%kind, name, %err, "preview lookup failed");
            None
        }
    }
}

async fn show_in_slot<A: LmApi>(
    slot: &PreviewSlot,
    api: &A,
    kind: ModelKind,
    name: &str,
) -> Option<PreviewInfo> {
    let token = slot.begin();
    let result = fetch_preview(api, kind, name).await;
    slot.finish(token, result)
}

#[derive(Debug, Default)]
pub struct LoraBehavior {
    preview: PreviewSlot,
}

impl ModelBehavior for LoraBehavior {
    fn kind(&self) -> ModelKind {
        ModelKind::Loras
    }

    async fn show_preview<A: LmApi>(&self, api: &A, name: &str) -> Option<PreviewInfo> {
        show_in_slot(&self.preview, api, ModelKind::Loras, name).await
    }

    fn hide_preview(&self) {
        self.preview.hide();
    }
}

#[derive(Debug, Default)]
pub struct EmbeddingBehavior {
    preview: PreviewSlot,
}

impl ModelBehavior for EmbeddingBehavior {
    fn kind(&self) -> ModelKind {
        ModelKind::Embeddings
    }

    /// Embeddings are referenced by file stem with the `embedding:` prefix.
    fn fallback_insert_text(&self, relative_path: &str) -> String {
        let path = relative_path.trim();
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
        format!("embedding:{stem}, ")
    }

    async fn show_preview<A: LmApi>(&self, api: &A, name: &str) -> Option<PreviewInfo> {
        show_in_slot(&self.preview, api, ModelKind::Embeddings, name).await
    }

    fn hide_preview(&self) {
        self.preview.hide();
    }
}

/// Checkpoints are inserted as names only; they have no preview tooltip.
#[derive(Debug, Default)]
pub struct CheckpointBehavior;

impl ModelBehavior for CheckpointBehavior {
    fn kind(&self) -> ModelKind {
        ModelKind::Checkpoints
    }

    async fn show_preview<A: LmApi>(&self, _api: &A, _name: &str) -> Option<PreviewInfo> {
        None
    }

    fn hide_preview(&self) {}
}

/// Behavior selected by [`ModelKind`].
#[derive(Debug)]
pub enum Behavior {
    Loras(LoraBehavior),
    Embeddings(EmbeddingBehavior),
    Checkpoints(CheckpointBehavior),
}

impl Behavior {
    pub fn for_kind(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Loras => Self::Loras(LoraBehavior::default()),
            ModelKind::Embeddings => Self::Embeddings(EmbeddingBehavior::default()),
            ModelKind::Checkpoints => Self::Checkpoints(CheckpointBehavior),
        }
    }
}

impl ModelBehavior for Behavior {
    fn kind(&self) -> ModelKind {
        match self {
            Self::Loras(inner) => inner.kind(),
            Self::Embeddings(inner) => inner.kind(),
            Self::Checkpoints(inner) => inner.kind(),
        }
    }

    fn init(&mut self) {
        match self {
            Self::Loras(inner) => inner.init(),
            Self::Embeddings(inner) => inner.init(),
            Self::Checkpoints(inner) => inner.init(),
        }
    }

    fn destroy(&mut self) {
        match self {
            Self::Loras(inner) => inner.destroy(),
            Self::Embeddings(inner) => inner.destroy(),
            Self::Checkpoints(inner) => inner.destroy(),
        }
    }

    fn fallback_insert_text(&self, relative_path: &str) -> String {
        match self {
            Self::Loras(inner) => inner.fallback_insert_text(relative_path),
            Self::Embeddings(inner) => inner.fallback_insert_text(relative_path),
            Self::Checkpoints(inner) => inner.fallback_insert_text(relative_path),
        }
    }

    async fn show_preview<A: LmApi>(&self, api: &A, name: &str) -> Option<PreviewInfo> {
        match self {
            Self::Loras(inner) => inner.show_preview(api, name).await,
            Self::Embeddings(inner) => inner.show_preview(api, name).await,
            Self::Checkpoints(inner) => inner.show_preview(api, name).await,
        }
    }

    fn hide_preview(&self) {
        match self {
            Self::Loras(inner) => inner.hide_preview(),
            Self::Embeddings(inner) => inner.hide_preview(),
            Self::Checkpoints(inner) => inner.hide_preview(),
        }
    }
}
