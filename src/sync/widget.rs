// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One LoRA loader widget: the prompt text, the structured list, and the plumbing that keeps them
//! in step without feeding back into each other.

use tokio::time::Instant;
use tracing::{debug, warn};

use super::debounce::Debouncer;
use super::guard::SyncGuard;
use crate::config::SyncConfig;
use crate::model::{LoraList, ModeChange, NodeId, NodeMode};
use crate::ops::{apply_list_to_text, apply_op, merge_text, LoraOp};
use crate::query::highlight::GraphNode;

/// Host-side sinks for the two values the widget owns.
pub trait HostBinding {
    fn write_text(&mut self, text: &str);
    fn write_list(&mut self, list: &LoraList);
}

#[derive(Debug)]
pub struct LoraWidget<H> {
    host: H,
    text: String,
    list: LoraList,
    mode: NodeMode,
    guard: SyncGuard,
    pending_write: Debouncer<()>,
}

impl<H: HostBinding> LoraWidget<H> {
    pub fn new(host: H, config: &SyncConfig) -> Self {
        Self {
            host,
            text: String::new(),
            list: LoraList::new(),
            mode: NodeMode::default(),
            guard: SyncGuard::new(),
            pending_write: Debouncer::new(config.debounce),
        }
    }

    /// Shared handle to the re-entrancy flag for host callbacks.
    pub fn guard(&self) -> SyncGuard {
        self.guard.clone()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn list(&self) -> &LoraList {
        &self.list
    }

    pub fn mode(&self) -> NodeMode {
        self.mode
    }

    /// LoRA syntax this node feeds downstream: tokens for active entries, or nothing while the
    /// node is muted or bypassed.
    pub fn output(&self) -> String {
        if !self.mode.is_active() {
            return String::new();
        }
        self.list.active_text()
    }

    /// Snapshot of this widget as a node for highlight traversal.
    pub fn graph_node(&self, inputs: Vec<NodeId>) -> GraphNode {
        GraphNode { mode: self.mode, loras: self.list.clone(), inputs }
    }

    pub fn has_pending_write(&self) -> bool {
        self.pending_write.is_pending()
    }

    /// Restores persisted state without writing anything back to the host.
    pub fn restore(&mut self, text: impl Into<String>, list: LoraList) {
        self.text = text.into();
        self.list = merge_text(&self.text, &list);
        self.pending_write.cancel();
    }

    /// The user edited the prompt text. Returns `false` when the call was an echo of our own write.
    pub fn edit_text(&mut self, text: &str) -> bool {
        let Some(_token) = self.guard.try_enter() else {
            debug!("ignoring text change while widget sync is in progress");
            return false;
        };

        self.text = text.to_owned();
        self.list = merge_text(&self.text, &self.list);
        // The text is newer than any list edit still waiting to be written.
        self.pending_write.cancel();
        self.host.write_list(&self.list);
        true
    }

    /// Applies a list edit and schedules the debounced text write.
    pub fn apply(&mut self, op: &LoraOp, now: Instant) -> bool {
        if self.guard.is_held() {
            debug!(?op, "ignoring list change while widget sync is in progress");
            return false;
        }

        if let Err(err) = apply_op(&mut self.list, op) {
            warn!(%err, "lora list edit ignored");
            return false;
        }

        if let Some(_token) = self.guard.try_enter() {
            self.host.write_list(&self.list);
        }
        self.pending_write.schedule((), now);
        true
    }

    /// Performs the debounced text write if its quiet period has elapsed.
    pub fn poll_write(&mut self, now: Instant) -> Option<&str> {
        self.pending_write.poll(now)?;
        self.write_text_now()
    }

    /// Performs any pending text write immediately.
    pub fn flush(&mut self) -> Option<&str> {
        self.pending_write.flush()?;
        self.write_text_now()
    }

    pub fn cancel_pending_write(&mut self) -> bool {
        self.pending_write.cancel()
    }

    /// Sleeps until the pending write is due and performs it.
    pub async fn run_pending_write(&mut self) -> Option<&str> {
        self.pending_write.wait().await?;
        self.write_text_now()
    }

    /// Explicit mode setter; returns the transition when the mode actually changed.
    pub fn set_mode(&mut self, mode: NodeMode) -> Option<ModeChange> {
        if self.mode == mode {
            return None;
        }
        let change = ModeChange { from: self.mode, to: mode };
        self.mode = mode;
        debug!(from = ?change.from, to = ?change.to, "lora widget mode changed");
        Some(change)
    }

    fn write_text_now(&mut self) -> Option<&str> {
        let Some(_token) = self.guard.try_enter() else {
            warn!("text write skipped: widget sync already in progress");
            return None;
        };

        let next = apply_list_to_text(&self.text, &self.list);
        if next == self.text {
            return None;
        }
        self.text = next;
        self.host.write_text(&self.text);
        Some(&self.text)
    }
}
