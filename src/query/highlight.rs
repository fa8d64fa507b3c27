// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lorasync-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Lorasync and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Highlighting trigger tags whose words belong to LoRAs active upstream in the node graph.

use std::collections::{HashMap, HashSet};

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::LmApi;
use crate::format::trigger_words::{apply_highlights, trigger_word_set};
use crate::model::{LoraList, ModeChange, NodeId, NodeMode, TriggerTag};
use crate::store::TriggerWordLookup;
use crate::sync::request::{RequestCounter, RequestToken};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphNode {
    pub mode: NodeMode,
    /// LoRA entries carried by loader/stacker nodes; empty for everything else.
    pub loras: LoraList,
    /// Upstream nodes feeding this one.
    pub inputs: Vec<NodeId>,
}

/// Snapshot of the nodes relevant to highlighting.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: HashMap<NodeId, GraphNode>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, node: GraphNode) {
        self.nodes.insert(id, node);
    }

    pub fn get(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(&to) else {
            return false;
        };
        if !node.inputs.contains(&from) {
            node.inputs.push(from);
        }
        true
    }

    pub fn set_mode(&mut self, id: NodeId, mode: NodeMode) -> Option<ModeChange> {
        let node = self.nodes.get_mut(&id)?;
        if node.mode == mode {
            return None;
        }
        let change = ModeChange { from: node.mode, to: mode };
        node.mode = mode;
        Some(change)
    }
}

/// Active LoRA names reachable upstream of `start`, nearest first.
///
/// `visited` is required: the graph may contain cycles, and nodes already in it are skipped.
/// Nodes that are not in `Always` mode contribute nothing but are still walked through.
pub fn collect_active_lora_names(
    graph: &NodeGraph,
    start: NodeId,
    visited: &mut HashSet<NodeId>,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = graph.get(id) else {
            warn!(node = %id, "highlight traversal reached unknown node");
            continue;
        };

        if node.mode.is_active() {
            for entry in node.loras.iter().filter(|entry| entry.active) {
                if !names.contains(&entry.name) {
                    names.push(entry.name.clone());
                }
            }
        }

        stack.extend(node.inputs.iter().rev().copied());
    }

    names
}

/// Latest-wins highlight refreshes for one trigger-word toggle node.
#[derive(Debug, Default)]
pub struct TriggerHighlighter {
    requests: RequestCounter,
}

impl TriggerHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestToken {
        self.requests.next()
    }

    /// Applies `words` if `token` is still current; returns the highlighted count.
    pub fn finish(
        &self,
        token: RequestToken,
        tags: &mut [TriggerTag],
        words: &HashSet<String>,
    ) -> Option<usize> {
        if !self.requests.is_current(token) {
            debug!(token = token.get(), "dropping superseded highlight refresh");
            return None;
        }
        Some(apply_highlights(tags, words))
    }

    /// Walks the graph from `node` and resolves the trigger words to highlight.
    ///
    /// Refreshes may overlap; one overtaken by a newer refresh returns `None`. Feed the set to
    /// [`apply_highlights`] on the node's tags.
    pub async fn refresh<A: LmApi>(
        &self,
        graph: &NodeGraph,
        node: NodeId,
        lookup: &TriggerWordLookup,
        api: &A,
        now: Instant,
    ) -> Option<HashSet<String>> {
        let token = self.begin();
        let mut visited = HashSet::new();
        let names = collect_active_lora_names(graph, node, &mut visited);
        let words = lookup.trigger_words_for(api, &names, now).await;
        if !self.requests.is_current(token) {
            debug!(token = token.get(), %node, "dropping superseded highlight refresh");
            return None;
        }
        Some(trigger_word_set(words.iter().map(String::as_str)))
    }
}
