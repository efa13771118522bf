// SPDX-License-Identifier: MIT OR Apache-2.0
//! Label anchors for connections, refreshed every time a noodle is drawn.

use crate::port::PortId;
use egui::Pos2;
use indexmap::IndexMap;

/// Graph-space label anchor per (output port, input port) pair
#[derive(Debug, Clone, Default)]
pub struct LabelAnchorCache {
    anchors: IndexMap<PortId, IndexMap<PortId, Pos2>>,
}

impl LabelAnchorCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the anchor for a connection
    pub fn set(&mut self, output: PortId, input: PortId, point: Pos2) {
        self.anchors.entry(output).or_default().insert(input, point);
    }

    /// Anchor for a connection, if one has been drawn
    pub fn get(&self, output: PortId, input: PortId) -> Option<Pos2> {
        self.anchors.get(&output)?.get(&input).copied()
    }

    /// Forget every anchor involving `port`, on either end
    pub fn remove_port(&mut self, port: PortId) {
        self.anchors.swap_remove(&port);
        for inputs in self.anchors.values_mut() {
            inputs.swap_remove(&port);
        }
        self.anchors.retain(|_, inputs| !inputs.is_empty());
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Number of stored anchors
    pub fn len(&self) -> usize {
        self.anchors.values().map(IndexMap::len).sum()
    }

    /// Whether no anchor is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
