// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph.

use crate::port::{Port, PortDirection, PortId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node width in graph units
pub const NODE_WIDTH: f32 = 180.0;
/// Height of the node title bar
pub const NODE_HEADER_HEIGHT: f32 = 24.0;
/// Vertical space taken by each port row
pub const PORT_HEIGHT: f32 = 22.0;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Top-left corner in graph space
    pub position: [f32; 2],
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a node with no ports at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            position: [0.0, 0.0],
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Add a port, routed to inputs or outputs by its direction
    pub fn with_port(mut self, port: Port) -> Self {
        match port.direction {
            PortDirection::Input => self.inputs.push(port),
            PortDirection::Output => self.outputs.push(port),
        }
        self
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Top edge in graph space
    pub fn top(&self) -> f32 {
        self.position[1]
    }

    /// Height of the node including all port rows
    pub fn height(&self) -> f32 {
        let rows = self.inputs.len().max(self.outputs.len()).max(1);
        #[allow(clippy::cast_precision_loss)]
        let rows = rows as f32;
        NODE_HEADER_HEIGHT + rows * PORT_HEIGHT
    }

    /// Graph-space point where connections attach to a port.
    ///
    /// Inputs sit on the left edge, outputs on the right, one row each below the header.
    pub fn port_anchor(&self, port_id: &PortId) -> Option<[f32; 2]> {
        let row_y = |row: usize| {
            #[allow(clippy::cast_precision_loss)]
            let row = row as f32;
            self.position[1] + NODE_HEADER_HEIGHT + row * PORT_HEIGHT + PORT_HEIGHT / 2.0
        };

        if let Some(row) = self.inputs.iter().position(|p| p.id == *port_id) {
            return Some([self.position[0], row_y(row)]);
        }
        self.outputs
            .iter()
            .position(|p| p.id == *port_id)
            .map(|row| [self.position[0] + NODE_WIDTH, row_y(row)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    #[test]
    fn test_ports_are_sorted_by_direction() {
        let node = Node::new("Add")
            .with_port(Port::input("A", PortType::Float))
            .with_port(Port::output("Result", PortType::Float))
            .with_port(Port::input("B", PortType::Float));

        assert_eq!(node.inputs.len(), 2);
        assert_eq!(node.outputs.len(), 1);
        assert_eq!(node.ports().count(), 3);
    }

    #[test]
    fn test_port_anchor_layout() {
        let a = Port::input("A", PortType::Float);
        let b = Port::input("B", PortType::Float);
        let out = Port::output("Out", PortType::Float);
        let (a_id, b_id, out_id) = (a.id, b.id, out.id);
        let node = Node::new("Add")
            .with_position(100.0, 50.0)
            .with_port(a)
            .with_port(b)
            .with_port(out);

        assert_eq!(node.port_anchor(&a_id), Some([100.0, 85.0]));
        assert_eq!(node.port_anchor(&b_id), Some([100.0, 107.0]));
        assert_eq!(node.port_anchor(&out_id), Some([280.0, 85.0]));
        assert_eq!(node.port_anchor(&PortId::new()), None);
        assert_eq!(node.top(), 50.0);
        assert_eq!(node.height(), 68.0);
    }
}
