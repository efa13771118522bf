// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.

use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeId};
use crate::noodle::NoodleEndpoint;
use crate::port::{PortDirection, PortId};
use egui::Pos2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.swap_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Connect an output port to an input port.
    ///
    /// Both ports may belong to the same node.
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<ConnectionId, ConnectionError> {
        let source_node = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?;
        let target_node = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?;

        let source_port = source_node.port(&from_port)
            .ok_or(ConnectionError::PortNotFound(from_port))?;
        let target_port = target_node.port(&to_port)
            .ok_or(ConnectionError::PortNotFound(to_port))?;

        if source_port.direction != PortDirection::Output
            || target_port.direction != PortDirection::Input
        {
            return Err(ConnectionError::WrongDirection);
        }

        if !source_port.can_connect(target_port) {
            return Err(ConnectionError::IncompatiblePorts);
        }

        if !target_port.multi_connect && self.connections.values().any(|c| c.to_port == to_port) {
            return Err(ConnectionError::PortAlreadyConnected(to_port));
        }

        let connection = Connection::new(from_node, from_port, to_node, to_port);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.swap_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections from a specific port
    pub fn connections_from(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.from_port == port_id)
    }

    /// Get connections to a specific port
    pub fn connections_to(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.to_port == port_id)
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn connection_mut(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<&mut Connection, ConnectionError> {
        self.connections.get_mut(&connection_id)
            .ok_or(ConnectionError::ConnectionNotFound(connection_id))
    }

    /// Append a reroute point to a connection
    pub fn add_reroute_point(
        &mut self,
        connection_id: ConnectionId,
        point: [f32; 2],
    ) -> Result<usize, ConnectionError> {
        let connection = self.connection_mut(connection_id)?;
        connection.reroute_points.push(point);
        Ok(connection.reroute_points.len() - 1)
    }

    /// Insert a reroute point before `index`
    pub fn insert_reroute_point(
        &mut self,
        connection_id: ConnectionId,
        index: usize,
        point: [f32; 2],
    ) -> Result<(), ConnectionError> {
        let connection = self.connection_mut(connection_id)?;
        if index > connection.reroute_points.len() {
            return Err(ConnectionError::RerouteOutOfRange(index));
        }
        connection.reroute_points.insert(index, point);
        Ok(())
    }

    /// Move an existing reroute point
    pub fn move_reroute_point(
        &mut self,
        connection_id: ConnectionId,
        index: usize,
        point: [f32; 2],
    ) -> Result<(), ConnectionError> {
        let connection = self.connection_mut(connection_id)?;
        let slot = connection.reroute_points.get_mut(index)
            .ok_or(ConnectionError::RerouteOutOfRange(index))?;
        *slot = point;
        Ok(())
    }

    /// Remove a reroute point
    pub fn remove_reroute_point(
        &mut self,
        connection_id: ConnectionId,
        index: usize,
    ) -> Result<[f32; 2], ConnectionError> {
        let connection = self.connection_mut(connection_id)?;
        if index >= connection.reroute_points.len() {
            return Err(ConnectionError::RerouteOutOfRange(index));
        }
        Ok(connection.reroute_points.remove(index))
    }

    /// Graph-space anchor of a port
    pub fn port_anchor(&self, node_id: NodeId, port_id: PortId) -> Option<Pos2> {
        let [x, y] = self.node(node_id)?.port_anchor(&port_id)?;
        Some(Pos2::new(x, y))
    }

    /// Noodle endpoint for a port, in graph space
    pub fn endpoint(&self, node_id: NodeId, port_id: PortId) -> Option<NoodleEndpoint> {
        let node = self.node(node_id)?;
        node.port(&port_id)?;
        Some(NoodleEndpoint {
            port: port_id,
            node: node_id,
            node_top: node.top(),
        })
    }

    /// Graph-space waypoints of a connection: output anchor, reroute points, input anchor
    pub fn waypoints(&self, connection_id: ConnectionId) -> Option<Vec<Pos2>> {
        let connection = self.connection(connection_id)?;
        let start = self.port_anchor(connection.from_node, connection.from_port)?;
        let end = self.port_anchor(connection.to_node, connection.to_port)?;

        let mut points = Vec::with_capacity(connection.reroute_points.len() + 2);
        points.push(start);
        points.extend(connection.reroute_points.iter().map(|&[x, y]| Pos2::new(x, y)));
        points.push(end);
        Some(points)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when editing connections
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Connection not found
    #[error("Connection not found: {0:?}")]
    ConnectionNotFound(ConnectionId),

    /// Connections must run from an output to an input
    #[error("Connections must run from an output port to an input port")]
    WrongDirection,

    /// Incompatible port types
    #[error("Incompatible port types")]
    IncompatiblePorts,

    /// Port is already connected
    #[error("Port already connected: {0:?}")]
    PortAlreadyConnected(PortId),

    /// Reroute index out of range
    #[error("Reroute point index out of range: {0}")]
    RerouteOutOfRange(usize),
}
