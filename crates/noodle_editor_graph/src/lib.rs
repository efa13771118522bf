// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph with angled connection routing.
//!
//! This crate provides the graph model and the connection ("noodle")
//! renderer of a node editor:
//! - Nodes with typed input/output ports
//! - Validated connections with editable reroute points
//! - Axis-aligned noodle routing, drawing and hit-testing
//! - A pan/zoom graph view built on egui
//!
//! ## Architecture
//!
//! [`Graph`] stores nodes and connections in graph space. [`GraphView`]
//! converts a connection's waypoints to screen space and hands them to a
//! [`NoodleDrawer`], which routes the noodle, paints it segment by segment
//! onto a [`NoodleCanvas`] and records its label anchor. Routing constants
//! live in [`RouterSettings`], loadable from RON.

pub mod node;
pub mod port;
pub mod connection;
pub mod graph;
pub mod gradient;
pub mod label;
pub mod noodle;
pub mod settings;
pub mod ui;

pub use node::{Node, NodeId};
pub use port::{Port, PortId, PortType, PortDirection};
pub use connection::{Connection, ConnectionId};
pub use graph::{ConnectionError, Graph};
pub use gradient::Gradient;
pub use label::LabelAnchorCache;
pub use noodle::{
    AngledNoodleDrawer, NoodleCanvas, NoodleDrawer, NoodleEndpoint, NoodleHit, NoodleStyle,
};
pub use settings::{RouterSettings, SettingsError};
pub use ui::{GraphView, ViewTransform};
