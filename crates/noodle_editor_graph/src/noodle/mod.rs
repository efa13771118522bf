// SPDX-License-Identifier: MIT OR Apache-2.0
//! Noodle (connection line) drawing.
//!
//! A [`NoodleDrawer`] turns the ordered waypoints of a connection into line
//! segments on a [`NoodleCanvas`] and answers proximity queries against the
//! same geometry. [`AngledNoodleDrawer`] routes noodles as axis-aligned
//! polylines.

pub mod angled;
pub mod direction;
pub mod path;
pub mod prepare;
pub mod synth;

pub use angled::AngledNoodleDrawer;
pub use direction::NoodleDirection;
pub use hit_test::NoodleHit;
pub use path::{NoodlePath, PathVertex};

use crate::gradient::Gradient;
use crate::label::LabelAnchorCache;
use crate::node::NodeId;
use crate::port::PortId;
use crate::ui::ViewTransform;
use egui::{Pos2, Stroke};
use serde::{Deserialize, Serialize};

/// One end of a noodle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoodleEndpoint {
    /// Port the noodle attaches to
    pub port: PortId,
    /// Node owning the port
    pub node: NodeId,
    /// Top edge of the node, in the same space as the noodle's waypoints
    pub node_top: f32,
}

/// Line style of a noodle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoodleStroke {
    /// Continuous line
    #[default]
    Solid,
    /// Dashed line
    Dashed,
}

/// Visual parameters of a single noodle
#[derive(Debug, Clone, PartialEq)]
pub struct NoodleStyle {
    /// Colour along the noodle, sampled by normalized distance
    pub gradient: Gradient,
    /// Line style
    pub stroke: NoodleStroke,
    /// Line thickness in screen pixels
    pub thickness: f32,
}

impl Default for NoodleStyle {
    fn default() -> Self {
        Self {
            gradient: Gradient::default(),
            stroke: NoodleStroke::Solid,
            thickness: 2.5,
        }
    }
}

/// Receives the line segments of a noodle
pub trait NoodleCanvas {
    /// Draw a straight line segment
    fn line_segment(&mut self, points: [Pos2; 2], stroke: Stroke);
}

impl NoodleCanvas for egui::Painter {
    fn line_segment(&mut self, points: [Pos2; 2], stroke: Stroke) {
        egui::Painter::line_segment(self, points, stroke);
    }
}

/// Everything a drawer writes to while drawing a noodle
pub struct NoodleTarget<'a> {
    /// Canvas receiving the segments
    pub canvas: &'a mut dyn NoodleCanvas,
    /// Label anchors, stored in graph space
    pub labels: &'a mut LabelAnchorCache,
    /// Transform from graph to screen space
    pub view: &'a ViewTransform,
}

/// A connection line style
///
/// Waypoints are given in graph space, in order from the output port to
/// the input port. Routing lengths are divided by zoom there so they keep a
/// constant size on screen; segments are converted with the target's view
/// only when painted. Either endpoint is `None` while a connection is being
/// dragged out and has no port at that end yet.
pub trait NoodleDrawer {
    /// Display name of the style
    fn name(&self) -> &'static str;

    /// Draw the noodle through `points` and record its label anchor.
    fn draw_noodle(
        &self,
        target: &mut NoodleTarget<'_>,
        output: Option<&NoodleEndpoint>,
        input: Option<&NoodleEndpoint>,
        style: &NoodleStyle,
        points: &[Pos2],
    );

    /// Find a point on the noodle near the graph-space `query`, if any.
    fn try_find_point_within_distance(
        &self,
        output: Option<&NoodleEndpoint>,
        input: Option<&NoodleEndpoint>,
        query: Pos2,
        zoom: f32,
        points: &[Pos2],
    ) -> Option<NoodleHit>;
}
