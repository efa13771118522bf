// SPDX-License-Identifier: MIT OR Apache-2.0
//! Endpoint preparation: turns the caller's waypoint list into either a
//! finished special-case path or a list of direction-constrained waypoints.

use super::direction::NoodleDirection;
use super::path::PathVertex;
use super::NoodleEndpoint;
use egui::{Pos2, Vec2};

/// A routing vertex before its bridges are resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position in drawing space
    pub position: Pos2,
    /// Index into the caller's waypoint list
    pub origin: Option<usize>,
    /// Direction the noodle leaves this waypoint along
    pub out_direction: NoodleDirection,
    /// Side of this waypoint the noodle arrives on
    pub in_direction: NoodleDirection,
}

impl Waypoint {
    /// Create an unconstrained waypoint
    pub fn new(position: Pos2, origin: usize) -> Self {
        Self {
            position,
            origin: Some(origin),
            out_direction: NoodleDirection::NONE,
            in_direction: NoodleDirection::NONE,
        }
    }

    /// Pre-commit the arrival side
    pub fn entered_from(mut self, direction: NoodleDirection) -> Self {
        self.in_direction = direction;
        self
    }

    /// Pre-commit the departure direction
    pub fn leaving_towards(mut self, direction: NoodleDirection) -> Self {
        self.out_direction = direction;
        self
    }

    /// Directions not yet committed by a neighbouring segment
    pub fn valid_out_directions(&self) -> NoodleDirection {
        NoodleDirection::remaining(self.out_direction, self.in_direction)
    }
}

/// Result of endpoint preparation
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedRoute {
    /// Fewer than two points, nothing to route
    Empty,
    /// A complete hand-built path
    Fixed(Vec<PathVertex>),
    /// Waypoints still to be bridged by the segment synthesizer
    Constrained {
        /// First caller point, drawn before the first waypoint
        start: PathVertex,
        /// Padded and interior waypoints
        waypoints: Vec<Waypoint>,
        /// Last caller point, drawn after the last waypoint
        end: PathVertex,
    },
}

/// Lengths driving endpoint preparation, already scaled by zoom
#[derive(Debug, Clone, Copy)]
pub struct Padding {
    /// Horizontal distance a noodle travels out of a port before turning
    pub node: f32,
    /// Vertical distance between a loop-back's top run and the node's top edge
    pub loop_rise: f32,
}

/// Prepare `points` for routing.
pub fn prepare(
    output: Option<&NoodleEndpoint>,
    input: Option<&NoodleEndpoint>,
    points: &[Pos2],
    padding: Padding,
) -> PreparedRoute {
    match points.len() {
        0 | 1 => PreparedRoute::Empty,
        2 => PreparedRoute::Fixed(direct_path(output, input, points[0], points[1], padding)),
        _ => constrained(output, input, points, padding.node),
    }
}

fn direct_path(
    output: Option<&NoodleEndpoint>,
    input: Option<&NoodleEndpoint>,
    start: Pos2,
    end: Pos2,
    padding: Padding,
) -> Vec<PathVertex> {
    let pad = padding.node;
    let same_node = matches!((output, input), (Some(o), Some(i)) if o.node == i.node);

    let inner: Vec<Pos2> = if same_node {
        // Both ends on one node: loop over its top edge
        let node_top = output.map_or(start.y, |o| o.node_top);
        let top = node_top - padding.loop_rise;
        vec![
            Pos2::new(start.x + pad, start.y),
            Pos2::new(start.x + pad, top),
            Pos2::new(end.x - pad, top),
            Pos2::new(end.x - pad, end.y),
        ]
    } else if start.x <= end.x - pad * 2.0 {
        let mid_x = (start.x + end.x) * 0.5;
        vec![Pos2::new(mid_x, start.y), Pos2::new(mid_x, end.y)]
    } else {
        let mid_y = (start.y + end.y) * 0.5;
        vec![
            Pos2::new(start.x + pad, start.y),
            Pos2::new(start.x + pad, mid_y),
            Pos2::new(end.x - pad, mid_y),
            Pos2::new(end.x - pad, end.y),
        ]
    };

    let mut vertices = Vec::with_capacity(inner.len() + 2);
    vertices.push(PathVertex::new(start, Some(0)));
    vertices.extend(inner.into_iter().map(PathVertex::synthesized));
    vertices.push(PathVertex::new(end, Some(1)));
    vertices
}

fn constrained(
    output: Option<&NoodleEndpoint>,
    input: Option<&NoodleEndpoint>,
    points: &[Pos2],
    pad: f32,
) -> PreparedRoute {
    let last = points.len() - 1;
    let mut waypoints = Vec::with_capacity(points.len());

    waypoints.push(if output.is_some() {
        Waypoint::new(points[0] + Vec2::new(pad, 0.0), 0).entered_from(NoodleDirection::LEFT)
    } else {
        Waypoint::new(points[0], 0)
    });

    waypoints.extend((1..last).map(|i| Waypoint::new(points[i], i)));

    waypoints.push(if input.is_some() {
        Waypoint::new(points[last] - Vec2::new(pad, 0.0), last)
            .leaving_towards(NoodleDirection::RIGHT)
    } else {
        Waypoint::new(points[last], last)
    });

    PreparedRoute::Constrained {
        start: PathVertex::new(points[0], Some(0)),
        waypoints,
        end: PathVertex::new(points[last], Some(last)),
    }
}
