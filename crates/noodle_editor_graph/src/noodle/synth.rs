// SPDX-License-Identifier: MIT OR Apache-2.0
//! Segment synthesis: bridges each pair of adjacent waypoints with an
//! axis-aligned sub-path.
//!
//! Strategies are tried in a fixed order and the first one that finds a
//! bridge commits its exit direction on the current waypoint and its entry
//! side on the next one, which constrains the following pair.

use super::direction::NoodleDirection;
use super::path::PathVertex;
use super::prepare::Waypoint;
use egui::Pos2;

/// Geometry of a resolved bridge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BridgeShape {
    /// Straight line between the two waypoints
    Straight,
    /// Single right-angle bend
    Elbow(Pos2),
    /// Two bends splitting the pair at the midpoint of one axis
    Stepped(Pos2, Pos2),
}

/// A bridge between two waypoints together with the directions it commits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bridge {
    /// Direction the noodle leaves the current waypoint along
    pub out_direction: NoodleDirection,
    /// Side of the next waypoint the noodle arrives on
    pub in_direction: NoodleDirection,
    /// Bridge geometry
    pub shape: BridgeShape,
}

impl Bridge {
    fn new(
        out_direction: NoodleDirection,
        in_direction: NoodleDirection,
        shape: BridgeShape,
    ) -> Self {
        Self {
            out_direction,
            in_direction,
            shape,
        }
    }

    /// Append the bridge's vertices to `vertices`.
    ///
    /// Stepped bridges start at their first bend; the current waypoint itself
    /// is not emitted for them.
    pub fn emit(&self, current: &Waypoint, next: &Waypoint, vertices: &mut Vec<PathVertex>) {
        let from = PathVertex::new(current.position, current.origin);
        let to = PathVertex::new(next.position, next.origin);
        match self.shape {
            BridgeShape::Straight => vertices.extend([from, to]),
            BridgeShape::Elbow(bend) => {
                vertices.extend([from, PathVertex::synthesized(bend), to]);
            }
            BridgeShape::Stepped(a, b) => {
                vertices.extend([PathVertex::synthesized(a), PathVertex::synthesized(b), to]);
            }
        }
    }
}

/// A bridge-finding strategy
pub type Strategy = fn(&Waypoint, &Waypoint, f32) -> Option<Bridge>;

/// Strategies in priority order
pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("opposite", opposite),
    ("crossing", crossing),
    ("fallback", fallback),
];

/// Bridge every adjacent pair of `waypoints`, appending to `vertices`.
///
/// Pairs no strategy can bridge are skipped.
pub fn synthesize(waypoints: &mut [Waypoint], epsilon: f32, vertices: &mut Vec<PathVertex>) {
    for i in 1..waypoints.len() {
        let (head, tail) = waypoints.split_at_mut(i);
        let current = &mut head[i - 1];
        let next = &mut tail[0];

        match resolve(current, next, epsilon) {
            Some(bridge) => bridge.emit(current, next, vertices),
            None => tracing::debug!(
                from = ?current.position,
                to = ?next.position,
                "no bridge between waypoints, leaving a gap"
            ),
        }
    }
}

/// Find the bridge for one pair and commit its directions.
pub fn resolve(current: &mut Waypoint, next: &mut Waypoint, epsilon: f32) -> Option<Bridge> {
    let found = {
        let (cur, nxt) = (&*current, &*next);
        STRATEGIES
            .iter()
            .find_map(|&(name, strategy)| strategy(cur, nxt, epsilon).map(|b| (name, b)))
    };
    let (name, bridge) = found?;

    tracing::trace!(strategy = name, shape = ?bridge.shape, "resolved noodle segment");

    current.out_direction = bridge.out_direction;
    next.in_direction = bridge.in_direction;
    Some(bridge)
}

/// Tolerant float equality: relative to the operands' magnitude, never
/// tighter than `epsilon`.
pub fn approximately(a: f32, b: f32, epsilon: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(epsilon)
}

/// Waypoints on a shared axis with facing free directions.
pub fn opposite(current: &Waypoint, next: &Waypoint, epsilon: f32) -> Option<Bridge> {
    use super::direction::NoodleDirection as D;

    let out = current.valid_out_directions();
    let inn = next.valid_out_directions();
    let (p, q) = (current.position, next.position);
    let same_y = approximately(p.y, q.y, epsilon);
    let same_x = approximately(p.x, q.x, epsilon);

    let found = if out.contains(D::LEFT) && inn.contains(D::RIGHT) && p.x >= q.x && same_y {
        Some((D::LEFT, D::RIGHT))
    } else if out.contains(D::RIGHT) && inn.contains(D::LEFT) && p.x <= q.x && same_y {
        Some((D::RIGHT, D::LEFT))
    } else if out.contains(D::UP) && inn.contains(D::DOWN) && p.y >= q.y && same_x {
        Some((D::UP, D::DOWN))
    } else if out.contains(D::DOWN) && inn.contains(D::UP) && p.y <= q.y && same_x {
        Some((D::DOWN, D::UP))
    } else {
        None
    };

    found.map(|(o, i)| Bridge::new(o, i, BridgeShape::Straight))
}

/// Single right-angle bend, preferring to keep the heading the noodle
/// arrived with.
pub fn crossing(current: &Waypoint, next: &Waypoint, _epsilon: f32) -> Option<Bridge> {
    let heading = current.in_direction.opposite();
    let accepted = next.valid_out_directions();

    intersect(heading, accepted, current.position, next.position).or_else(|| {
        let others = current.valid_out_directions().difference(heading);
        intersect(others, accepted, current.position, next.position)
    })
}

fn intersect(
    directions: NoodleDirection,
    accepted: NoodleDirection,
    p: Pos2,
    q: Pos2,
) -> Option<Bridge> {
    use super::direction::NoodleDirection as D;

    if directions.is_empty() {
        return None;
    }

    let horizontal_bend = Pos2::new(q.x, p.y);
    let vertical_bend = Pos2::new(p.x, q.y);

    let candidates = [
        (D::LEFT, p.x >= q.x, D::UP, p.y <= q.y, horizontal_bend),
        (D::LEFT, p.x >= q.x, D::DOWN, p.y >= q.y, horizontal_bend),
        (D::RIGHT, p.x <= q.x, D::UP, p.y <= q.y, horizontal_bend),
        (D::RIGHT, p.x <= q.x, D::DOWN, p.y >= q.y, horizontal_bend),
        (D::UP, p.y >= q.y, D::LEFT, p.x <= q.x, vertical_bend),
        (D::UP, p.y >= q.y, D::RIGHT, p.x >= q.x, vertical_bend),
        (D::DOWN, p.y <= q.y, D::LEFT, p.x <= q.x, vertical_bend),
        (D::DOWN, p.y <= q.y, D::RIGHT, p.x >= q.x, vertical_bend),
    ];

    candidates
        .into_iter()
        .find(|&(out, out_ok, inn, in_ok, _)| {
            directions.contains(out) && out_ok && accepted.contains(inn) && in_ok
        })
        .map(|(out, _, inn, _, bend)| Bridge::new(out, inn, BridgeShape::Elbow(bend)))
}

/// Last resort: pick any sensible exit and entry and step between them.
pub fn fallback(current: &Waypoint, next: &Waypoint, _epsilon: f32) -> Option<Bridge> {
    let (out, inn) = best_directions(current, next)?;
    Some(Bridge::new(out, inn, stepped(current.position, next.position)))
}

fn best_directions(
    current: &Waypoint,
    next: &Waypoint,
) -> Option<(NoodleDirection, NoodleDirection)> {
    use super::direction::NoodleDirection as D;

    let out = current.valid_out_directions();
    let accepted = next.valid_out_directions();
    let (p, q) = (current.position, next.position);

    // Exit direction, whether it suits the geometry, entry sides in preference order
    let exits = [
        (D::LEFT, p.x >= q.x, [D::RIGHT, D::UP, D::DOWN, D::LEFT]),
        (D::RIGHT, p.x <= q.x, [D::LEFT, D::UP, D::DOWN, D::RIGHT]),
        (D::UP, p.y <= q.y, [D::DOWN, D::LEFT, D::RIGHT, D::UP]),
        (D::DOWN, p.y >= q.y, [D::UP, D::LEFT, D::RIGHT, D::DOWN]),
    ];

    exits
        .into_iter()
        .filter(|&(exit, sensible, _)| out.contains(exit) && sensible)
        .find_map(|(exit, _, entries)| {
            entries
                .into_iter()
                .find(|&entry| accepted.contains(entry))
                .map(|entry| (exit, entry))
        })
}

/// Two-bend bridge split at the midpoint of one axis.
///
/// The axis is picked by comparing the signed deltas, so a pair far apart
/// vertically but with a negative `dy` still splits on x.
fn stepped(p: Pos2, q: Pos2) -> BridgeShape {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    if dx > dy {
        let mid_x = (p.x + q.x) * 0.5;
        BridgeShape::Stepped(Pos2::new(mid_x, p.y), Pos2::new(mid_x, q.y))
    } else {
        let mid_y = (p.y + q.y) * 0.5;
        BridgeShape::Stepped(Pos2::new(p.x, mid_y), Pos2::new(q.x, mid_y))
    }
}
