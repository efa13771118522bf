// SPDX-License-Identifier: MIT OR Apache-2.0
//! Angled noodles: axis-aligned polylines routed through reroute points.

use super::hit_test::{find_point_within_distance, NoodleHit};
use super::path::{NoodlePath, PathVertex};
use super::prepare::{prepare, Padding, PreparedRoute};
use super::synth::synthesize;
use super::{NoodleDrawer, NoodleEndpoint, NoodleStyle, NoodleTarget};
use crate::settings::RouterSettings;
use egui::{Pos2, Stroke};

/// Draws noodles as right-angled polylines
#[derive(Debug, Clone, Default)]
pub struct AngledNoodleDrawer {
    settings: RouterSettings,
}

impl AngledNoodleDrawer {
    /// Create a drawer with custom settings
    pub fn new(settings: RouterSettings) -> Self {
        Self { settings }
    }

    /// Routing settings
    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Route a noodle through `points` without measuring it.
    ///
    /// Shared by drawing and hit-testing so both see the same geometry.
    pub fn route(
        &self,
        output: Option<&NoodleEndpoint>,
        input: Option<&NoodleEndpoint>,
        zoom: f32,
        points: &[Pos2],
    ) -> Vec<PathVertex> {
        let padding = Padding {
            node: self.settings.padding_at(zoom),
            loop_rise: self.settings.loop_rise_at(zoom),
        };

        match prepare(output, input, points, padding) {
            PreparedRoute::Empty => Vec::new(),
            PreparedRoute::Fixed(vertices) => vertices,
            PreparedRoute::Constrained {
                start,
                mut waypoints,
                end,
            } => {
                let mut vertices = Vec::with_capacity(waypoints.len() * 3 + 2);
                vertices.push(start);
                synthesize(&mut waypoints, self.settings.alignment_epsilon, &mut vertices);
                vertices.push(end);
                vertices
            }
        }
    }

    /// Route and measure a noodle
    pub fn path(
        &self,
        output: Option<&NoodleEndpoint>,
        input: Option<&NoodleEndpoint>,
        zoom: f32,
        points: &[Pos2],
    ) -> NoodlePath {
        NoodlePath::new(self.route(output, input, zoom, points))
    }
}

impl NoodleDrawer for AngledNoodleDrawer {
    fn name(&self) -> &'static str {
        "Angled"
    }

    fn draw_noodle(
        &self,
        target: &mut NoodleTarget<'_>,
        output: Option<&NoodleEndpoint>,
        input: Option<&NoodleEndpoint>,
        style: &NoodleStyle,
        points: &[Pos2],
    ) {
        if points.len() < 2 {
            return;
        }

        let path = self.path(output, input, target.view.zoom, points);
        if !path.is_drawable() {
            tracing::trace!(points = points.len(), "skipping degenerate noodle");
            return;
        }

        for (from, to) in path.segments() {
            let color = style.gradient.evaluate(from.normalized_distance);
            let segment = [
                target.view.graph_to_screen(from.position),
                target.view.graph_to_screen(to.position),
            ];
            target.canvas.line_segment(segment, Stroke::new(style.thickness, color));
        }

        if let (Some(output), Some(input), Some(center)) = (output, input, path.midpoint()) {
            target.labels.set(output.port, input.port, center);
        }
    }

    fn try_find_point_within_distance(
        &self,
        output: Option<&NoodleEndpoint>,
        input: Option<&NoodleEndpoint>,
        query: Pos2,
        zoom: f32,
        points: &[Pos2],
    ) -> Option<NoodleHit> {
        let vertices = self.route(output, input, zoom, points);
        find_point_within_distance(&vertices, query, self.settings.hit_distance_at(zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::Gradient;
    use crate::label::LabelAnchorCache;
    use crate::node::NodeId;
    use crate::noodle::{NoodleCanvas, NoodleDirection};
    use crate::noodle::prepare::Waypoint;
    use crate::noodle::synth::resolve;
    use crate::port::PortId;
    use crate::ui::ViewTransform;
    use approx::assert_relative_eq;
    use egui::{Color32, Rect, Vec2};

    #[derive(Default)]
    struct RecordingCanvas {
        segments: Vec<([Pos2; 2], Stroke)>,
    }

    impl NoodleCanvas for RecordingCanvas {
        fn line_segment(&mut self, points: [Pos2; 2], stroke: Stroke) {
            self.segments.push((points, stroke));
        }
    }

    fn endpoint(node: NodeId) -> NoodleEndpoint {
        NoodleEndpoint {
            port: PortId::new(),
            node,
            node_top: 0.0,
        }
    }

    fn pts(points: &[(f32, f32)]) -> Vec<Pos2> {
        points.iter().map(|&(x, y)| Pos2::new(x, y)).collect()
    }

    fn identity_view() -> ViewTransform {
        // Centered on the origin so graph and screen space coincide
        ViewTransform::new(Rect::from_center_size(Pos2::ZERO, Vec2::splat(800.0)))
    }

    #[test]
    fn test_straight_pair_collapses_to_a_line() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));

        let path = drawer.path(Some(&a), Some(&b), 1.0, &pts(&[(0.0, 0.0), (200.0, 0.0)]));
        let positions: Vec<Pos2> = path.vertices().iter().map(|v| v.position).collect();

        assert_eq!(positions, pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 0.0), (200.0, 0.0)]));
        assert_eq!(path.total_length(), 200.0);
        assert_eq!(path.midpoint(), Some(Pos2::new(100.0, 0.0)));
    }

    #[test]
    fn test_s_shape_middle_points_share_x() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));

        for zoom in [0.5, 1.0, 2.0] {
            let start = Pos2::new(10.0, 40.0);
            let end = Pos2::new(10.0 + 2.0 * 25.0 / zoom, 140.0);
            let vertices = drawer.route(Some(&a), Some(&b), zoom, &[start, end]);

            assert_eq!(vertices.len(), 4);
            assert_eq!(vertices[1].position.x, vertices[2].position.x);
            assert_relative_eq!(vertices[1].position.x, (start.x + end.x) / 2.0);
        }
    }

    #[test]
    fn test_loop_back_always_six_points() {
        let drawer = AngledNoodleDrawer::default();
        let node = NodeId::new();
        let (a, b) = (endpoint(node), endpoint(node));

        for end in [(-100.0, 20.0), (0.0, 0.0), (400.0, -80.0)] {
            let vertices = drawer.route(Some(&a), Some(&b), 1.0, &pts(&[(150.0, 30.0), end]));
            assert_eq!(vertices.len(), 6);
        }
    }

    #[test]
    fn test_three_waypoints_propagate_constraints() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));
        let points = pts(&[(0.0, 0.0), (50.0, 100.0), (200.0, 0.0)]);

        // First pair: (25, 0) heading right, so the bend enters the middle waypoint from above
        let mut first = Waypoint::new(Pos2::new(25.0, 0.0), 0).entered_from(NoodleDirection::LEFT);
        let mut middle = Waypoint::new(points[1], 1);
        let bridge = resolve(&mut first, &mut middle, 1e-5).expect("first bridge");
        assert_eq!(bridge.out_direction, NoodleDirection::RIGHT);
        assert_eq!(middle.in_direction, NoodleDirection::UP);
        assert!(!middle.valid_out_directions().contains(NoodleDirection::UP));

        // Second pair cannot leave upwards again; it bends right then up into the padded end
        let mut last =
            Waypoint::new(Pos2::new(175.0, 0.0), 2).leaving_towards(NoodleDirection::RIGHT);
        let bridge = resolve(&mut middle, &mut last, 1e-5).expect("second bridge");
        assert_eq!(bridge.out_direction, NoodleDirection::RIGHT);
        assert_eq!(last.in_direction, NoodleDirection::DOWN);

        let positions: Vec<Pos2> = drawer
            .route(Some(&a), Some(&b), 1.0, &points)
            .iter()
            .map(|v| v.position)
            .collect();
        assert_eq!(
            positions,
            pts(&[
                (0.0, 0.0),
                (25.0, 0.0),
                (50.0, 0.0),
                (50.0, 100.0),
                (50.0, 100.0),
                (175.0, 100.0),
                (175.0, 0.0),
                (200.0, 0.0),
            ])
        );
    }

    #[test]
    fn test_draw_colors_segments_and_stores_label() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));
        let view = identity_view();
        let mut canvas = RecordingCanvas::default();
        let mut labels = LabelAnchorCache::new();
        let style = NoodleStyle {
            gradient: Gradient::between(Color32::BLACK, Color32::from_rgb(200, 200, 200)),
            thickness: 3.0,
            ..NoodleStyle::default()
        };

        let mut target = NoodleTarget {
            canvas: &mut canvas,
            labels: &mut labels,
            view: &view,
        };
        drawer.draw_noodle(
            &mut target,
            Some(&a),
            Some(&b),
            &style,
            &pts(&[(0.0, 0.0), (100.0, 100.0)]),
        );

        // (0,0) -> (50,0) -> (50,100) -> (100,100), total 200
        assert_eq!(canvas.segments.len(), 3);
        assert_eq!(canvas.segments[0].1.width, 3.0);
        assert_eq!(canvas.segments[0].1.color, Color32::from_rgb(50, 50, 50));
        assert_eq!(canvas.segments[1].1.color, Color32::from_rgb(150, 150, 150));
        assert_eq!(canvas.segments[2].1.color, Color32::from_rgb(200, 200, 200));

        let label = labels.get(a.port, b.port).expect("label anchor");
        assert_relative_eq!(label.x, 50.0);
        assert_relative_eq!(label.y, 50.0);
    }

    #[test]
    fn test_segments_painted_in_screen_space_label_kept_in_graph_space() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));
        let mut view = identity_view();
        view.zoom = 2.0;
        let mut canvas = RecordingCanvas::default();
        let mut labels = LabelAnchorCache::new();

        let mut target = NoodleTarget {
            canvas: &mut canvas,
            labels: &mut labels,
            view: &view,
        };
        drawer.draw_noodle(
            &mut target,
            Some(&a),
            Some(&b),
            &NoodleStyle::default(),
            &pts(&[(0.0, 0.0), (400.0, 0.0)]),
        );

        // Graph route (0,0) -> (200,0) -> (200,0) -> (400,0), doubled on screen
        assert_eq!(canvas.segments.len(), 3);
        assert_eq!(canvas.segments[0].0, [Pos2::new(0.0, 0.0), Pos2::new(400.0, 0.0)]);
        assert_eq!(canvas.segments[2].0[1], Pos2::new(800.0, 0.0));

        let label = labels.get(a.port, b.port).expect("label anchor");
        assert_relative_eq!(label.x, 200.0);
        assert_relative_eq!(label.y, 0.0);
    }

    #[test]
    fn test_drawer_name() {
        assert_eq!(AngledNoodleDrawer::default().name(), "Angled");
    }

    #[test]
    fn test_draw_without_input_skips_label() {
        let drawer = AngledNoodleDrawer::default();
        let a = endpoint(NodeId::new());
        let view = identity_view();
        let mut canvas = RecordingCanvas::default();
        let mut labels = LabelAnchorCache::new();

        let mut target = NoodleTarget {
            canvas: &mut canvas,
            labels: &mut labels,
            view: &view,
        };
        drawer.draw_noodle(
            &mut target,
            Some(&a),
            None,
            &NoodleStyle::default(),
            &pts(&[(0.0, 0.0), (60.0, 90.0), (300.0, 10.0)]),
        );

        assert!(!canvas.segments.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_draw_noop_inputs() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));
        let view = identity_view();
        let mut canvas = RecordingCanvas::default();
        let mut labels = LabelAnchorCache::new();

        let mut target = NoodleTarget {
            canvas: &mut canvas,
            labels: &mut labels,
            view: &view,
        };
        drawer.draw_noodle(&mut target, Some(&a), Some(&b), &NoodleStyle::default(), &[]);
        drawer.draw_noodle(
            &mut target,
            Some(&a),
            Some(&b),
            &NoodleStyle::default(),
            &pts(&[(5.0, 5.0)]),
        );

        assert!(canvas.segments.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_hit_threshold_scales_with_zoom() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));
        let points = pts(&[(0.0, 0.0), (400.0, 0.0)]);

        let near = Pos2::new(120.0, 8.0);
        for zoom in [1.0, 0.5] {
            assert!(drawer
                .try_find_point_within_distance(Some(&a), Some(&b), near, zoom, &points)
                .is_some());
        }

        let farther = Pos2::new(120.0, 15.0);
        assert!(drawer
            .try_find_point_within_distance(Some(&a), Some(&b), farther, 0.5, &points)
            .is_some());
        assert!(drawer
            .try_find_point_within_distance(Some(&a), Some(&b), farther, 1.0, &points)
            .is_none());
        assert!(drawer
            .try_find_point_within_distance(Some(&a), Some(&b), farther, 2.0, &points)
            .is_none());
    }

    #[test]
    fn test_hit_reports_reroute_side() {
        let drawer = AngledNoodleDrawer::default();
        let (a, b) = (endpoint(NodeId::new()), endpoint(NodeId::new()));
        let points = pts(&[(0.0, 0.0), (50.0, 100.0), (200.0, 0.0)]);

        // On the run from the middle waypoint towards the end
        let hit = drawer
            .try_find_point_within_distance(
                Some(&a),
                Some(&b),
                Pos2::new(120.0, 103.0),
                1.0,
                &points,
            )
            .expect("hit");
        assert_eq!(hit.waypoint_index, 1);
        assert_relative_eq!(hit.point.y, 100.0);

        // Near the start
        let hit = drawer
            .try_find_point_within_distance(Some(&a), Some(&b), Pos2::new(10.0, 2.0), 1.0, &points)
            .expect("hit");
        assert_eq!(hit.waypoint_index, 0);

        assert!(drawer
            .try_find_point_within_distance(Some(&a), Some(&b), Pos2::ZERO, 1.0, &points[..1])
            .is_none());
    }
}
