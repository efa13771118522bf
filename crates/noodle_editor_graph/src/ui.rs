// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph view: pan/zoom transform and connection rendering through a
//! [`NoodleDrawer`].
//!
//! Features:
//! - Graph/screen coordinate conversion
//! - Connection rendering with port-colour gradients
//! - Pending (drag-to-create) connections
//! - Connection picking with reroute insertion
//! - Scroll zoom and middle-mouse panning

use crate::connection::ConnectionId;
use crate::gradient::Gradient;
use crate::graph::Graph;
use crate::label::LabelAnchorCache;
use crate::node::{Node, NodeId, NODE_HEADER_HEIGHT, NODE_WIDTH, PORT_HEIGHT};
use crate::noodle::{
    NoodleCanvas, NoodleDrawer, NoodleEndpoint, NoodleHit, NoodleStroke, NoodleStyle, NoodleTarget,
};
use crate::port::PortId;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

const PORT_RADIUS: f32 = 6.0;
const NODE_ROUNDING: f32 = 6.0;
const REROUTE_RADIUS: f32 = 4.0;
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 4.0;

/// Mapping between graph space and screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Current pan offset (graph space)
    pub pan: Vec2,
    /// Current zoom level
    pub zoom: f32,
    /// Screen rectangle the graph is shown in
    pub viewport: Rect,
}

impl ViewTransform {
    /// Unpanned, unzoomed view centred on `viewport`
    pub fn new(viewport: Rect) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            viewport,
        }
    }

    /// Convert screen position to graph position
    pub fn screen_to_graph(&self, screen_pos: Pos2) -> Pos2 {
        let center = self.viewport.center();
        Pos2::new(
            (screen_pos.x - center.x) / self.zoom - self.pan.x,
            (screen_pos.y - center.y) / self.zoom - self.pan.y,
        )
    }

    /// Convert graph position to screen position
    pub fn graph_to_screen(&self, graph_pos: Pos2) -> Pos2 {
        let center = self.viewport.center();
        Pos2::new(
            (graph_pos.x + self.pan.x) * self.zoom + center.x,
            (graph_pos.y + self.pan.y) * self.zoom + center.y,
        )
    }

    /// Pan by a screen-space delta
    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.pan += screen_delta / self.zoom;
    }

    /// Multiply the zoom by `factor`, keeping `anchor` (screen space) fixed
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        let before = self.screen_to_graph(anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.screen_to_graph(anchor);
        self.pan += after - before;
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(Rect::from_min_size(Pos2::ZERO, Vec2::splat(800.0)))
    }
}

/// Per-editor view state for drawing a [`Graph`] with a [`NoodleDrawer`]
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Graph/screen transform
    pub transform: ViewTransform,
    /// Noodle thickness in screen pixels
    pub thickness: f32,
    /// Noodle line style
    pub stroke: NoodleStroke,
    /// Label anchors written while drawing
    labels: LabelAnchorCache,
}

impl GraphView {
    /// Create a view over `viewport`
    pub fn new(viewport: Rect) -> Self {
        Self {
            transform: ViewTransform::new(viewport),
            thickness: NoodleStyle::default().thickness,
            stroke: NoodleStroke::Solid,
            labels: LabelAnchorCache::new(),
        }
    }

    /// Label anchors from the last draw, in graph space
    pub fn labels(&self) -> &LabelAnchorCache {
        &self.labels
    }

    fn style(&self, gradient: Gradient) -> NoodleStyle {
        NoodleStyle {
            gradient,
            stroke: self.stroke,
            thickness: self.thickness,
        }
    }

    /// Graph-space endpoints and waypoints for routing one connection
    fn route_inputs(
        graph: &Graph,
        connection_id: ConnectionId,
    ) -> Option<(NoodleEndpoint, NoodleEndpoint, Vec<Pos2>)> {
        let connection = graph.connection(connection_id)?;
        let output = graph.endpoint(connection.from_node, connection.from_port)?;
        let input = graph.endpoint(connection.to_node, connection.to_port)?;
        Some((output, input, graph.waypoints(connection_id)?))
    }

    fn port_color(graph: &Graph, node: NodeId, port: PortId) -> Color32 {
        graph
            .node(node)
            .and_then(|n| n.port(&port))
            .map_or(Color32::GRAY, |p| p.port_type.color())
    }

    /// Draw every connection of `graph`, refreshing the label anchors
    pub fn draw_connections(
        &mut self,
        canvas: &mut dyn NoodleCanvas,
        graph: &Graph,
        drawer: &dyn NoodleDrawer,
    ) {
        self.labels.clear();

        for connection in graph.connections() {
            let Some((output, input, points)) = Self::route_inputs(graph, connection.id) else {
                tracing::debug!(
                    connection = ?connection.id,
                    "connection references a missing port"
                );
                continue;
            };

            let style = self.style(Gradient::between(
                Self::port_color(graph, connection.from_node, connection.from_port),
                Self::port_color(graph, connection.to_node, connection.to_port),
            ));

            let mut target = NoodleTarget {
                canvas: &mut *canvas,
                labels: &mut self.labels,
                view: &self.transform,
            };
            drawer.draw_noodle(&mut target, Some(&output), Some(&input), &style, &points);
        }
    }

    /// Draw a connection being dragged out of an output port towards `cursor` (screen space)
    pub fn draw_pending_connection(
        &mut self,
        canvas: &mut dyn NoodleCanvas,
        graph: &Graph,
        drawer: &dyn NoodleDrawer,
        from_node: NodeId,
        from_port: PortId,
        cursor: Pos2,
    ) {
        let Some(output) = graph.endpoint(from_node, from_port) else {
            return;
        };
        let Some(anchor) = graph.port_anchor(from_node, from_port) else {
            return;
        };

        let style = self.style(Gradient::solid(Self::port_color(graph, from_node, from_port)));
        let points = [anchor, self.transform.screen_to_graph(cursor)];
        let mut target = NoodleTarget {
            canvas,
            labels: &mut self.labels,
            view: &self.transform,
        };
        drawer.draw_noodle(&mut target, Some(&output), None, &style, &points);
    }

    /// First connection whose noodle passes near `screen_pos`.
    ///
    /// The hit point is in graph space. Its `waypoint_index` is also the
    /// reroute index a new point should be inserted at.
    pub fn connection_at(
        &self,
        graph: &Graph,
        drawer: &dyn NoodleDrawer,
        screen_pos: Pos2,
    ) -> Option<(ConnectionId, NoodleHit)> {
        let query = self.transform.screen_to_graph(screen_pos);
        graph.connections().find_map(|connection| {
            let (output, input, points) = Self::route_inputs(graph, connection.id)?;
            drawer
                .try_find_point_within_distance(
                    Some(&output),
                    Some(&input),
                    query,
                    self.transform.zoom,
                    &points,
                )
                .map(|hit| (connection.id, hit))
        })
    }

    /// Render the graph and handle navigation.
    ///
    /// Double-clicking a noodle inserts a reroute point there.
    pub fn ui(&mut self, ui: &mut egui::Ui, graph: &mut Graph, drawer: &dyn NoodleDrawer) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let mut painter = ui.painter_at(rect);
        self.transform.viewport = rect;

        self.handle_input(ui, &response, graph, drawer);

        // Connections below nodes
        self.draw_connections(&mut painter, graph, drawer);
        self.draw_reroute_points(&painter, graph);
        for node in graph.nodes() {
            self.draw_node(&painter, node);
        }
    }

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        graph: &mut Graph,
        drawer: &dyn NoodleDrawer,
    ) {
        let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };

        let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
        if scroll_delta != 0.0 && self.transform.viewport.contains(mouse_pos) {
            self.transform.zoom_at(mouse_pos, 1.0 + scroll_delta * 0.001);
        }

        if response.dragged_by(egui::PointerButton::Middle) {
            self.transform.pan_by(response.drag_delta());
        }

        if response.double_clicked() {
            if let Some((connection_id, hit)) = self.connection_at(graph, drawer, mouse_pos) {
                let point = [hit.point.x, hit.point.y];
                let index = hit.waypoint_index;
                if let Err(err) = graph.insert_reroute_point(connection_id, index, point) {
                    tracing::warn!("Failed to insert reroute point: {err}");
                }
            }
        }
    }

    fn draw_reroute_points(&self, painter: &egui::Painter, graph: &Graph) {
        let radius = REROUTE_RADIUS * self.transform.zoom;
        for connection in graph.connections() {
            for &[x, y] in &connection.reroute_points {
                let pos = self.transform.graph_to_screen(Pos2::new(x, y));
                painter.circle_filled(pos, radius, Color32::from_gray(220));
            }
        }
    }

    fn draw_node(&self, painter: &egui::Painter, node: &Node) {
        let zoom = self.transform.zoom;
        let min = self.transform.graph_to_screen(Pos2::new(node.position[0], node.position[1]));
        let screen_rect = Rect::from_min_size(min, Vec2::new(NODE_WIDTH, node.height()) * zoom);

        painter.rect_filled(screen_rect, NODE_ROUNDING * zoom, Color32::from_rgb(45, 45, 48));

        let header_size = Vec2::new(screen_rect.width(), NODE_HEADER_HEIGHT * zoom);
        let header = Rect::from_min_size(screen_rect.min, header_size);
        painter.rect_filled(header, NODE_ROUNDING * zoom, Color32::from_rgb(60, 60, 70));
        painter.text(
            header.center(),
            egui::Align2::CENTER_CENTER,
            &node.name,
            egui::FontId::proportional(12.0 * zoom),
            Color32::WHITE,
        );
        let outline = Stroke::new(1.0, Color32::from_gray(80));
        painter.rect_stroke(screen_rect, NODE_ROUNDING * zoom, outline);

        for port in node.ports() {
            let Some([x, y]) = node.port_anchor(&port.id) else {
                continue;
            };
            let pos = self.transform.graph_to_screen(Pos2::new(x, y));
            let radius = PORT_RADIUS.min(PORT_HEIGHT / 2.0) * zoom;
            painter.circle_filled(pos, radius, port.port_type.color());
        }
    }
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(ViewTransform::default().viewport)
    }
}
