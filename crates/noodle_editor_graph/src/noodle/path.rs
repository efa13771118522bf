// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolved noodle polylines and their length bookkeeping.

use egui::Pos2;

/// A resolved point of a noodle polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathVertex {
    /// Position in the space the waypoints were given in
    pub position: Pos2,
    /// Index of the caller waypoint this vertex derives from, `None` for synthesized bends
    pub origin: Option<usize>,
    /// Length of the polyline from its start up to this vertex
    pub cumulative_distance: f32,
    /// `cumulative_distance` of the next vertex divided by the total length
    pub normalized_distance: f32,
}

impl PathVertex {
    /// Create a vertex with no distance information yet
    pub fn new(position: Pos2, origin: Option<usize>) -> Self {
        Self {
            position,
            origin,
            cumulative_distance: 0.0,
            normalized_distance: 0.0,
        }
    }

    /// Create a synthesized vertex
    pub fn synthesized(position: Pos2) -> Self {
        Self::new(position, None)
    }
}

/// A noodle polyline with accumulated distances and its label midpoint
#[derive(Debug, Clone, Default)]
pub struct NoodlePath {
    vertices: Vec<PathVertex>,
    total_length: f32,
    midpoint: Option<Pos2>,
}

impl NoodlePath {
    /// Accumulate distances over `vertices`.
    ///
    /// Normalization needs the total length, so it runs as a second pass
    /// after the cumulative distances are known.
    pub fn new(mut vertices: Vec<PathVertex>) -> Self {
        let total_length = accumulate_distances(&mut vertices);
        let midpoint = normalize_distances(&mut vertices, total_length);
        Self {
            vertices,
            total_length,
            midpoint,
        }
    }

    /// Vertices in path order
    pub fn vertices(&self) -> &[PathVertex] {
        &self.vertices
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the path has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Total polyline length
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Point halfway along the path by length, `None` for degenerate paths
    pub fn midpoint(&self) -> Option<Pos2> {
        self.midpoint
    }

    /// Whether there is anything to draw
    pub fn is_drawable(&self) -> bool {
        self.vertices.len() >= 2 && self.total_length > 0.0
    }

    /// Consecutive vertex pairs
    pub fn segments(&self) -> impl Iterator<Item = (&PathVertex, &PathVertex)> {
        self.vertices.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

/// First pass: cumulative Euclidean length at every vertex. Returns the total.
fn accumulate_distances(vertices: &mut [PathVertex]) -> f32 {
    let mut total = 0.0;
    let mut previous: Option<Pos2> = None;
    for vertex in vertices.iter_mut() {
        if let Some(prev) = previous {
            total += prev.distance(vertex.position);
        }
        vertex.cumulative_distance = total;
        previous = Some(vertex.position);
    }
    total
}

/// Second pass: normalized distances and the midpoint by length.
fn normalize_distances(vertices: &mut [PathVertex], total_length: f32) -> Option<Pos2> {
    if vertices.len() < 2 || total_length <= 0.0 {
        return None;
    }

    let half_length = total_length * 0.5;
    let mut midpoint = None;

    for i in 0..vertices.len() - 1 {
        let next = vertices[i + 1];
        let current = &mut vertices[i];

        if midpoint.is_none()
            && current.cumulative_distance <= half_length
            && next.cumulative_distance >= half_length
        {
            let span = next.cumulative_distance - current.cumulative_distance;
            midpoint = Some(if span > 0.0 {
                let t = (half_length - current.cumulative_distance) / span;
                current.position + (next.position - current.position) * t
            } else {
                current.position
            });
        }

        current.normalized_distance = next.cumulative_distance / total_length;
    }

    if let Some(last) = vertices.last_mut() {
        last.normalized_distance = 1.0;
    }

    midpoint
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn path(points: &[(f32, f32)]) -> NoodlePath {
        NoodlePath::new(
            points
                .iter()
                .map(|&(x, y)| PathVertex::synthesized(Pos2::new(x, y)))
                .collect(),
        )
    }

    #[test]
    fn test_cumulative_distance_is_monotonic() {
        let p = path(&[(0.0, 0.0), (30.0, 0.0), (30.0, 40.0), (30.0, 40.0), (0.0, 40.0)]);

        let distances: Vec<f32> = p.vertices().iter().map(|v| v.cumulative_distance).collect();
        assert_eq!(distances, vec![0.0, 30.0, 70.0, 70.0, 100.0]);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(p.total_length(), 100.0);
        assert_eq!(p.vertices().last().map(|v| v.cumulative_distance), Some(p.total_length()));
    }

    #[test]
    fn test_normalized_distance_colors_outgoing_segment() {
        let p = path(&[(0.0, 0.0), (25.0, 0.0), (100.0, 0.0)]);
        let v = p.vertices();

        assert_relative_eq!(v[0].normalized_distance, 0.25);
        // The vertex before the last always lands exactly on 1
        assert_eq!(v[1].normalized_distance, 1.0);
        assert_eq!(v[2].normalized_distance, 1.0);
    }

    #[test]
    fn test_midpoint_interpolates_straddling_segment() {
        // Total 100, half 50 falls 20 units into the vertical segment
        let p = path(&[(0.0, 0.0), (30.0, 0.0), (30.0, 40.0), (0.0, 40.0)]);
        let mid = p.midpoint().expect("non-degenerate path has a midpoint");

        assert_relative_eq!(mid.x, 30.0);
        assert_relative_eq!(mid.y, 20.0);
    }

    #[test]
    fn test_midpoint_on_vertex_boundary() {
        let p = path(&[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
        let mid = p.midpoint().expect("midpoint");

        assert_relative_eq!(mid.x, 50.0);
        assert_relative_eq!(mid.y, 0.0);
    }

    #[test]
    fn test_midpoint_skips_zero_length_segments() {
        let p = path(&[(0.0, 0.0), (0.0, 0.0), (100.0, 0.0)]);
        let mid = p.midpoint().expect("midpoint");

        assert_relative_eq!(mid.x, 50.0);
        assert!(mid.x.is_finite() && mid.y.is_finite());
    }

    #[test]
    fn test_degenerate_path_is_guarded() {
        let p = path(&[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)]);

        assert_eq!(p.total_length(), 0.0);
        assert!(p.midpoint().is_none());
        assert!(!p.is_drawable());
        assert!(p.vertices().iter().all(|v| v.normalized_distance == 0.0));
    }

    #[test]
    fn test_short_paths() {
        assert!(path(&[]).is_empty());

        let single = path(&[(5.0, 5.0)]);
        assert_eq!(single.len(), 1);
        assert!(!single.is_drawable());
        assert!(single.midpoint().is_none());
    }
}
