//! Planar Delaunay triangulation over projected points
//!
//! Only the edge set matters to the graph builder, so this module hides the
//! triangulation structure and hands back index pairs into the input slice.

use geo::Point;
use spade::{DelaunayTriangulation, Point2, Triangulation};

/// Values closer to zero than this are snapped to zero before insertion.
/// The triangulation kernel rejects subnormal-range magnitudes, and at meter
/// scale such offsets carry no information anyway.
const MIN_MAGNITUDE: f64 = 1e-30;

/// Edge set extracted from a Delaunay triangulation
#[derive(Debug, Clone, Default)]
pub struct DelaunayEdges {
    /// Index pairs `(a, b)` into the input slice, `a < b`, each pair once
    pub edges: Vec<(usize, usize)>,
    /// Number of finite triangles (0 for collinear input)
    pub triangle_count: usize,
    /// Input indices that share a position with an earlier input point
    pub duplicates: Vec<usize>,
    /// Input indices the triangulation refused to take
    pub rejected: Vec<usize>,
}

/// Triangulate `points` and return the distinct triangle edges
///
/// Degenerate inputs are not errors:
/// - collinear points produce the chain of consecutive edges and no triangle
/// - a repeated position is kept once, owned by its first occurrence
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn delaunay_edges(points: &[Point<f64>]) -> DelaunayEdges {
    let mut result = DelaunayEdges::default();
    if points.len() < 2 {
        return result;
    }

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    // vertex handle index -> first input index at that position
    let mut owners: Vec<usize> = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let position = Point2::new(snap(point.x()), snap(point.y()));
        match triangulation.insert(position) {
            Ok(handle) => {
                if handle.index() < owners.len() {
                    result.duplicates.push(i);
                } else {
                    owners.push(i);
                }
            }
            Err(err) => {
                tracing::warn!(
                    "Skipping point #{} at ({}, {}): {:?}",
                    i,
                    point.x(),
                    point.y(),
                    err
                );
                result.rejected.push(i);
            }
        }
    }

    result.triangle_count = triangulation.num_inner_faces();
    result.edges = triangulation
        .undirected_edges()
        .map(|edge| {
            let [a, b] = edge.vertices();
            let a = owners[a.fix().index()];
            let b = owners[b.fix().index()];
            if a < b { (a, b) } else { (b, a) }
        })
        .collect();

    result
}

#[inline]
fn snap(value: f64) -> f64 {
    if value.abs() < MIN_MAGNITUDE { 0.0 } else { value }
}
