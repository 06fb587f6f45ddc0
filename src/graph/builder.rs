//! Proximity graph construction
//!
//! Points are projected to Web Mercator, triangulated there, and every
//! triangle edge becomes a graph edge weighted with the great-circle distance
//! between the *unprojected* endpoints. The projection only decides who is a
//! neighbor: it is not distance preserving, so it never feeds a weight.

use crate::graph::{Point, ProximityGraph, triangulation, utils};
use rayon::prelude::*;
use std::time::Instant;

/// Minimum number of points for a triangulation to exist
pub const MIN_POINTS: usize = 3;

/// Builds [`ProximityGraph`]s from point sets
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    /// Drop edges longer than this many kilometers (`None` keeps all)
    max_distance_km: Option<f64>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl GraphBuilder {
    /// Builder that keeps every triangulation edge
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard edges whose great-circle length exceeds `max_distance_km`
    pub fn with_max_distance_km(mut self, max_distance_km: Option<f64>) -> Self {
        self.max_distance_km = max_distance_km;
        self
    }

    #[inline]
    pub fn max_distance_km(&self) -> Option<f64> {
        self.max_distance_km
    }

    /// Build the proximity graph of `points`
    ///
    /// Every point becomes a node, even when no edge survives. Fewer than
    /// [`MIN_POINTS`] points give an edgeless graph, and degenerate geometry
    /// (duplicates, collinear sets) just gives a sparser one.
    pub fn build(&self, points: &[Point]) -> ProximityGraph {
        #[cfg(feature = "profiling")]
        profiling::scope!("builder::build");
        let started = Instant::now();

        let mut graph = ProximityGraph::with_capacity(points.len());
        for point in points {
            graph.add_node(point.id());
        }

        if points.len() < MIN_POINTS {
            tracing::debug!(
                "{} point(s) is below the triangulation minimum, graph has no edges",
                points.len()
            );
            return graph;
        }

        let projected: Vec<geo::Point<f64>> = points
            .par_iter()
            .map(|point| utils::project(point.lat(), point.lng()))
            .collect();

        let triangulated = triangulation::delaunay_edges(&projected);
        if triangulated.triangle_count == 0 {
            tracing::debug!("Point set is collinear, graph is a chain");
        }
        if !triangulated.duplicates.is_empty() {
            tracing::debug!(
                "{} point(s) share a position with an earlier point and stay isolated",
                triangulated.duplicates.len()
            );
        }

        // Weights come from the original coordinates, never from `projected`
        let weighted: Vec<(usize, usize, f64)> = triangulated
            .edges
            .par_iter()
            .map(|&(a, b)| (a, b, points[a].distance_km(&points[b])))
            .filter(|&(_, _, distance)| self.keeps(distance))
            .collect();

        let discarded = triangulated.edges.len() - weighted.len();
        for (a, b, distance) in weighted {
            graph.add_edge(points[a].id(), points[b].id(), distance);
        }

        tracing::info!(
            "Built proximity graph: {} nodes, {} edges ({} over the distance limit) in {:?}",
            graph.node_count(),
            graph.edge_count(),
            discarded,
            started.elapsed()
        );

        graph
    }

    #[inline]
    fn keeps(&self, distance_km: f64) -> bool {
        self.max_distance_km.is_none_or(|max| distance_km <= max)
    }
}
