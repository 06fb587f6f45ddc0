//! GraphCache - owned point set plus its lazily built proximity graph
//!
//! This is the entry point for queries: it validates the point set, builds
//! the graph on first use (exactly once, even with concurrent callers) and
//! answers edge, summary and shortest-path requests against that one graph.

use crate::graph::{
    Edge, GraphBuilder, GraphError, PathFinder, PathResult, Point, PointId, ProximityGraph, Result,
    utils,
};

use once_cell::sync::OnceCell;
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decimal places kept in the distances of [`GraphCache::edges`]
pub const EDGE_DISTANCE_DECIMALS: i32 = 6;

/// Configuration for the graph cache
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Edges longer than this (in kilometers) are dropped while building.
    /// Default: `None`, keep every triangulation edge.
    pub max_distance_km: Option<f64>,
}

/// Node and edge totals of the built graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
}

/// Everything derived from one build
#[derive(Debug)]
struct BuiltGraph {
    graph: ProximityGraph,
    /// Canonical edge list with distances rounded for reporting
    edges: Vec<Edge>,
}

/// Build-once cache of the proximity graph for a fixed point set
///
/// Reads take `&self` and may run from any number of threads. Changing the
/// point set or dropping the graph takes `&mut self`, so it can never race a
/// query.
#[derive(Debug)]
pub struct GraphCache {
    /// Points in their original order
    points: Vec<Point>,
    /// Id -> point, for the path finder and point lookups
    lookup: HashMap<PointId, Point>,
    /// Configuration settings
    config: Config,
    built: OnceCell<BuiltGraph>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl GraphCache {
    /// Create a cache for `points`. Nothing is built until the first query.
    ///
    /// Fails if two points share an id.
    pub fn new(points: Vec<Point>, config: Config) -> Result<Self> {
        let lookup = Self::index_points(&points)?;
        Ok(Self {
            points,
            lookup,
            config,
            built: OnceCell::new(),
        })
    }

    /// The proximity graph, built on first access
    pub fn graph(&self) -> &ProximityGraph {
        &self.built().graph
    }

    /// Every undirected edge once, `source < target`, distances rounded to
    /// [`EDGE_DISTANCE_DECIMALS`] places
    pub fn edges(&self) -> &[Edge] {
        &self.built().edges
    }

    /// Node and edge counts of the graph
    pub fn summary(&self) -> GraphSummary {
        let graph = self.graph();
        GraphSummary {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
        }
    }

    /// Shortest path between two point ids, `None` if either is unknown or
    /// the two are not connected
    pub fn shortest_path(&self, start: PointId, goal: PointId) -> Option<PathResult> {
        PathFinder::new(self.graph(), &self.lookup).find_path(start, goal)
    }

    /// Answer many independent path queries in parallel against the shared graph
    pub fn shortest_paths(&self, pairs: &[(PointId, PointId)]) -> Vec<Option<PathResult>> {
        let finder = PathFinder::new(self.graph(), &self.lookup);
        pairs
            .par_iter()
            .map(|&(start, goal)| finder.find_path(start, goal))
            .collect()
    }

    /// Look up a point by id
    #[inline]
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.lookup.get(&id)
    }

    /// All points in their original order
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the graph has been built yet
    #[inline]
    pub fn is_built(&self) -> bool {
        self.built.get().is_some()
    }

    /// Drop the built graph; the next query rebuilds it
    pub fn reset(&mut self) {
        if self.built.take().is_some() {
            tracing::debug!("Proximity graph cache invalidated");
        }
    }

    /// Swap in a new point set and invalidate the graph
    ///
    /// On error the cache keeps its previous points and graph.
    pub fn replace_points(&mut self, points: Vec<Point>) -> Result<()> {
        let lookup = Self::index_points(&points)?;
        self.points = points;
        self.lookup = lookup;
        self.reset();
        Ok(())
    }

    /// Change the configuration and invalidate the graph if it differs
    pub fn set_config(&mut self, config: Config) {
        if self.config != config {
            self.config = config;
            self.reset();
        }
    }

    fn built(&self) -> &BuiltGraph {
        self.built.get_or_init(|| {
            #[cfg(feature = "profiling")]
            profiling::scope!("cache::build");

            tracing::debug!("Building proximity graph for {} points", self.points.len());
            let graph = GraphBuilder::new()
                .with_max_distance_km(self.config.max_distance_km)
                .build(&self.points);
            let edges = graph
                .edges()
                .into_iter()
                .map(|edge| Edge {
                    distance_km: utils::round_to(edge.distance_km, EDGE_DISTANCE_DECIMALS),
                    ..edge
                })
                .collect();
            BuiltGraph { graph, edges }
        })
    }

    fn index_points(points: &[Point]) -> Result<HashMap<PointId, Point>> {
        let mut lookup = HashMap::with_capacity(points.len());
        for point in points {
            if lookup.insert(point.id(), *point).is_some() {
                return Err(GraphError::DuplicatePointId(point.id()));
            }
        }
        Ok(lookup)
    }
}
