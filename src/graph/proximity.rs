//! Undirected weighted adjacency-list graph keyed by point ids

use crate::graph::PointId;
use smallvec::SmallVec;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Neighbor list of a single node.
///
/// Delaunay graphs have an average degree below 6, so almost every list stays inline.
type Adjacency = SmallVec<[(PointId, f64); 8]>;

/// A canonical undirected edge with `source < target`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Edge {
    pub source: PointId,
    pub target: PointId,
    pub distance_km: f64,
}

/// Undirected graph whose edge weights are great-circle distances in kilometers
///
/// Invariants kept by [`ProximityGraph::add_edge`]: every edge is stored in
/// both directions with the same weight, weights are finite and non-negative,
/// a pair is stored at most once and self-loops never appear.
#[derive(Clone, Debug, Default)]
pub struct ProximityGraph {
    /// Node ids in insertion order
    nodes: Vec<PointId>,
    /// Dense index of each node into `nodes` / `adjacency`
    index: HashMap<PointId, usize>,
    /// Neighbor lists, parallel to `nodes`
    adjacency: Vec<Adjacency>,
    /// Number of undirected edges
    edge_count: usize,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl ProximityGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `nodes` nodes
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            index: HashMap::with_capacity(nodes),
            adjacency: Vec::with_capacity(nodes),
            edge_count: 0,
        }
    }

    /// Register a node without edges. Existing nodes are left untouched.
    pub fn add_node(&mut self, id: PointId) {
        self.slot(id);
    }

    /// Insert the undirected edge `u - v`
    ///
    /// If the pair is already connected the call does nothing: the first
    /// inserted weight is kept even when `weight` differs.
    ///
    /// # Panics
    /// On a self-loop or a negative or non-finite weight. Both mean the caller
    /// computed the edge wrong.
    pub fn add_edge(&mut self, u: PointId, v: PointId, weight: f64) {
        assert!(u != v, "self-loop on node {u}");
        assert!(
            weight.is_finite() && weight >= 0.0,
            "invalid weight {weight} for edge {u} - {v}"
        );

        let ui = self.slot(u);
        let vi = self.slot(v);

        if self.adjacency[ui].iter().any(|&(n, _)| n == v) {
            return;
        }

        self.adjacency[ui].push((v, weight));
        self.adjacency[vi].push((u, weight));
        self.edge_count += 1;
    }

    /// Neighbors of `id` with their edge weights. Unknown ids have none.
    #[inline]
    pub fn neighbors(&self, id: PointId) -> &[(PointId, f64)] {
        match self.index.get(&id) {
            Some(&i) => self.adjacency[i].as_slice(),
            None => &[],
        }
    }

    /// Weight of the edge `u - v`, if present
    pub fn weight(&self, u: PointId, v: PointId) -> Option<f64> {
        self.neighbors(u)
            .iter()
            .find(|&&(n, _)| n == v)
            .map(|&(_, w)| w)
    }

    /// Every undirected edge exactly once, as `source < target`
    ///
    /// Runs in O(total degree) and follows node insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (&u, neighbors) in self.nodes.iter().zip(&self.adjacency) {
            for &(v, distance_km) in neighbors {
                if u < v {
                    edges.push(Edge {
                        source: u,
                        target: v,
                        distance_km,
                    });
                }
            }
        }
        edges
    }

    /// Whether `id` is a node of this graph
    #[inline]
    pub fn contains(&self, id: PointId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of neighbors of `id` (0 for unknown ids)
    #[inline]
    pub fn degree(&self, id: PointId) -> usize {
        self.neighbors(id).len()
    }

    /// Node ids in insertion order
    #[inline]
    pub fn nodes(&self) -> &[PointId] {
        &self.nodes
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dense index for `id`, creating the node if needed
    fn slot(&mut self, id: PointId) -> usize {
        if let Some(&i) = self.index.get(&id) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(id);
        self.adjacency.push(Adjacency::new());
        self.index.insert(id, i);
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ProximityGraph {
        let mut graph = ProximityGraph::new();
        graph.add_edge(1, 2, 10.0);
        graph.add_edge(2, 3, 5.0);
        graph.add_edge(3, 1, 7.5);
        graph
    }

    #[test]
    fn test_add_edge_is_symmetric() {
        let graph = triangle();
        assert_eq!(graph.weight(1, 2), Some(10.0));
        assert_eq!(graph.weight(2, 1), Some(10.0));
        assert_eq!(graph.weight(1, 3), Some(7.5));
        assert_eq!(graph.weight(3, 1), Some(7.5));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_duplicate_edge_keeps_first_weight() {
        let mut graph = triangle();
        graph.add_edge(1, 2, 99.0);
        graph.add_edge(2, 1, 42.0);

        assert_eq!(graph.weight(1, 2), Some(10.0));
        assert_eq!(graph.weight(2, 1), Some(10.0));
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.degree(2), 2);
    }

    #[test]
    fn test_neighbors_unknown_node_is_empty() {
        let graph = triangle();
        assert!(graph.neighbors(42).is_empty());
        assert_eq!(graph.degree(42), 0);
        assert!(!graph.contains(42));
    }

    #[test]
    fn test_edges_are_canonical_and_unique() {
        let graph = triangle();
        let edges = graph.edges();
        assert_eq!(edges.len(), 3);
        for edge in &edges {
            assert!(edge.source < edge.target);
        }
        for (i, a) in edges.iter().enumerate() {
            for b in &edges[i + 1..] {
                assert!(!(a.source == b.source && a.target == b.target));
                assert!(!(a.source == b.target && a.target == b.source));
            }
        }
        let from_three = edges
            .iter()
            .find(|e| e.source == 1 && e.target == 3)
            .unwrap();
        assert_eq!(from_three.distance_km, 7.5);
    }

    #[test]
    fn test_isolated_nodes() {
        let mut graph = ProximityGraph::with_capacity(4);
        graph.add_node(5);
        graph.add_node(5);
        graph.add_node(6);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.edges().is_empty());
        assert!(graph.contains(5));
        assert_eq!(graph.nodes(), &[5, 6]);
    }

    #[test]
    fn test_zero_weight_is_allowed() {
        let mut graph = ProximityGraph::new();
        graph.add_edge(1, 2, 0.0);
        assert_eq!(graph.weight(1, 2), Some(0.0));
    }

    #[test]
    fn test_negative_ids() {
        let mut graph = ProximityGraph::new();
        graph.add_edge(3, -4, 1.0);
        let edges = graph.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, -4);
        assert_eq!(edges[0].target, 3);
    }

    #[test]
    #[should_panic(expected = "self-loop")]
    fn test_self_loop_panics() {
        let mut graph = ProximityGraph::new();
        graph.add_edge(1, 1, 1.0);
    }

    #[test]
    #[should_panic(expected = "invalid weight")]
    fn test_negative_weight_panics() {
        let mut graph = ProximityGraph::new();
        graph.add_edge(1, 2, -1.0);
    }

    #[test]
    #[should_panic(expected = "invalid weight")]
    fn test_nan_weight_panics() {
        let mut graph = ProximityGraph::new();
        graph.add_edge(1, 2, f64::NAN);
    }

    #[test]
    fn test_empty_graph() {
        let graph = ProximityGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
