//! A* shortest paths over a [`ProximityGraph`]
//!
//! The heuristic is the great-circle distance to the goal. Edge weights are
//! great-circle distances between their endpoints, so by the triangle
//! inequality no path can be shorter than the heuristic: it is admissible and
//! the first time the goal leaves the frontier its cost is optimal.

use crate::graph::{Point, PointId, ProximityGraph, utils};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Decimal places kept in [`PathResult::distance_km`]
pub const DISTANCE_DECIMALS: i32 = 2;

/// A shortest path between two points
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PathResult {
    /// Points from start to goal, both included
    pub path: Vec<Point>,
    /// Total great-circle length in kilometers, rounded to [`DISTANCE_DECIMALS`]
    pub distance_km: f64,
    /// Number of frontier pops the search needed (diagnostic only)
    pub nodes_expanded: usize,
}

impl PathResult {
    /// Number of points on the path
    #[inline]
    pub fn path_length(&self) -> usize {
        self.path.len()
    }

    /// Ids along the path, start first
    pub fn ids(&self) -> Vec<PointId> {
        self.path.iter().map(Point::id).collect()
    }
}

/// Frontier entry, ordered so that `BinaryHeap` pops the lowest `f` first
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    f: f64,
    g: f64,
    node: PointId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f)
    }
}

/// Read-only A* search over a graph and the coordinates of its nodes
///
/// Every call to [`PathFinder::find_path`] owns its own frontier and score
/// maps, so one finder can serve any number of threads.
#[derive(Clone, Copy, Debug)]
pub struct PathFinder<'a> {
    graph: &'a ProximityGraph,
    points: &'a HashMap<PointId, Point>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> PathFinder<'a> {
    pub fn new(graph: &'a ProximityGraph, points: &'a HashMap<PointId, Point>) -> Self {
        Self { graph, points }
    }

    /// Lowest-distance path from `start` to `goal`
    ///
    /// Returns `None` when either id has no coordinates or when the goal is
    /// unreachable; callers cannot (and need not) tell the two apart.
    pub fn find_path(&self, start: PointId, goal: PointId) -> Option<PathResult> {
        let start_point = self.points.get(&start)?;
        let goal_point = self.points.get(&goal)?;

        let mut best_g: HashMap<PointId, f64> = HashMap::new();
        let mut came_from: HashMap<PointId, PointId> = HashMap::new();
        let mut open: BinaryHeap<FrontierEntry> = BinaryHeap::new();

        best_g.insert(start, 0.0);
        open.push(FrontierEntry {
            f: start_point.distance_km(goal_point),
            g: 0.0,
            node: start,
        });

        let mut nodes_expanded = 0;

        while let Some(current) = open.pop() {
            nodes_expanded += 1;

            if current.node == goal {
                tracing::trace!(
                    "Reached {} from {} after {} expansions",
                    goal,
                    start,
                    nodes_expanded
                );
                return self.reconstruct(&came_from, goal, current.g, nodes_expanded);
            }

            // Skip entries superseded by a cheaper push of the same node
            if best_g
                .get(&current.node)
                .is_some_and(|&best| current.g > best)
            {
                continue;
            }

            for &(neighbor, weight) in self.graph.neighbors(current.node) {
                let tentative_g = current.g + weight;
                if best_g
                    .get(&neighbor)
                    .is_some_and(|&best| tentative_g >= best)
                {
                    continue;
                }
                // Graph nodes without coordinates cannot be scored or returned
                let Some(neighbor_point) = self.points.get(&neighbor) else {
                    continue;
                };

                best_g.insert(neighbor, tentative_g);
                came_from.insert(neighbor, current.node);
                open.push(FrontierEntry {
                    f: tentative_g + self.heuristic(neighbor_point, goal_point),
                    g: tentative_g,
                    node: neighbor,
                });
            }
        }

        tracing::trace!(
            "No path from {} to {} ({} expansions)",
            start,
            goal,
            nodes_expanded
        );
        None
    }

    #[inline]
    fn heuristic(&self, from: &Point, goal: &Point) -> f64 {
        utils::haversine_km(from.lat(), from.lng(), goal.lat(), goal.lng())
    }

    /// Walk predecessors back from `goal` and flip into start-to-goal order
    fn reconstruct(
        &self,
        came_from: &HashMap<PointId, PointId>,
        goal: PointId,
        total_km: f64,
        nodes_expanded: usize,
    ) -> Option<PathResult> {
        let mut path = vec![*self.points.get(&goal)?];
        let mut current = goal;
        while let Some(&previous) = came_from.get(&current) {
            path.push(*self.points.get(&previous)?);
            current = previous;
        }
        path.reverse();

        Some(PathResult {
            path,
            distance_km: utils::round_to(total_km, DISTANCE_DECIMALS),
            nodes_expanded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn lookup(points: &[Point]) -> HashMap<PointId, Point> {
        points.iter().map(|p| (p.id(), *p)).collect()
    }

    /// Three points on the equator, one degree apart
    fn equator_line() -> Vec<Point> {
        vec![
            Point::new(1, 0.0, 0.0).unwrap(),
            Point::new(2, 0.0, 1.0).unwrap(),
            Point::new(3, 0.0, 2.0).unwrap(),
        ]
    }

    /// Plain Dijkstra without a heuristic, used as the reference
    fn dijkstra(graph: &ProximityGraph, start: PointId, goal: PointId) -> Option<f64> {
        let mut dist: HashMap<PointId, f64> = HashMap::new();
        let mut open = BinaryHeap::new();
        dist.insert(start, 0.0);
        open.push(FrontierEntry {
            f: 0.0,
            g: 0.0,
            node: start,
        });
        while let Some(current) = open.pop() {
            if current.node == goal {
                return Some(current.g);
            }
            if current.g > dist[&current.node] {
                continue;
            }
            for &(neighbor, weight) in graph.neighbors(current.node) {
                let candidate = current.g + weight;
                if dist.get(&neighbor).is_none_or(|&d| candidate < d) {
                    dist.insert(neighbor, candidate);
                    open.push(FrontierEntry {
                        f: candidate,
                        g: candidate,
                        node: neighbor,
                    });
                }
            }
        }
        None
    }

    #[test]
    fn test_frontier_pops_lowest_f_first() {
        let mut heap = BinaryHeap::new();
        for (f, node) in [(3.0, 1), (1.0, 2), (2.0, 3)] {
            heap.push(FrontierEntry { f, g: 0.0, node });
        }
        assert_eq!(heap.pop().unwrap().node, 2);
        assert_eq!(heap.pop().unwrap().node, 3);
        assert_eq!(heap.pop().unwrap().node, 1);
    }

    #[test]
    fn test_start_equals_goal() {
        let points = equator_line();
        let graph = GraphBuilder::new().build(&points);
        let coords = lookup(&points);
        let finder = PathFinder::new(&graph, &coords);

        let result = finder.find_path(2, 2).unwrap();
        assert_eq!(result.ids(), vec![2]);
        assert_eq!(result.distance_km, 0.0);
        assert_eq!(result.nodes_expanded, 1);
        assert_eq!(result.path_length(), 1);
    }

    #[test]
    fn test_start_equals_goal_for_isolated_node() {
        let points = equator_line();
        let graph = ProximityGraph::new();
        let coords = lookup(&points);
        let finder = PathFinder::new(&graph, &coords);

        assert_eq!(finder.find_path(3, 3).unwrap().ids(), vec![3]);
        assert!(finder.find_path(1, 3).is_none());
    }

    #[test]
    fn test_unknown_ids_have_no_path() {
        let points = equator_line();
        let graph = GraphBuilder::new().build(&points);
        let coords = lookup(&points);
        let finder = PathFinder::new(&graph, &coords);

        assert!(finder.find_path(1, 99).is_none());
        assert!(finder.find_path(99, 1).is_none());
        assert!(finder.find_path(99, 99).is_none());
    }

    #[test]
    fn test_prefers_cheaper_detour() {
        let points = equator_line();
        let coords = lookup(&points);
        let step = points[0].distance_km(&points[1]);

        let mut graph = ProximityGraph::new();
        graph.add_edge(1, 3, 500.0);
        graph.add_edge(1, 2, step);
        graph.add_edge(2, 3, step);

        let result = PathFinder::new(&graph, &coords).find_path(1, 3).unwrap();
        assert_eq!(result.ids(), vec![1, 2, 3]);
        assert_eq!(result.distance_km, utils::round_to(2.0 * step, 2));
        assert_eq!(result.path[0], points[0]);
        assert_eq!(result.path[2], points[2]);
    }

    #[test]
    fn test_disjoint_components_have_no_path() {
        let points = vec![
            Point::new(1, 0.0, 0.0).unwrap(),
            Point::new(2, 0.0, 1.0).unwrap(),
            Point::new(3, 1.0, 0.0).unwrap(),
            Point::new(4, 40.0, 40.0).unwrap(),
            Point::new(5, 40.0, 41.0).unwrap(),
            Point::new(6, 41.0, 40.0).unwrap(),
        ];
        let graph = GraphBuilder::new()
            .with_max_distance_km(Some(500.0))
            .build(&points);
        let coords = lookup(&points);
        let finder = PathFinder::new(&graph, &coords);

        assert!(finder.find_path(1, 2).is_some());
        assert!(finder.find_path(4, 6).is_some());
        assert!(finder.find_path(1, 5).is_none());
        assert!(finder.find_path(6, 3).is_none());
    }

    #[test]
    fn test_path_follows_graph_edges() {
        let points: Vec<Point> = (0..30)
            .map(|i| {
                let lat = 40.0 + (i % 6) as f64 * 0.5 + (i as f64 * 0.37).sin() * 0.1;
                let lng = -3.0 + (i / 6) as f64 * 0.5 + (i as f64 * 0.71).cos() * 0.1;
                Point::new(i, lat, lng).unwrap()
            })
            .collect();
        let graph = GraphBuilder::new().build(&points);
        let coords = lookup(&points);

        let result = PathFinder::new(&graph, &coords).find_path(0, 29).unwrap();
        let ids = result.ids();
        assert_eq!(ids.first(), Some(&0));
        assert_eq!(ids.last(), Some(&29));

        let mut total = 0.0;
        for pair in ids.windows(2) {
            total += graph.weight(pair[0], pair[1]).expect("consecutive ids share an edge");
        }
        assert!((utils::round_to(total, 2) - result.distance_km).abs() < 1e-9);
        assert!(result.nodes_expanded >= result.path_length());
    }

    #[test]
    fn test_astar_matches_dijkstra_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for round in 0..20 {
            let count = rng.gen_range(3..80);
            let points: Vec<Point> = (0..count)
                .map(|i| {
                    let lat = rng.gen_range(-60.0..60.0);
                    let lng = rng.gen_range(-170.0..170.0);
                    Point::new(i, lat, lng).unwrap()
                })
                .collect();
            // Every other round uses a cutoff so some pairs are disconnected
            let limit = if round % 2 == 0 { None } else { Some(2500.0) };
            let graph = GraphBuilder::new()
                .with_max_distance_km(limit)
                .build(&points);
            let coords = lookup(&points);
            let finder = PathFinder::new(&graph, &coords);

            for _ in 0..15 {
                let start = rng.gen_range(0..count);
                let goal = rng.gen_range(0..count);
                let expected = dijkstra(&graph, start, goal);
                let found = finder.find_path(start, goal);

                match (expected, found) {
                    (None, None) => {}
                    (Some(reference), Some(result)) => {
                        assert!(
                            (result.distance_km - reference).abs() <= 0.005 + 1e-9,
                            "round {round}: {start}->{goal} A* {} vs Dijkstra {reference}",
                            result.distance_km
                        );
                    }
                    (expected, found) => panic!(
                        "round {round}: {start}->{goal} reachability differs: {expected:?} vs {found:?}"
                    ),
                }
            }
        }
    }
}
