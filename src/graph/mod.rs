//! Geographic Proximity Graph Module
//!
//! Turns a set of geographic points into a planar proximity graph and answers
//! shortest-path queries over it.
//!
//! # Architecture
//!
//! - **[`utils`]**: Web Mercator projection and haversine distances
//! - **[`Point`]**: Validated (id, lat, lng) record
//! - **[`ProximityGraph`]**: Undirected adjacency lists weighted in kilometers
//! - **[`GraphBuilder`]**: Delaunay triangulation in projected space, great-circle weights
//! - **[`PathFinder`]**: A* search with a great-circle heuristic
//! - **[`GraphCache`]**: Build-once owner of a point set and its graph
//!
//! # Usage Example
//!
//! ```rust
//! use proximity_router::graph::{Config, GraphCache, Point};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let points = vec![
//!     Point::new(1, 4.7110, -74.0721)?,  // Bogota
//!     Point::new(2, 6.2442, -75.5812)?,  // Medellin
//!     Point::new(3, 3.4516, -76.5320)?,  // Cali
//!     Point::new(4, 10.3910, -75.4794)?, // Cartagena
//! ];
//! let cache = GraphCache::new(points, Config::default())?;
//!
//! let summary = cache.summary();
//! assert_eq!(summary.node_count, 4);
//!
//! let route = cache.shortest_path(3, 4).expect("connected");
//! assert_eq!(route.path.first().map(|p| p.id()), Some(3));
//! assert_eq!(route.path.last().map(|p| p.id()), Some(4));
//! # Ok(())
//! # }
//! ```
//!
//! # Performance Characteristics
//!
//! - **Build Time**: O(N log N) expected for the triangulation, weighting is parallel
//! - **Query Time**: O(E log V) per A* search, queries are independent
//! - **Memory**: O(N) nodes + O(E) adjacency entries, E <= 3N - 6

mod builder;
mod cache;
mod pathfinding;
mod point;
mod proximity;
mod triangulation;
pub mod utils;

// Public API exports
pub use builder::{GraphBuilder, MIN_POINTS};
pub use cache::{Config, EDGE_DISTANCE_DECIMALS, GraphCache, GraphSummary};
pub use pathfinding::{DISTANCE_DECIMALS, PathFinder, PathResult};
#[cfg(feature = "serde")]
pub use point::{load_points_file, load_points_json};
pub use point::{Point, PointId};
pub use proximity::{Edge, ProximityGraph};
pub use triangulation::{DelaunayEdges, delaunay_edges};

/// Error types for the graph module
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid coordinate for point {id}: {reason}")]
    InvalidCoordinate { id: PointId, reason: String },

    #[error("Duplicate point id: {0}")]
    DuplicatePointId(PointId),

    #[error("Unknown point id: {0}")]
    UnknownPoint(PointId),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(Vec<Point>, Config) -> Result<GraphCache> = GraphCache::new;
        let _: fn() -> Config = Config::default;
        let _: fn() -> GraphBuilder = GraphBuilder::new;
        let _: fn() -> ProximityGraph = ProximityGraph::new;
    }

    #[test]
    fn test_error_messages() {
        let err = GraphError::DuplicatePointId(42);
        assert_eq!(err.to_string(), "Duplicate point id: 42");

        let err = Point::new(5, 91.0, 0.0).unwrap_err();
        assert!(err.to_string().starts_with("Invalid coordinate for point 5"));
    }
}
