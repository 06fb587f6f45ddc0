//! Proximity Router - Delaunay proximity graphs and A* routing over geographic points
//!
//! See [`graph`] for the data model and query API.

pub mod graph;
