use super::cli::{get_env, parse_args};
use clap::{Parser, Subcommand};
use proximity_router::graph::{Config, PointId};
use std::path::PathBuf;

/// Environment variable read when `--points` is not given
pub const POINTS_ENV: &str = "PROXIMITY_POINTS";

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Proximity Router - Delaunay proximity graphs over geographic points with A* shortest paths
pub struct Settings {
    /// JSON file with an array of {"id", "lat", "lng"} records (falls back to $PROXIMITY_POINTS)
    #[clap(short, long, value_name = "FILE")]
    pub points: Option<PathBuf>,

    /// Drop graph edges longer than this many kilometers
    #[clap(short, long, value_name = "KM")]
    pub max_distance_km: Option<f64>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print node and edge counts
    Summary,
    /// Print the edge list
    Edges {
        /// Print at most this many edges
        #[clap(short, long)]
        limit: Option<usize>,
    },
    /// Find the shortest path between two point ids
    Path {
        start: PointId,
        goal: PointId,
    },
    /// Print a single point and its graph neighbors
    Point { id: PointId },
}

impl Settings {
    /// Parse the command line, exiting with clap's usage message on error
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// The points file from the command line or the environment
    pub fn points_path(&self) -> Option<PathBuf> {
        self.points.clone().or_else(|| get_env(POINTS_ENV))
    }

    /// Graph configuration derived from the arguments
    pub fn config(&self) -> Config {
        Config {
            max_distance_km: self.max_distance_km,
        }
    }
}
