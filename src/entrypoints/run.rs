use super::settings::{Command, POINTS_ENV, Settings};
use proximity_router::graph::{self, GraphCache, GraphError, PointId};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Log version info
pub fn log_version_info() {
    tracing::info!(
        "{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
}

/// Native entry point
pub fn native_main() -> ExitCode {
    // Setup logging, on stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    log_version_info();
    let settings = Settings::from_cli();

    match run(&settings) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Neighbor entry printed by the `point` command
#[derive(Serialize)]
struct NeighborOutput {
    id: PointId,
    distance_km: f64,
}

#[derive(Serialize)]
struct PointOutput<'a> {
    point: &'a graph::Point,
    neighbors: Vec<NeighborOutput>,
}

/// Execute the selected command. `Ok(false)` means "nothing found".
fn run(settings: &Settings) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(path) = settings.points_path() else {
        return Err(format!("no points file given (use --points or set {POINTS_ENV})").into());
    };

    let points = graph::load_points_file(&path)?;
    tracing::info!("Loaded {} points from {}", points.len(), path.display());
    let cache = GraphCache::new(points, settings.config())?;

    let started = Instant::now();
    match &settings.command {
        Command::Summary => print_json(&cache.summary())?,
        Command::Edges { limit } => {
            let edges = cache.edges();
            let shown = limit.map_or(edges.len(), |limit| limit.min(edges.len()));
            print_json(&edges[..shown])?;
        }
        Command::Path { start, goal } => match cache.shortest_path(*start, *goal) {
            Some(result) => {
                tracing::info!(
                    "Path with {} points, {} km, {} nodes expanded in {:?}",
                    result.path_length(),
                    result.distance_km,
                    result.nodes_expanded,
                    started.elapsed()
                );
                print_json(&result)?;
            }
            None => {
                tracing::error!("No path found from {start} to {goal}");
                return Ok(false);
            }
        },
        Command::Point { id } => {
            let point = cache.point(*id).ok_or(GraphError::UnknownPoint(*id))?;
            let neighbors = cache
                .graph()
                .neighbors(*id)
                .iter()
                .map(|&(id, distance_km)| NeighborOutput {
                    id,
                    distance_km: graph::utils::round_to(
                        distance_km,
                        graph::EDGE_DISTANCE_DECIMALS,
                    ),
                })
                .collect();
            print_json(&PointOutput { point, neighbors })?;
        }
    }

    Ok(true)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value)?;
    println!();
    Ok(())
}
