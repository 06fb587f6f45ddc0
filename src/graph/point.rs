//! Validated geographic point records
//!
//! Points arrive from an external source (a spreadsheet export, a database, a
//! JSON file) and are checked once here. Everything downstream refers to them
//! by [`PointId`].

use crate::graph::{GraphError, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Externally assigned, unique point identifier
pub type PointId = i64;

/// A single location on the sphere
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Point {
    id: PointId,
    lat: f64,
    lng: f64,
}

impl Point {
    /// Create a point, rejecting non-finite or out-of-range coordinates
    ///
    /// # Arguments
    /// * `id` - Unique identifier
    /// * `lat` - Latitude in degrees (-90 to 90)
    /// * `lng` - Longitude in degrees (-180 to 180)
    pub fn new(id: PointId, lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GraphError::InvalidCoordinate {
                id,
                reason: format!("latitude {lat} outside [-90, 90]"),
            });
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GraphError::InvalidCoordinate {
                id,
                reason: format!("longitude {lng} outside [-180, 180]"),
            });
        }
        Ok(Self { id, lat, lng })
    }

    #[inline]
    pub fn id(&self) -> PointId {
        self.id
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to another point in kilometers
    #[inline]
    pub fn distance_km(&self, other: &Point) -> f64 {
        super::utils::haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Raw record shape accepted from point files
///
/// Any additional columns (city names, population, ...) are ignored.
#[cfg(feature = "serde")]
#[derive(Debug, Deserialize)]
struct PointRecord {
    id: PointId,
    lat: f64,
    lng: f64,
}

/// Parse a JSON array of `{ "id", "lat", "lng" }` records into validated points
#[cfg(feature = "serde")]
pub fn load_points_json<R: std::io::Read>(reader: R) -> Result<Vec<Point>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("point::load_points_json");

    let records: Vec<PointRecord> = serde_json::from_reader(reader)?;
    records
        .into_iter()
        .map(|record| Point::new(record.id, record.lat, record.lng))
        .collect()
}

/// Load points from a JSON file on disk
#[cfg(feature = "serde")]
pub fn load_points_file<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<Point>> {
    let file = std::fs::File::open(path.as_ref())?;
    let points = load_points_json(std::io::BufReader::new(file))?;
    tracing::debug!(
        "Loaded {} points from {}",
        points.len(),
        path.as_ref().display()
    );
    Ok(points)
}
