//! Coordinate projection and great-circle distance helpers

use geo::Point;

/// Web Mercator bounds in meters (EPSG:3857)
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;

/// Maximum latitude kept by the projection, in degrees
pub const MAX_LATITUDE: f64 = 85.0511;

/// Mean Earth radius used for all distances, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Precomputed constant: EARTH_MERCATOR_MAX / 180.0
const LON_TO_X_FACTOR: f64 = EARTH_MERCATOR_MAX / 180.0;

/// Precomputed constant: EARTH_MERCATOR_MAX / PI
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;

/// Project WGS84 (lat, lng) onto the Web Mercator plane, in meters
///
/// Latitude is clamped to [`MAX_LATITUDE`] so the poles never reach the
/// projection's singularity. The mapping is strictly increasing in both
/// arguments inside the clamp range, so planar neighborhoods follow
/// surface neighborhoods.
///
/// # Arguments
/// * `lat` - Latitude in degrees
/// * `lng` - Longitude in degrees (-180 to 180)
#[inline(always)]
pub fn project(lat: f64, lng: f64) -> Point<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);

    let x = lng * LON_TO_X_FACTOR;
    let y = (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
        .tan()
        .ln()
        * Y_FACTOR;

    Point::new(x, y)
}

/// Haversine great-circle distance between two WGS84 coordinates, in kilometers
#[inline]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Round `value` to a fixed number of decimal places
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
