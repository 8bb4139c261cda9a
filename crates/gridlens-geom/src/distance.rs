//! Distance helpers for the three spaces the overlay works in.
//!
//! - raw degrees: nearest-station snapping (cheap, fine at regional extents)
//! - local meters: flat-earth approximation around a segment, used for offsets
//! - great-circle kilometers: reported distances

use gridlens_core::{Degrees, GeoPoint, Kilometers};

/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Ground length of one degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Great-circle distance between two points.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> Kilometers {
    let dlat = Degrees(b.lat - a.lat).to_radians().value();
    let dlon = Degrees(b.lon - a.lon).to_radians().value();
    let lat1 = Degrees(a.lat).to_radians();
    let lat2 = Degrees(b.lat).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding pushes h past 1 for near-antipodal pairs
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    Kilometers(EARTH_RADIUS_KM * c)
}

/// Meters per degree along each axis near a given latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalScale {
    pub lat_meters_per_degree: f64,
    pub lon_meters_per_degree: f64,
}

impl LocalScale {
    /// Flat-earth scale at the mean latitude of two points.
    pub fn between(a: GeoPoint, b: GeoPoint) -> Self {
        let mean_lat = Degrees((a.lat + b.lat) / 2.0).to_radians();
        Self {
            lat_meters_per_degree: METERS_PER_DEGREE,
            lon_meters_per_degree: METERS_PER_DEGREE * mean_lat.cos(),
        }
    }
}
