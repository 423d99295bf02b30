//! Great-circle geometry helpers.
//!
//! Pure coordinate math used by the sequencer (stop-to-stop distances)
//! and the synthesized-path generator (interpolation and bearing).

use crate::model::Coord;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average urban driving speed assumed when estimating travel time
/// from straight-line distance.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Kilometers per degree of latitude (also per degree of longitude at
/// the equator).
const KM_PER_DEG: f64 = 111.32;

/// Haversine great-circle distance between two coordinates in kilometers.
pub fn haversine_km(from: Coord, to: Coord) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Linear interpolation between two coordinates.
///
/// `t` is clamped to [0, 1]; `t = 0` returns `from`, `t = 1` returns `to`.
pub fn interpolate(from: Coord, to: Coord, t: f64) -> Coord {
    let t = t.clamp(0.0, 1.0);
    Coord {
        lat: from.lat + (to.lat - from.lat) * t,
        lon: from.lon + (to.lon - from.lon) * t,
    }
}

/// Initial bearing from `from` to `to` in degrees, normalized to [0, 360).
pub fn initial_bearing_deg(from: Coord, to: Coord) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin()
        - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Offset a coordinate by `km` along `bearing_deg`.
///
/// Equirectangular approximation; adequate for the sub-kilometer lateral
/// offsets of the synthesized path, not for long-range navigation.
pub fn offset_km(origin: Coord, bearing_deg: f64, km: f64) -> Coord {
    let bearing_rad = bearing_deg.to_radians();
    let dlat = km * bearing_rad.cos() / KM_PER_DEG;
    let dlon = km * bearing_rad.sin() / (KM_PER_DEG * origin.lat.to_radians().cos());
    Coord {
        lat: origin.lat + dlat,
        lon: origin.lon + dlon,
    }
}

/// Convert a distance in km to travel time in seconds at the given speed.
pub fn km_to_secs(km: f64, speed_kmh: f64) -> i32 {
    let hours = km / speed_kmh;
    (hours * 3600.0).round() as i32
}
