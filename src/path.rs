//! Path resolution between consecutive stops.
//!
//! The primary strategy asks an external road-routing provider (OSRM) for
//! geometry and duration. Any provider failure degrades to a locally
//! synthesized curve with a straight-line travel-time estimate; the
//! resolver never propagates provider errors to the caller, it only flags
//! the segment as best-effort.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::geo;
use crate::model::{Coord, PathSegment};

/// Number of interpolation steps in a synthesized path (13 points).
pub const SYNTH_STEPS: usize = 12;

/// Low-frequency lateral deviation amplitude, as a fraction of the
/// straight-line distance ("grid" deviation).
const GRID_AMPLITUDE: f64 = 0.04;

/// Higher-frequency lateral deviation amplitude ("local road" deviation).
const LOCAL_AMPLITUDE: f64 = 0.015;

/// Cycles of the local-road deviation along the path.
const LOCAL_FREQUENCY: f64 = 2.5;

/// A routable path returned by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub geometry: Vec<Coord>,
    pub duration_secs: i32,
    pub distance_km: f64,
}

/// Failure modes of an external routing provider.
#[derive(Debug)]
pub enum PathProviderError {
    /// Network error, timeout, or non-success HTTP status.
    Http(reqwest::Error),
    /// The provider answered but returned no route.
    EmptyRoute,
    /// The provider returned a route with unusable geometry or duration.
    InvalidRoute,
}

impl fmt::Display for PathProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathProviderError::Http(err) => write!(f, "routing request failed: {}", err),
            PathProviderError::EmptyRoute => f.write_str("provider returned no route"),
            PathProviderError::InvalidRoute => f.write_str("provider returned an unusable route"),
        }
    }
}

impl From<reqwest::Error> for PathProviderError {
    fn from(err: reqwest::Error) -> Self {
        PathProviderError::Http(err)
    }
}

/// Road-routing provider seam.
///
/// Implementations must be injectable into the resolver; tests use
/// scripted and always-failing providers.
pub trait PathProvider: Send + Sync {
    fn path_between(&self, from: Coord, to: Coord) -> Result<ResolvedPath, PathProviderError>;
}

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// OSRM HTTP adapter for per-pair route geometry.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl PathProvider for OsrmClient {
    fn path_between(&self, from: Coord, to: Coord) -> Result<ResolvedPath, PathProviderError> {
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
            self.config.base_url, self.config.profile, from.lon, from.lat, to.lon, to.lat
        );

        let body: OsrmRouteResponse = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json())?;

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or(PathProviderError::EmptyRoute)?;

        if route.geometry.coordinates.len() < 2 || route.duration <= 0.0 {
            return Err(PathProviderError::InvalidRoute);
        }

        let geometry = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coord::new(lat, lon))
            .collect();

        Ok(ResolvedPath {
            geometry,
            duration_secs: route.duration.round() as i32,
            distance_km: route.distance / 1000.0,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON LineString coordinates, [lon, lat] pairs.
    coordinates: Vec<[f64; 2]>,
}

/// Synthesize a plausible street-level curve between two points.
///
/// A fixed-step interpolation of the straight line, perturbed laterally by
/// two superimposed sinusoids scaled to the straight-line distance: one
/// half-wave grid deviation plus a higher-frequency local-road deviation.
/// Endpoints are exact. The duration estimate comes from the straight-line
/// distance at `speed_kmh`, never from the synthesized geometry length.
pub fn synthesize_path(from: Coord, to: Coord, speed_kmh: f64) -> ResolvedPath {
    let distance_km = geo::haversine_km(from, to);
    let perp_bearing = geo::initial_bearing_deg(from, to) + 90.0;

    let mut geometry = Vec::with_capacity(SYNTH_STEPS + 1);
    for step in 0..=SYNTH_STEPS {
        let t = step as f64 / SYNTH_STEPS as f64;
        let base = geo::interpolate(from, to, t);
        let grid = GRID_AMPLITUDE * (std::f64::consts::PI * t).sin();
        let local = LOCAL_AMPLITUDE * (2.0 * std::f64::consts::PI * LOCAL_FREQUENCY * t).sin();
        let offset_km = distance_km * (grid + local);
        geometry.push(geo::offset_km(base, perp_bearing, offset_km));
    }

    ResolvedPath {
        geometry,
        duration_secs: geo::km_to_secs(distance_km, speed_kmh).max(1),
        distance_km,
    }
}

/// Resolves the path between consecutive stops, falling back to
/// synthesized geometry whenever the provider fails.
///
/// [`PathResolver::resolve`] is total: it always returns a usable segment.
pub struct PathResolver {
    provider: Option<Box<dyn PathProvider>>,
    speed_kmh: f64,
}

impl PathResolver {
    pub fn new(provider: Box<dyn PathProvider>) -> Self {
        Self {
            provider: Some(provider),
            speed_kmh: geo::DEFAULT_SPEED_KMH,
        }
    }

    /// Resolver with no live provider: every segment is synthesized.
    pub fn offline() -> Self {
        Self {
            provider: None,
            speed_kmh: geo::DEFAULT_SPEED_KMH,
        }
    }

    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }

    pub fn resolve(&self, from: Coord, to: Coord) -> PathSegment {
        if let Some(provider) = &self.provider {
            match provider.path_between(from, to) {
                Ok(path) => {
                    return PathSegment {
                        geometry: path.geometry,
                        duration_secs: path.duration_secs,
                        distance_km: path.distance_km,
                        fallback: false,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "routing provider failed, synthesizing path");
                }
            }
        } else {
            debug!("no routing provider configured, synthesizing path");
        }

        let path = synthesize_path(from, to, self.speed_kmh);
        PathSegment {
            geometry: path.geometry,
            duration_secs: path.duration_secs,
            distance_km: path.distance_km,
            fallback: true,
        }
    }
}
