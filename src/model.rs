//! Domain data model: outlets, inspectors, routes and schedules.
//!
//! Outlets are read-only input from the external risk feed. Routes and
//! schedules are constructed once per scheduling run and never mutated
//! afterwards; regenerating a schedule means rerunning the whole pipeline.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::risk::PriorityTier;

/// A geographic coordinate (latitude, longitude in degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Unique outlet identifier from the risk feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutletId(pub String);

impl OutletId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique inspector identifier from the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectorId(pub String);

impl InspectorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InspectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A risk-scored grease-trap site, as supplied by the external feed.
///
/// Immutable for the duration of a scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    #[serde(rename = "outlet_id")]
    pub id: OutletId,
    pub name: String,
    pub area: String,
    #[serde(flatten)]
    pub location: Coord,
    /// Predicted probability of a missed cleaning, in [0, 1].
    pub p_miss_cleaning: f64,
    /// Forecast waste volume in liters, >= 0.
    pub forecast_volume_liters: f64,
}

impl Outlet {
    /// Validate the feed record. Malformed records are skipped by the
    /// schedule builder and surfaced as a skip count, never silently dropped.
    pub fn validate(&self) -> Result<(), FeedRecordError> {
        if !self.location.lat.is_finite() || !self.location.lon.is_finite() {
            return Err(FeedRecordError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&self.location.lat)
            || !(-180.0..=180.0).contains(&self.location.lon)
        {
            return Err(FeedRecordError::CoordinateOutOfRange);
        }
        if !self.p_miss_cleaning.is_finite() {
            return Err(FeedRecordError::InvalidProbability);
        }
        if !self.forecast_volume_liters.is_finite() || self.forecast_volume_liters < 0.0 {
            return Err(FeedRecordError::InvalidVolume);
        }
        Ok(())
    }
}

/// Why a feed record was excluded from scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedRecordError {
    NonFiniteCoordinate,
    CoordinateOutOfRange,
    InvalidProbability,
    InvalidVolume,
}

impl fmt::Display for FeedRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FeedRecordError::NonFiniteCoordinate => "coordinate is NaN or infinite",
            FeedRecordError::CoordinateOutOfRange => "coordinate outside valid lat/lon range",
            FeedRecordError::InvalidProbability => "miss-cleaning probability is not a number",
            FeedRecordError::InvalidVolume => "forecast volume is negative or not a number",
        };
        f.write_str(msg)
    }
}

/// A roster entry: one inspector with a depot and a daily stop capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspector {
    pub id: InspectorId,
    pub name: String,
    pub depot: Coord,
    pub daily_capacity: usize,
}

impl Inspector {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        depot: Coord,
        daily_capacity: usize,
    ) -> Self {
        Self {
            id: InspectorId::new(id),
            name: name.into(),
            depot,
            daily_capacity,
        }
    }
}

/// Path geometry and traversal estimate between two consecutive stops.
///
/// Ephemeral: recomputed every run, never persisted across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    /// Ordered coordinates from origin to destination.
    pub geometry: Vec<Coord>,
    /// Estimated traversal time in seconds.
    pub duration_secs: i32,
    /// Segment length in km: provider-reported when live, straight-line
    /// when synthesized.
    pub distance_km: f64,
    /// True when the routing provider was unavailable and the geometry
    /// was synthesized locally (best-effort route).
    pub fallback: bool,
}

/// An outlet bound into a specific route.
///
/// Owned exclusively by the containing [`Route`]; never shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    pub outlet: Outlet,
    /// 1-based position in the day's visiting sequence.
    pub order: u32,
    pub priority: PriorityTier,
    /// Estimated arrival at the outlet.
    pub eta: NaiveTime,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    /// Travel time from the previous stop (or depot) in seconds.
    pub travel_secs: i32,
    /// On-site service time in seconds.
    pub service_secs: i32,
}

/// One inspector's ordered stop sequence for one calendar day.
///
/// `segments[i]` is the path from `stops[i]` to `stops[i + 1]`, so
/// `segments.len() == stops.len() - 1` (zero for single-stop routes).
/// The depot seeds the nearest-neighbor sequencing but carries no
/// resolved inbound segment; the first stop starts at the day-start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub inspector_id: InspectorId,
    pub inspector_name: String,
    pub date: NaiveDate,
    pub depot: Coord,
    pub stops: Vec<RouteStop>,
    pub segments: Vec<PathSegment>,
    pub total_distance_km: f64,
    pub total_duration_secs: i32,
}

impl Route {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// True when any segment fell back to synthesized geometry.
    pub fn is_best_effort(&self) -> bool {
        self.segments.iter().any(|segment| segment.fallback)
    }
}

/// A feed record excluded from scheduling, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedOutlet {
    pub id: OutletId,
    pub reason: FeedRecordError,
}

/// Schedule-wide stop counts per priority tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn record(&mut self, tier: PriorityTier) {
        match tier {
            PriorityTier::High => self.high += 1,
            PriorityTier::Medium => self.medium += 1,
            PriorityTier::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// The full route plan for a planning horizon.
///
/// Invariant: an outlet appears in at most one route across the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub run_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub routes: Vec<Route>,
    /// Malformed feed records excluded from scheduling.
    pub skipped: Vec<SkippedOutlet>,
    /// Valid outlets that did not fit within the horizon's capacity.
    pub deferred: Vec<OutletId>,
    pub priority_counts: PriorityCounts,
}

impl Schedule {
    pub fn total_stops(&self) -> usize {
        self.routes.iter().map(Route::stop_count).sum()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.routes.iter().map(|route| route.total_distance_km).sum()
    }
}
