//! Test fixtures for inspection-planner.
//!
//! Provides realistic Dubai-area outlet locations plus builder-style
//! feed records and injectable routing providers.

#![allow(dead_code)]

pub mod dubai_locations;

use std::sync::atomic::{AtomicUsize, Ordering};

use inspection_planner::geo;
use inspection_planner::model::{Coord, Inspector, Outlet, OutletId};
use inspection_planner::path::{PathProvider, PathProviderError, ResolvedPath};

/// Builder for outlet feed records with sensible defaults.
#[derive(Clone, Debug)]
pub struct OutletFixture {
    id: String,
    name: String,
    area: String,
    location: Coord,
    p_miss_cleaning: f64,
    forecast_volume_liters: f64,
}

impl OutletFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Outlet {}", id),
            area: "Deira".to_string(),
            location: Coord::new(25.2048, 55.2708),
            p_miss_cleaning: 0.5,
            forecast_volume_liters: 800.0,
        }
    }

    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.location = Coord::new(lat, lon);
        self
    }

    pub fn location(mut self, location: Coord) -> Self {
        self.location = location;
        self
    }

    pub fn area(mut self, area: &str) -> Self {
        self.area = area.to_string();
        self
    }

    pub fn risk(mut self, p: f64) -> Self {
        self.p_miss_cleaning = p;
        self
    }

    pub fn volume(mut self, liters: f64) -> Self {
        self.forecast_volume_liters = liters;
        self
    }

    pub fn build(self) -> Outlet {
        Outlet {
            id: OutletId::new(self.id),
            name: self.name,
            area: self.area,
            location: self.location,
            p_miss_cleaning: self.p_miss_cleaning,
            forecast_volume_liters: self.forecast_volume_liters,
        }
    }
}

pub fn outlet(id: &str) -> OutletFixture {
    OutletFixture::new(id)
}

pub fn inspector(id: &str, name: &str, depot: Coord, capacity: usize) -> Inspector {
    Inspector::new(id, name, depot, capacity)
}

/// Provider that fails every call with an empty-route error.
pub struct FailingProvider;

impl PathProvider for FailingProvider {
    fn path_between(&self, _: Coord, _: Coord) -> Result<ResolvedPath, PathProviderError> {
        Err(PathProviderError::EmptyRoute)
    }
}

/// Provider that answers with a two-point geometry and a road-factor
/// duration, standing in for a healthy routing service.
pub struct StraightRoadProvider {
    pub speed_kmh: f64,
    pub road_factor: f64,
}

impl Default for StraightRoadProvider {
    fn default() -> Self {
        Self {
            speed_kmh: 50.0,
            road_factor: 1.3,
        }
    }
}

impl PathProvider for StraightRoadProvider {
    fn path_between(&self, from: Coord, to: Coord) -> Result<ResolvedPath, PathProviderError> {
        let road_km = geo::haversine_km(from, to) * self.road_factor;
        Ok(ResolvedPath {
            geometry: vec![from, to],
            duration_secs: geo::km_to_secs(road_km, self.speed_kmh).max(1),
            distance_km: road_km,
        })
    }
}

/// Provider that fails every `fail_every`-th call, for mixed live and
/// fallback segments in one schedule.
pub struct FlakyProvider {
    inner: StraightRoadProvider,
    fail_every: usize,
    calls: AtomicUsize,
}

impl FlakyProvider {
    pub fn new(fail_every: usize) -> Self {
        Self {
            inner: StraightRoadProvider::default(),
            fail_every,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PathProvider for FlakyProvider {
    fn path_between(&self, from: Coord, to: Coord) -> Result<ResolvedPath, PathProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call % self.fail_every == self.fail_every - 1 {
            Err(PathProviderError::EmptyRoute)
        } else {
            self.inner.path_between(from, to)
        }
    }
}
