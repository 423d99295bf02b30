//! Real Dubai-area locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Grease-trap outlets cluster
//! in the food-service districts the original deployment covered.

use inspection_planner::model::Coord;

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub area: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, area: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, area, lat, lon }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }
}

/// Municipality depot near Downtown Dubai (good inspector start point).
pub const DEPOT_DOWNTOWN: Location =
    Location::new("Downtown Depot", "Downtown", 25.2048, 55.2708);

/// Secondary depot on the Jumeirah side.
pub const DEPOT_JUMEIRAH: Location =
    Location::new("Jumeirah Depot", "Jumeirah", 25.1124, 55.1390);

// ============================================================================
// Deira / old-town food-service cluster
// ============================================================================

pub const DEIRA_OUTLETS: &[Location] = &[
    Location::new("Al Rigga Grill", "Deira", 25.2644, 55.3217),
    Location::new("Naif Cafeteria", "Deira", 25.2741, 55.3095),
    Location::new("Gold Souk Canteen", "Deira", 25.2697, 55.2970),
    Location::new("Baniyas Kitchen", "Deira", 25.2631, 55.3117),
    Location::new("Port Saeed Diner", "Deira", 25.2489, 55.3322),
];

// ============================================================================
// Al Karama / Bur Dubai cluster
// ============================================================================

pub const KARAMA_OUTLETS: &[Location] = &[
    Location::new("Al Karama Cafeteria", "Al Karama", 25.2387, 55.3047),
    Location::new("Meena Bazaar Eatery", "Al Karama", 25.2625, 55.2886),
    Location::new("Oud Metha Restaurant", "Al Karama", 25.2315, 55.3151),
];

// ============================================================================
// Jumeirah / Marina cluster
// ============================================================================

pub const JUMEIRAH_OUTLETS: &[Location] = &[
    Location::new("Jumeirah Beach Cafe", "Jumeirah", 25.2012, 55.2385),
    Location::new("Umm Suqeim Kitchen", "Jumeirah", 25.1543, 55.2043),
    Location::new("Marina Walk Bistro", "Jumeirah", 25.0772, 55.1334),
];
