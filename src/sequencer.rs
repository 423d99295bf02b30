//! Stop sequencing for a single inspector/day.
//!
//! Priority tier is the primary ordering key (High before Medium before
//! Low); within a tier a nearest-neighbor heuristic picks the next stop
//! from the running position, starting at the depot. Greedy, O(n²), not
//! globally optimal, but deterministic: equal distances break ties by
//! ascending outlet id.

use std::cmp::Ordering;

use chrono::{NaiveTime, Timelike};

use crate::geo;
use crate::model::{Coord, Outlet};
use crate::risk::{classify, PriorityTier};

/// Fixed on-site service duration per stop, in seconds.
pub const DEFAULT_SERVICE_SECS: i32 = 30 * 60;

/// Inter-stop travel allowance used when no resolved estimate exists.
pub const DEFAULT_TRAVEL_SECS: i32 = 15 * 60;

/// Order a set of outlets into a visiting sequence.
///
/// Every input outlet appears exactly once in the output. Two calls with
/// the same depot and outlet set yield the same order.
pub fn sequence(depot: Coord, outlets: Vec<Outlet>) -> Vec<Outlet> {
    let mut by_tier: [Vec<Outlet>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for outlet in outlets {
        let slot = match classify(outlet.p_miss_cleaning) {
            PriorityTier::High => 0,
            PriorityTier::Medium => 1,
            PriorityTier::Low => 2,
        };
        by_tier[slot].push(outlet);
    }

    let mut ordered = Vec::new();
    let mut current = depot;
    for mut tier in by_tier {
        while !tier.is_empty() {
            let next = nearest_index(current, &tier);
            let outlet = tier.swap_remove(next);
            current = outlet.location;
            ordered.push(outlet);
        }
    }
    ordered
}

fn nearest_index(from: Coord, candidates: &[Outlet]) -> usize {
    let mut best = 0;
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        let best_dist = geo::haversine_km(from, candidates[best].location);
        let dist = geo::haversine_km(from, candidate.location);
        match dist.partial_cmp(&best_dist).unwrap_or(Ordering::Equal) {
            Ordering::Less => best = i,
            Ordering::Equal => {
                if candidate.id < candidates[best].id {
                    best = i;
                }
            }
            Ordering::Greater => {}
        }
    }
    best
}

/// Per-stop timing produced by window allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTiming {
    /// Estimated arrival (equals the window start).
    pub eta: NaiveTime,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub travel_secs: i32,
    pub service_secs: i32,
}

/// Allocate cumulative time windows along a sequenced route.
///
/// `travel_secs[i]` is the resolved travel time into stop `i`; the first
/// stop starts at `day_start`, so callers pass 0 at index 0. Pass
/// [`DEFAULT_TRAVEL_SECS`] entries when no better estimate exists. Each
/// later window begins when the previous stop's service ends plus travel.
pub fn allocate_windows(
    day_start: NaiveTime,
    travel_secs: &[i32],
    service_secs: i32,
) -> Vec<StopTiming> {
    let mut timings = Vec::with_capacity(travel_secs.len());
    let mut clock = day_start;
    for &travel in travel_secs {
        let eta = add_secs(clock, travel.max(0));
        let window_end = add_secs(eta, service_secs.max(0));
        timings.push(StopTiming {
            eta,
            window_start: eta,
            window_end,
            travel_secs: travel.max(0),
            service_secs: service_secs.max(0),
        });
        clock = window_end;
    }
    timings
}

/// Advance a clock time by `secs`, saturating at end of day.
fn add_secs(time: NaiveTime, secs: i32) -> NaiveTime {
    let total = time.num_seconds_from_midnight() as i64 + secs as i64;
    let clamped = total.clamp(0, 24 * 60 * 60 - 1) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(clamped, 0)
        .unwrap_or_else(|| NaiveTime::from_hms_opt(23, 59, 59).expect("valid time"))
}
