//! Schedule building: bucketing, sequencing and route assembly.
//!
//! One invocation turns a validated outlet feed plus an inspector roster
//! into a full [`Schedule`] for the planning horizon. Outlets group by
//! area, then fill inspector/day slots in priority order until each day's
//! capacity is reached; overflow rolls to the next day, and outlets that
//! do not fit in the horizon are reported as deferred rather than failing
//! the run. Independent routes resolve their paths in parallel; within a
//! route, segment resolution stays sequential because each segment's
//! duration feeds the next stop's window.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{Days, NaiveDate, NaiveTime};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::{
    Inspector, Outlet, OutletId, PriorityCounts, Route, RouteStop, Schedule, SkippedOutlet,
};
use crate::path::PathResolver;
use crate::risk::{classify, PriorityTier};
use crate::sequencer;

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Departure time from the depot.
    pub day_start: NaiveTime,
    /// On-site service duration per stop, in seconds.
    pub service_secs: i32,
    /// Planning horizon length in days.
    pub horizon_days: u32,
    /// Speed assumption for synthesized travel-time estimates.
    pub fallback_speed_kmh: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
            service_secs: sequencer::DEFAULT_SERVICE_SECS,
            horizon_days: 28,
            fallback_speed_kmh: crate::geo::DEFAULT_SPEED_KMH,
        }
    }
}

/// Hard failures of schedule generation.
///
/// Provider outages and capacity overflow are not here: both degrade
/// into the schedule itself (best-effort segments, deferred outlets).
#[derive(Debug)]
pub enum ScheduleError {
    /// No valid outlet records in the feed.
    EmptyFeed,
    /// An outlet was assigned more than once; a bucketing defect, not a
    /// recoverable runtime condition.
    InvariantViolation(OutletId),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::EmptyFeed => f.write_str("outlet feed contains no valid records"),
            ScheduleError::InvariantViolation(id) => {
                write!(f, "outlet {} assigned to more than one route", id)
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

/// One inspector/day slot awaiting route assembly.
struct Bucket {
    inspector: Inspector,
    date: NaiveDate,
    outlets: Vec<Outlet>,
}

pub struct ScheduleBuilder {
    config: ScheduleConfig,
    resolver: PathResolver,
}

impl ScheduleBuilder {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            config: ScheduleConfig::default(),
            resolver,
        }
    }

    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.resolver = self.resolver.with_speed(config.fallback_speed_kmh);
        self.config = config;
        self
    }

    /// Build the schedule for the horizon starting at `period_start`.
    ///
    /// Always completes unless the feed has no valid outlets: malformed
    /// records are skipped and counted, overflow outlets are deferred,
    /// and provider failures degrade to best-effort segments.
    pub fn build(
        &self,
        feed: &[Outlet],
        roster: &[Inspector],
        period_start: NaiveDate,
    ) -> Result<Schedule, ScheduleError> {
        let (valid, skipped) = self.validate_feed(feed);
        if valid.is_empty() {
            return Err(ScheduleError::EmptyFeed);
        }

        let queue = self.assignment_queue(valid);
        let (buckets, deferred) = self.fill_buckets(queue, roster, period_start);

        let routes: Vec<Route> = buckets
            .par_iter()
            .map(|bucket| self.build_route(bucket))
            .collect();

        check_no_double_booking(&routes)?;

        let mut priority_counts = PriorityCounts::default();
        for route in &routes {
            for stop in &route.stops {
                priority_counts.record(stop.priority);
            }
        }

        let period_end = period_start
            .checked_add_days(Days::new(self.config.horizon_days.saturating_sub(1) as u64))
            .unwrap_or(period_start);

        let schedule = Schedule {
            run_id: Uuid::new_v4(),
            period_start,
            period_end,
            routes,
            skipped,
            deferred,
            priority_counts,
        };

        info!(
            run_id = %schedule.run_id,
            routes = schedule.routes.len(),
            stops = schedule.total_stops(),
            skipped = schedule.skipped.len(),
            deferred = schedule.deferred.len(),
            "schedule generated"
        );

        Ok(schedule)
    }

    /// Split the feed into valid records and counted skips, deduplicated
    /// by outlet id (first occurrence wins).
    fn validate_feed(&self, feed: &[Outlet]) -> (Vec<Outlet>, Vec<SkippedOutlet>) {
        let mut valid = Vec::with_capacity(feed.len());
        let mut skipped = Vec::new();
        let mut seen: HashSet<OutletId> = HashSet::new();

        for outlet in feed {
            if let Err(reason) = outlet.validate() {
                warn!(outlet = %outlet.id, %reason, "skipping malformed feed record");
                skipped.push(SkippedOutlet {
                    id: outlet.id.clone(),
                    reason,
                });
                continue;
            }
            if seen.insert(outlet.id.clone()) {
                valid.push(outlet.clone());
            }
        }

        (valid, skipped)
    }

    /// Order outlets for slot filling: tier-major, then area (sorted by
    /// label to keep one day's stops geographically cohesive), then
    /// descending risk, then id.
    fn assignment_queue(&self, outlets: Vec<Outlet>) -> Vec<Outlet> {
        let mut by_area: BTreeMap<String, Vec<Outlet>> = BTreeMap::new();
        for outlet in outlets {
            by_area.entry(outlet.area.clone()).or_default().push(outlet);
        }

        let mut queue = Vec::new();
        for tier in [PriorityTier::High, PriorityTier::Medium, PriorityTier::Low] {
            for area_outlets in by_area.values() {
                let mut of_tier: Vec<&Outlet> = area_outlets
                    .iter()
                    .filter(|outlet| classify(outlet.p_miss_cleaning) == tier)
                    .collect();
                of_tier.sort_by(|a, b| {
                    b.p_miss_cleaning
                        .partial_cmp(&a.p_miss_cleaning)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.id.cmp(&b.id))
                });
                queue.extend(of_tier.into_iter().cloned());
            }
        }
        queue
    }

    /// Distribute the ordered queue into inspector/day slots. Days ascend
    /// through the horizon, inspectors in roster order; each slot takes up
    /// to the inspector's daily capacity. Leftovers become deferred.
    fn fill_buckets(
        &self,
        mut queue: Vec<Outlet>,
        roster: &[Inspector],
        period_start: NaiveDate,
    ) -> (Vec<Bucket>, Vec<OutletId>) {
        let mut buckets = Vec::new();
        queue.reverse(); // pop from the front via Vec::pop

        'days: for day in 0..self.config.horizon_days {
            let Some(date) = period_start.checked_add_days(Days::new(day as u64)) else {
                break;
            };
            for inspector in roster {
                if queue.is_empty() {
                    break 'days;
                }
                let take = inspector.daily_capacity.min(queue.len());
                if take == 0 {
                    continue;
                }
                let mut outlets = Vec::with_capacity(take);
                for _ in 0..take {
                    if let Some(outlet) = queue.pop() {
                        outlets.push(outlet);
                    }
                }
                debug!(
                    inspector = %inspector.id,
                    %date,
                    stops = outlets.len(),
                    "bucket filled"
                );
                buckets.push(Bucket {
                    inspector: inspector.clone(),
                    date,
                    outlets,
                });
            }
        }

        queue.reverse();
        let deferred: Vec<OutletId> = queue.into_iter().map(|outlet| outlet.id).collect();
        if !deferred.is_empty() {
            warn!(
                deferred = deferred.len(),
                horizon_days = self.config.horizon_days,
                "outlets exceed horizon capacity, deferring"
            );
        }
        (buckets, deferred)
    }

    /// Assemble one route: sequence the stops, resolve each consecutive
    /// segment in order, then allocate windows from the resolved travel
    /// times.
    fn build_route(&self, bucket: &Bucket) -> Route {
        let ordered = sequencer::sequence(bucket.inspector.depot, bucket.outlets.clone());

        // Strictly ordered: segment i's duration feeds stop i+1's window.
        let mut segments = Vec::with_capacity(ordered.len().saturating_sub(1));
        for pair in ordered.windows(2) {
            segments.push(self.resolver.resolve(pair[0].location, pair[1].location));
        }

        // The first stop starts at day-start; travel[i] is the inbound
        // time of stop i, so it is zero for stop 0.
        let mut travel: Vec<i32> = Vec::with_capacity(ordered.len());
        if !ordered.is_empty() {
            travel.push(0);
            travel.extend(segments.iter().map(|segment| segment.duration_secs));
        }
        let timings = sequencer::allocate_windows(self.config.day_start, &travel, self.config.service_secs);

        let stops: Vec<RouteStop> = ordered
            .into_iter()
            .zip(&timings)
            .enumerate()
            .map(|(i, (outlet, timing))| RouteStop {
                priority: classify(outlet.p_miss_cleaning),
                outlet,
                order: (i + 1) as u32,
                eta: timing.eta,
                window_start: timing.window_start,
                window_end: timing.window_end,
                travel_secs: timing.travel_secs,
                service_secs: timing.service_secs,
            })
            .collect();

        let total_distance_km = segments.iter().map(|segment| segment.distance_km).sum();
        let total_duration_secs = segments
            .iter()
            .map(|segment| segment.duration_secs)
            .sum::<i32>()
            + stops.len() as i32 * self.config.service_secs;

        Route {
            inspector_id: bucket.inspector.id.clone(),
            inspector_name: bucket.inspector.name.clone(),
            date: bucket.date,
            depot: bucket.inspector.depot,
            stops,
            segments,
            total_distance_km,
            total_duration_secs,
        }
    }
}

/// Guard the no-double-booking invariant. A violation is a bucketing
/// defect; it is reported as a fatal error rather than a panic because
/// the builder is a library entry point.
fn check_no_double_booking(routes: &[Route]) -> Result<(), ScheduleError> {
    let mut seen: HashSet<&OutletId> = HashSet::new();
    for route in routes {
        for stop in &route.stops {
            if !seen.insert(&stop.outlet.id) {
                debug_assert!(false, "outlet {} double-booked", stop.outlet.id);
                return Err(ScheduleError::InvariantViolation(stop.outlet.id.clone()));
            }
        }
    }
    Ok(())
}
