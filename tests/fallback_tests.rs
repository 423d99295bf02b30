//! Routing-provider degradation tests.
//!
//! Schedule generation must always complete: a failing provider degrades
//! every affected segment to synthesized geometry with a best-effort
//! flag, never to an error.

mod fixtures;

use chrono::NaiveDate;

use inspection_planner::export::ScheduleExport;
use inspection_planner::geo;
use inspection_planner::model::Outlet;
use inspection_planner::path::{PathResolver, SYNTH_STEPS};
use inspection_planner::schedule::{ScheduleBuilder, ScheduleConfig};

use fixtures::dubai_locations::{DEIRA_OUTLETS, DEPOT_DOWNTOWN};
use fixtures::{inspector, outlet, FailingProvider, FlakyProvider};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 7).expect("valid date")
}

fn deira_feed() -> Vec<Outlet> {
    DEIRA_OUTLETS
        .iter()
        .enumerate()
        .map(|(i, loc)| {
            outlet(&format!("DEI-{:02}", i))
                .location(loc.coord())
                .area(loc.area)
                .risk(0.2 + 0.15 * i as f64)
                .build()
        })
        .collect()
}

// ============================================================================
// Always-Failing Provider
// ============================================================================

#[test]
fn test_failing_provider_never_aborts_generation() {
    let roster = vec![inspector("INS-1", "Fatima", DEPOT_DOWNTOWN.coord(), 10)];
    let schedule = ScheduleBuilder::new(PathResolver::new(Box::new(FailingProvider)))
        .build(&deira_feed(), &roster, monday())
        .expect("generation must complete despite provider outage");

    assert_eq!(schedule.total_stops(), deira_feed().len());
}

#[test]
fn test_failing_provider_flags_every_segment() {
    let roster = vec![inspector("INS-1", "Fatima", DEPOT_DOWNTOWN.coord(), 10)];
    let schedule = ScheduleBuilder::new(PathResolver::new(Box::new(FailingProvider)))
        .build(&deira_feed(), &roster, monday())
        .expect("schedule");

    for route in &schedule.routes {
        assert!(route.is_best_effort());
        for segment in &route.segments {
            assert!(segment.fallback, "every segment should be flagged best-effort");
            assert_eq!(segment.geometry.len(), SYNTH_STEPS + 1);
            assert!(segment.duration_secs > 0, "duration must stay positive");
        }
    }
}

#[test]
fn test_fallback_duration_equals_straight_line_estimates() {
    let roster = vec![inspector("INS-1", "Fatima", DEPOT_DOWNTOWN.coord(), 10)];
    let config = ScheduleConfig::default();
    let service_secs = config.service_secs;
    let speed = config.fallback_speed_kmh;
    let schedule = ScheduleBuilder::new(PathResolver::new(Box::new(FailingProvider)))
        .with_config(config)
        .build(&deira_feed(), &roster, monday())
        .expect("schedule");

    for route in &schedule.routes {
        let mut expected_travel = 0;
        for pair in route.stops.windows(2) {
            let km = geo::haversine_km(pair[0].outlet.location, pair[1].outlet.location);
            expected_travel += geo::km_to_secs(km, speed).max(1);
        }
        let expected_total = expected_travel + route.stops.len() as i32 * service_secs;
        assert_eq!(route.total_duration_secs, expected_total);
    }
}

#[test]
fn test_fallback_distance_is_straight_line() {
    let roster = vec![inspector("INS-1", "Fatima", DEPOT_DOWNTOWN.coord(), 10)];
    let schedule = ScheduleBuilder::new(PathResolver::new(Box::new(FailingProvider)))
        .build(&deira_feed(), &roster, monday())
        .expect("schedule");

    for route in &schedule.routes {
        let mut expected_km = 0.0;
        for pair in route.stops.windows(2) {
            expected_km += geo::haversine_km(pair[0].outlet.location, pair[1].outlet.location);
        }
        assert!((route.total_distance_km - expected_km).abs() < 1e-6);
    }
}

// ============================================================================
// Intermittent Provider
// ============================================================================

#[test]
fn test_flaky_provider_mixes_live_and_fallback_segments() {
    let roster = vec![inspector("INS-1", "Fatima", DEPOT_DOWNTOWN.coord(), 10)];
    let schedule = ScheduleBuilder::new(PathResolver::new(Box::new(FlakyProvider::new(2))))
        .build(&deira_feed(), &roster, monday())
        .expect("schedule");

    let segments: Vec<bool> = schedule
        .routes
        .iter()
        .flat_map(|route| route.segments.iter().map(|segment| segment.fallback))
        .collect();
    assert!(segments.iter().any(|&fallback| fallback), "some segments fall back");
    assert!(segments.iter().any(|&fallback| !fallback), "some segments stay live");

    // Degraded or not, every segment stays usable.
    for route in &schedule.routes {
        for segment in &route.segments {
            assert!(segment.geometry.len() >= 2);
            assert!(segment.duration_secs > 0);
        }
    }
}

#[test]
fn test_best_effort_flag_survives_export() {
    let roster = vec![inspector("INS-1", "Fatima", DEPOT_DOWNTOWN.coord(), 10)];
    let schedule = ScheduleBuilder::new(PathResolver::new(Box::new(FailingProvider)))
        .build(&deira_feed(), &roster, monday())
        .expect("schedule");

    let export = ScheduleExport::from_schedule(&schedule);
    let json = serde_json::to_value(&export).expect("serialize");

    assert_eq!(json["routes"][0]["best_effort"], true);
    assert_eq!(json["routes"][0]["segments"][0]["fallback"], true);
}
