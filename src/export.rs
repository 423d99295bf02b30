//! Export boundary: serializable schedule tree, iCalendar and CSV.
//!
//! Format shaping lives here, at the boundary, so the core types stay
//! free of presentation concerns.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::model::{PathSegment, Route, RouteStop, Schedule};
use crate::risk::PriorityTier;

/// Serializable schedule for UI and API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleExport {
    pub run_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub routes: Vec<RouteExport>,
    pub skipped_outlets: usize,
    pub deferred_outlets: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteExport {
    pub date: NaiveDate,
    pub inspector_id: String,
    pub inspector_name: String,
    pub stop_count: usize,
    pub total_distance_km: f64,
    pub total_duration_secs: i32,
    pub best_effort: bool,
    pub stops: Vec<StopExport>,
    pub segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopExport {
    pub outlet_id: String,
    pub outlet_name: String,
    pub area: String,
    pub order: u32,
    pub priority: PriorityTier,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub eta: NaiveTime,
    pub travel_secs: i32,
    /// Index of the stop's inbound segment in the route's `segments`;
    /// `None` for the first stop, which has no inbound segment.
    pub geometry_reference: Option<usize>,
}

impl ScheduleExport {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            run_id: schedule.run_id,
            period_start: schedule.period_start,
            period_end: schedule.period_end,
            routes: schedule.routes.iter().map(RouteExport::from_route).collect(),
            skipped_outlets: schedule.skipped.len(),
            deferred_outlets: schedule.deferred.len(),
        }
    }
}

impl RouteExport {
    fn from_route(route: &Route) -> Self {
        Self {
            date: route.date,
            inspector_id: route.inspector_id.0.clone(),
            inspector_name: route.inspector_name.clone(),
            stop_count: route.stop_count(),
            total_distance_km: route.total_distance_km,
            total_duration_secs: route.total_duration_secs,
            best_effort: route.is_best_effort(),
            stops: route
                .stops
                .iter()
                .enumerate()
                .map(|(i, stop)| StopExport::from_stop(stop, i.checked_sub(1)))
                .collect(),
            segments: route.segments.clone(),
        }
    }
}

impl StopExport {
    fn from_stop(stop: &RouteStop, segment_index: Option<usize>) -> Self {
        Self {
            outlet_id: stop.outlet.id.0.clone(),
            outlet_name: stop.outlet.name.clone(),
            area: stop.outlet.area.clone(),
            order: stop.order,
            priority: stop.priority,
            window_start: stop.window_start,
            window_end: stop.window_end,
            eta: stop.eta,
            travel_secs: stop.travel_secs,
            geometry_reference: segment_index,
        }
    }
}

/// Render the schedule as an iCalendar document: one VEVENT per stop,
/// UID derived from the outlet id and date.
pub fn to_ics(schedule: &Schedule) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, "PRODID:-//inspection-planner//EN");

    for route in &schedule.routes {
        for stop in &route.stops {
            let date = route.date.format("%Y%m%d");
            push_line(&mut out, "BEGIN:VEVENT");
            push_line(
                &mut out,
                &format!("UID:{}-{}@inspection-planner", stop.outlet.id, date),
            );
            push_line(
                &mut out,
                &format!("DTSTART:{}T{}", date, stop.window_start.format("%H%M%S")),
            );
            push_line(
                &mut out,
                &format!("DTEND:{}T{}", date, stop.window_end.format("%H%M%S")),
            );
            push_line(
                &mut out,
                &format!(
                    "SUMMARY:Inspection {} ({})",
                    ics_escape(&stop.outlet.name),
                    stop.priority.as_str()
                ),
            );
            push_line(&mut out, &format!("LOCATION:{}", ics_escape(&stop.outlet.area)));
            push_line(
                &mut out,
                &format!("DESCRIPTION:Inspector {}\\, stop {}", ics_escape(&route.inspector_name), stop.order),
            );
            push_line(&mut out, "END:VEVENT");
        }
    }

    push_line(&mut out, "END:VCALENDAR");
    out
}

/// Render the schedule as CSV, one row per stop.
pub fn to_csv(schedule: &Schedule) -> String {
    let mut out = String::new();
    out.push_str(
        "date,inspector_id,inspector_name,order,outlet_id,outlet_name,area,priority,window_start,window_end,eta,travel_minutes\n",
    );
    for route in &schedule.routes {
        for stop in &route.stops {
            let row = [
                route.date.format("%Y-%m-%d").to_string(),
                csv_field(&route.inspector_id.0),
                csv_field(&route.inspector_name),
                stop.order.to_string(),
                csv_field(&stop.outlet.id.0),
                csv_field(&stop.outlet.name),
                csv_field(&stop.outlet.area),
                stop.priority.as_str().to_string(),
                stop.window_start.format("%H:%M").to_string(),
                stop.window_end.format("%H:%M").to_string(),
                stop.eta.format("%H:%M").to_string(),
                (stop.travel_secs / 60).to_string(),
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str("\r\n");
}

fn ics_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
