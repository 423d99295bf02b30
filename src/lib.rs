//! inspection-planner core
//!
//! Turns a feed of risk-scored grease-trap outlets into a multi-day,
//! per-inspector route plan: ordered stops, time windows, ETAs and a
//! road-level path between consecutive stops, with graceful degradation
//! when the external routing provider is unavailable.

pub mod geo;
pub mod risk;
pub mod model;
pub mod sequencer;
pub mod path;
pub mod schedule;
pub mod export;
