//! Subway trip-planning engine.
//!
//! Answers "how do I get from A to B, and when does the next train come"
//! for a fixed-route corridor: a weighted graph built from static
//! timetable data, fuzzy station-name resolution, transfer-minimizing
//! trip planning, and a continuously refreshed store of live arrivals
//! and alerts.

pub mod config;
pub mod domain;
pub mod geography;
pub mod gtfs;
pub mod navigator;
pub mod planner;
pub mod realtime;
pub mod resolver;
pub mod topology;
