//! Domain identifier types for the subway network.
//!
//! These are the core vocabulary types shared by every layer: stop and
//! route identifiers plus the stop catalog entry. Identifiers are plain
//! string keys from the static timetable; the newtypes exist so the
//! compiler keeps stop ids and route ids from being mixed up.

mod stop;

pub use stop::{DirectionHint, RouteId, Stop, StopId, StopKind};
