//! Immutable route graph built from the static timetable.
//!
//! The graph is built once, scoped to the configured route whitelist, and
//! never mutated afterwards; refreshing topology means rebuilding the whole
//! store. Queries are read-only and safe for unlimited concurrent use.

mod builder;
mod graph;

pub use builder::{TopologyBuilder, TopologyError};
pub use graph::{Edge, EdgeKind, PathEdge, RoutePath, Topology};
