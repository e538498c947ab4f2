//! Realtime record types.

use crate::domain::{RouteId, StopId};

/// One predicted stop-level arrival from a trip update.
///
/// Ephemeral: the whole table for a feed group is replaced, not patched,
/// on each ingestion cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub trip_id: String,
    pub route_id: RouteId,
    pub stop_id: StopId,
    /// Unix seconds.
    pub arrival_time: i64,
    /// Unix seconds; zero when the feed gives no departure prediction.
    pub departure_time: i64,
    /// Feed header timestamp, unix seconds.
    pub observed_at: i64,
}

/// Which entities an alert applies to, normalized at ingestion time so
/// downstream code never re-inspects raw payload shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEntities {
    /// No route named: the alert applies system-wide.
    NoEntities,
    /// The alert names specific routes.
    Routes(Vec<RouteId>),
}

impl AlertEntities {
    pub fn from_route_ids(routes: Vec<RouteId>) -> Self {
        if routes.is_empty() {
            AlertEntities::NoEntities
        } else {
            AlertEntities::Routes(routes)
        }
    }

    pub fn is_system_wide(&self) -> bool {
        matches!(self, AlertEntities::NoEntities)
    }

    /// The named routes; empty for a system-wide alert.
    pub fn routes(&self) -> &[RouteId] {
        match self {
            AlertEntities::NoEntities => &[],
            AlertEntities::Routes(routes) => routes,
        }
    }
}

/// One active service alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    pub alert_id: String,
    pub header_text: String,
    pub description_text: String,
    pub entities: AlertEntities,
    /// Feed header timestamp, unix seconds.
    pub observed_at: i64,
}
