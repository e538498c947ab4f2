//! Navigator configuration.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::domain::RouteId;

/// Configuration parameters for the navigator services.
#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Routes in service scope. Timetable data outside this set is dropped
    /// at topology construction time.
    pub route_whitelist: BTreeSet<RouteId>,

    /// Fixed penalty added to every declared transfer's walking time (seconds).
    /// Biases path selection away from unnecessary transfers.
    pub transfer_penalty_secs: u32,

    /// How far below the top fuzzy score a candidate may fall and still
    /// count as a plausible station match (points on the 0-100 scale).
    pub ambiguity_window: u8,

    /// Maximum candidates considered per station lookup.
    pub search_limit: usize,

    /// Minimum fuzzy score for a name to be considered a match at all.
    pub min_match_score: u8,

    /// Maximum upcoming arrivals returned per query.
    pub max_arrivals: usize,

    /// Maximum alert lines returned per query.
    pub max_alerts: usize,

    /// Alert description text longer than this is truncated.
    pub max_alert_description_len: usize,

    /// Ingestion loop cadence (seconds).
    pub poll_interval_secs: u64,

    /// Per-fetch timeout for one feed group (seconds).
    pub fetch_timeout_secs: u64,
}

impl NavigatorConfig {
    /// Replace the route whitelist.
    pub fn with_route_whitelist(mut self, routes: impl IntoIterator<Item = RouteId>) -> Self {
        self.route_whitelist = routes.into_iter().collect();
        self
    }

    /// Set the transfer penalty in seconds.
    pub fn with_transfer_penalty_secs(mut self, secs: u32) -> Self {
        self.transfer_penalty_secs = secs;
        self
    }

    /// Set the ingestion loop cadence in seconds.
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Set the per-fetch timeout in seconds.
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Whether the raw route id is in service scope.
    pub fn is_whitelisted(&self, route_id: &str) -> bool {
        self.route_whitelist.iter().any(|r| r.as_str() == route_id)
    }

    /// Returns the ingestion cadence as a Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Returns the per-fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            // Lexington Avenue corridor service scope.
            route_whitelist: ["4", "5", "6", "6X"].into_iter().map(RouteId::new).collect(),
            transfer_penalty_secs: 120, // 2 minutes
            ambiguity_window: 10,
            search_limit: 10,
            min_match_score: 60,
            max_arrivals: 5,
            max_alerts: 10,
            max_alert_description_len: 150,
            poll_interval_secs: 60,
            fetch_timeout_secs: 10,
        }
    }
}
