//! The external query surface.
//!
//! Three operations, each pure request/response, returning formatted text
//! for a conversational front end to narrate: plan a trip, list the next
//! arrivals at a station, and list active alerts. No query mutates shared
//! state, so concurrent invocation is unrestricted.

use std::sync::Arc;

use chrono::Utc;

use crate::config::NavigatorConfig;
use crate::domain::RouteId;
use crate::geography::Geography;
use crate::planner::TripPlanner;
use crate::planner::report;
use crate::realtime::FeedStore;
use crate::resolver::{Resolution, StationIndex};
use crate::topology::Topology;

/// Owns the query-path services and exposes the three operations.
pub struct Navigator {
    topology: Arc<Topology>,
    index: StationIndex,
    geography: Geography,
    store: FeedStore,
    config: NavigatorConfig,
}

impl Navigator {
    /// Wire the services together. The topology must be fully built before
    /// the navigator exists; queries never observe partial construction.
    pub fn new(
        topology: Topology,
        geography: Geography,
        store: FeedStore,
        config: NavigatorConfig,
    ) -> Self {
        let index = StationIndex::new(&topology, &config);
        Self {
            topology: Arc::new(topology),
            index,
            geography,
            store,
            config,
        }
    }

    /// Plan a trip between two free-text endpoints, anchored at now.
    pub async fn plan_trip(&self, origin: &str, dest: &str) -> String {
        self.plan_trip_at(origin, dest, Utc::now().timestamp()).await
    }

    /// Plan a trip with an explicit reference time for live lookups.
    pub async fn plan_trip_at(&self, origin: &str, dest: &str, as_of: i64) -> String {
        TripPlanner::new(
            &self.topology,
            &self.index,
            &self.geography,
            &self.store,
            &self.config,
        )
        .plan(origin, dest, as_of)
        .await
    }

    /// Upcoming arrivals at a station given as free text or a raw stop id.
    ///
    /// A short input containing a digit is taken as a raw stop id verbatim;
    /// anything else goes through the full resolution protocol. The route
    /// filter is applied to the returned rows, so an empty filtered result
    /// is reported distinctly from having no live data at all.
    pub async fn next_trains(
        &self,
        station: &str,
        route_filter: Option<&[RouteId]>,
        as_of: Option<i64>,
    ) -> String {
        let as_of = as_of.unwrap_or_else(|| Utc::now().timestamp());

        let stop_id = if looks_like_stop_id(station) {
            station.to_string()
        } else {
            match self.index.resolve(station) {
                Resolution::NotFound => return format!("Station '{station}' not found."),
                Resolution::Ambiguous(candidates) => {
                    let options = candidates
                        .iter()
                        .map(|c| format!("{} ({})", c.matched_name, c.stop_id))
                        .collect::<Vec<_>>()
                        .join(", ");
                    return format!("Ambiguous station '{station}'. Did you mean: {options}?");
                }
                Resolution::Resolved(matches) => match matches.first() {
                    Some(station_match) => station_match.stop_id.as_str().to_string(),
                    None => return format!("Station '{station}' not found."),
                },
            }
        };

        let arrivals = self
            .store
            .next_arrivals(
                &stop_id,
                &self.config.route_whitelist,
                as_of,
                self.config.max_arrivals,
            )
            .await;

        report::arrivals_report(&arrivals, route_filter, as_of, &self.no_data_message())
    }

    /// Active alerts, optionally restricted to one route.
    pub async fn alerts(&self, route_filter: Option<&RouteId>) -> String {
        let alerts = self.store.active_alerts().await;
        let mut lines = report::alert_lines(
            &alerts,
            &self.config.route_whitelist,
            route_filter,
            self.config.max_alert_description_len,
        );
        lines.truncate(self.config.max_alerts);

        if lines.is_empty() {
            return match route_filter {
                Some(route) => format!("No active alerts for the {} train.", route.display_name()),
                None => format!(
                    "No active service alerts for routes {}.",
                    report::routes_label(&self.config.route_whitelist)
                ),
            };
        }

        lines.join("\n")
    }

    fn no_data_message(&self) -> String {
        format!(
            "No live arrival data found for routes {}.",
            report::routes_label(&self.config.route_whitelist)
        )
    }
}

/// Heuristic for raw stop ids: short and containing a digit (`"631N"`).
fn looks_like_stop_id(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit()) && text.len() < 6
}
