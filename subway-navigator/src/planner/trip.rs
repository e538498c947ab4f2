//! Trip planning over the route graph.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::config::NavigatorConfig;
use crate::domain::{RouteId, StopId};
use crate::geography::{Direction, Geography};
use crate::realtime::FeedStore;
use crate::resolver::{Resolution, StationIndex, StationMatch};
use crate::topology::{EdgeKind, RoutePath, Topology};

use super::report;

/// Plans trips between free-text endpoints.
///
/// Borrows the topology, resolver index, geography tables, realtime store,
/// and configuration; all state is owned elsewhere and the planner itself
/// is cheap to construct per request.
pub struct TripPlanner<'a> {
    topology: &'a Topology,
    index: &'a StationIndex,
    geography: &'a Geography,
    store: &'a FeedStore,
    config: &'a NavigatorConfig,
}

/// Accumulator for a contiguous run of track edges on one route set.
struct OpenLeg {
    from_name: String,
    to_name: String,
    routes: BTreeSet<RouteId>,
    duration_secs: u32,
    direction: Option<Direction>,
    stops: Vec<String>,
}

impl<'a> TripPlanner<'a> {
    pub fn new(
        topology: &'a Topology,
        index: &'a StationIndex,
        geography: &'a Geography,
        store: &'a FeedStore,
        config: &'a NavigatorConfig,
    ) -> Self {
        Self {
            topology,
            index,
            geography,
            store,
            config,
        }
    }

    /// Plan a trip, returning a formatted itinerary or a not-found /
    /// ambiguity report.
    ///
    /// `as_of` anchors every live-arrival lookup; downstream transfer
    /// countdowns are offset by the travel time accumulated to that point.
    pub async fn plan(&self, origin_text: &str, dest_text: &str, as_of: i64) -> String {
        let origins = match self.index.resolve(origin_text) {
            Resolution::NotFound => return format!("Could not find origin '{origin_text}'."),
            Resolution::Ambiguous(candidates) => {
                return ambiguity_message("origin", origin_text, &candidates);
            }
            Resolution::Resolved(matches) => matches,
        };
        let dests = match self.index.resolve(dest_text) {
            Resolution::NotFound => return format!("Could not find destination '{dest_text}'."),
            Resolution::Ambiguous(candidates) => {
                return ambiguity_message("destination", dest_text, &candidates);
            }
            Resolution::Resolved(matches) => matches,
        };

        // Sweep every resolved origin/destination pair. Fewer transfers
        // wins outright; total weight only breaks transfer ties, because
        // pure shortest-time happily picks brittle multi-seat routes for
        // marginal savings.
        let mut winner: Option<(RoutePath, &StationMatch, &StationMatch)> = None;
        for origin in &origins {
            for dest in &dests {
                let Some(path) = self.topology.shortest_path(&origin.stop_id, &dest.stop_id)
                else {
                    continue;
                };
                let better = match &winner {
                    None => true,
                    Some((best, _, _)) => {
                        (path.transfers, path.total_secs) < (best.transfers, best.total_secs)
                    }
                };
                if better {
                    winner = Some((path, origin, dest));
                }
            }
        }

        let Some((path, origin, dest)) = winner else {
            return format!("No route found between {origin_text} and {dest_text}.");
        };

        debug!(
            origin = %origin.stop_id,
            dest = %dest.stop_id,
            total_secs = path.total_secs,
            transfers = path.transfers,
            "itinerary selected"
        );

        self.render(&path, origin, dest, as_of).await
    }

    /// Walk the winning path edge by edge into human-readable steps.
    async fn render(
        &self,
        path: &RoutePath,
        origin: &StationMatch,
        dest: &StationMatch,
        as_of: i64,
    ) -> String {
        let mut steps: Vec<String> = Vec::new();
        let mut open: Option<OpenLeg> = None;
        let mut elapsed_secs: u32 = 0;
        let mut first_leg: Option<(StopId, Vec<RouteId>)> = None;
        let mut used_routes: BTreeSet<RouteId> = BTreeSet::new();

        for edge in &path.edges {
            elapsed_secs += edge.weight_secs;
            match edge.kind {
                // Structural housekeeping, invisible in the itinerary.
                EdgeKind::StationPath => continue,
                EdgeKind::Track => {
                    used_routes.extend(edge.routes.iter().cloned());
                    let from_name = self.stop_name(&edge.from);
                    let to_name = self.stop_name(&edge.to);

                    if let Some(leg) = open.as_mut() {
                        let common: BTreeSet<RouteId> =
                            leg.routes.intersection(&edge.routes).cloned().collect();
                        if !common.is_empty() {
                            // Same train: extend the leg.
                            leg.stops.push(leg.to_name.clone());
                            leg.to_name = to_name;
                            leg.duration_secs += edge.weight_secs;
                            leg.routes = common;
                            continue;
                        }
                    }

                    // A route break closes the current leg with an explicit
                    // change step, including a live countdown at the junction.
                    if let Some(closed) = open.take() {
                        let junction = closed.to_name.clone();
                        steps.push(self.flush_leg(closed));
                        let summary = self
                            .junction_summary(&edge.to, &edge.routes, as_of + i64::from(elapsed_secs))
                            .await;
                        steps.push(format!(
                            "Change at {junction} to {} train.{summary}",
                            report::routes_label(&edge.routes)
                        ));
                    }

                    let direction = self.geography.infer_direction(&edge.from, &from_name, &to_name);
                    if first_leg.is_none() {
                        first_leg = Some((edge.from.clone(), edge.routes.iter().cloned().collect()));
                    }
                    open = Some(OpenLeg {
                        from_name,
                        to_name,
                        routes: edge.routes.clone(),
                        duration_secs: edge.weight_secs,
                        direction,
                        stops: Vec::new(),
                    });
                }
                EdgeKind::Transfer => {
                    if let Some(closed) = open.take() {
                        steps.push(self.flush_leg(closed));
                    }
                    steps.push(format!(
                        "Transfer at {} -> {} (~{}s)",
                        self.stop_name(&edge.from),
                        self.stop_name(&edge.to),
                        edge.weight_secs
                    ));
                }
            }
        }
        if let Some(closed) = open.take() {
            steps.push(self.flush_leg(closed));
        }

        let mut output = format!(
            "Route from {} to {}:\nTotal Duration: {} min.\n",
            origin.matched_name,
            dest.matched_name,
            path.total_secs / 60
        );

        if let Some((stop_id, routes)) = &first_leg {
            let arrivals = self
                .store
                .next_arrivals(
                    stop_id.as_str(),
                    &self.config.route_whitelist,
                    as_of,
                    self.config.max_arrivals,
                )
                .await;
            let text = report::arrivals_report(
                &arrivals,
                Some(routes.as_slice()),
                as_of,
                &self.no_data_message(),
            );
            output.push_str(&format!("\nNEXT TRAIN ARRIVAL:\n{text}\n"));
        }

        output.push_str("\nSTEPS:\n");
        output.push_str(&steps.join("\n"));
        output.push_str(&self.alert_block(&used_routes).await);
        output
    }

    /// Alert summary for every route the itinerary uses, or an explicit
    /// all-clear line.
    async fn alert_block(&self, used_routes: &BTreeSet<RouteId>) -> String {
        if used_routes.is_empty() {
            return String::new();
        }

        let alerts = self.store.active_alerts().await;
        let mut lines: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for route in used_routes {
            for line in report::alert_lines(
                &alerts,
                &self.config.route_whitelist,
                Some(route),
                self.config.max_alert_description_len,
            ) {
                if seen.insert(line.clone()) {
                    lines.push(line);
                }
            }
        }
        lines.truncate(self.config.max_alerts);

        if lines.is_empty() {
            return "\n\n✓ No active alerts - Normal service on all your trains".to_string();
        }

        const BAR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
        format!(
            "\n\n{BAR}\nSERVICE ALERTS & DELAYS:\n{BAR}\n{}\n\nPlease allow extra travel time for your journey.",
            lines.join("\n")
        )
    }

    /// Live-arrival summary for the new routes at a junction stop.
    ///
    /// Queried at the junction platform the new track edge runs to, with
    /// `as_of` already offset by accumulated travel time, so the listed
    /// trains are ones the rider can actually catch.
    async fn junction_summary(
        &self,
        stop: &StopId,
        routes: &BTreeSet<RouteId>,
        as_of: i64,
    ) -> String {
        let filter: Vec<RouteId> = routes.iter().cloned().collect();
        let arrivals = self
            .store
            .next_arrivals(
                stop.as_str(),
                &self.config.route_whitelist,
                as_of,
                self.config.max_arrivals,
            )
            .await;
        let text = report::arrivals_report(&arrivals, Some(&filter), as_of, &self.no_data_message());
        if text.starts_with("No live") || text.starts_with("No trains") {
            return String::new();
        }
        let lines: Vec<&str> = text.lines().take(2).collect();
        format!(" {}", lines.join("; "))
    }

    fn flush_leg(&self, leg: OpenLeg) -> String {
        let routes_str = leg
            .routes
            .iter()
            .map(|r| r.display_name())
            .collect::<Vec<_>>()
            .join(", ");

        let terminal = match (leg.direction, leg.routes.iter().next()) {
            (Some(direction), Some(route)) => {
                self.geography.terminal(route, direction).map(str::to_string)
            }
            _ => None,
        };
        let dir_str = match (leg.direction, terminal) {
            (Some(direction), Some(terminal)) => format!(" {} to {terminal}", direction.label()),
            (Some(direction), None) => format!(" {}", direction.label()),
            (None, _) => String::new(),
        };

        let stops_str = if leg.stops.is_empty() {
            String::new()
        } else if leg.stops.len() <= 5 {
            format!(" (passing {})", leg.stops.join(", "))
        } else {
            format!(" ({} stops)", leg.stops.len())
        };

        format!(
            "Take the {routes_str} train{dir_str} from {} to {}{stops_str}. Duration: {} min.",
            leg.from_name,
            leg.to_name,
            leg.duration_secs / 60
        )
    }

    fn no_data_message(&self) -> String {
        format!(
            "No live arrival data found for routes {}.",
            report::routes_label(&self.config.route_whitelist)
        )
    }

    fn stop_name(&self, id: &StopId) -> String {
        self.topology
            .stop(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.as_str().to_string())
    }
}

fn ambiguity_message(role: &str, query: &str, candidates: &[StationMatch]) -> String {
    let options = candidates
        .iter()
        .map(|c| format!("{} ({})", c.matched_name, c.stop_id))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Ambiguous {role} '{query}'. Did you mean: {options}?")
}
