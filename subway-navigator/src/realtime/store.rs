//! Shared realtime table with per-group atomic replace.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::RouteId;

use super::types::{AlertRecord, ArrivalRecord};

/// One feed group's rows for one refresh generation.
#[derive(Debug, Clone, Default)]
pub struct GroupSnapshot {
    pub arrivals: Vec<ArrivalRecord>,
    pub alerts: Vec<AlertRecord>,
}

/// Eventually-consistent store of predicted arrivals and active alerts.
///
/// The ingestion loop is the sole writer; queries are read-only and freely
/// concurrent. A replace swaps one group's snapshot under the write lock,
/// so a reader sees either the prior generation or the new one for that
/// group, never a partial set.
#[derive(Clone, Default)]
pub struct FeedStore {
    inner: Arc<RwLock<HashMap<String, GroupSnapshot>>>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace one group's rows.
    pub async fn replace(&self, group_id: &str, snapshot: GroupSnapshot) {
        let mut guard = self.inner.write().await;
        guard.insert(group_id.to_string(), snapshot);
    }

    /// Upcoming arrivals at stops matching an id prefix.
    ///
    /// Matching on a prefix lets a parent complex id (`"631"`) cover its
    /// directional platforms (`"631N"`, `"631S"`). Only arrivals strictly
    /// after `as_of` on whitelisted routes are returned, ascending by
    /// arrival time, at most `limit` rows.
    pub async fn next_arrivals(
        &self,
        stop_id_prefix: &str,
        route_whitelist: &BTreeSet<RouteId>,
        as_of: i64,
        limit: usize,
    ) -> Vec<(RouteId, i64)> {
        let guard = self.inner.read().await;
        let mut rows: Vec<(RouteId, i64)> = guard
            .values()
            .flat_map(|snapshot| snapshot.arrivals.iter())
            .filter(|a| {
                a.stop_id.as_str().starts_with(stop_id_prefix)
                    && a.arrival_time > as_of
                    && route_whitelist.contains(&a.route_id)
            })
            .map(|a| (a.route_id.clone(), a.arrival_time))
            .collect();

        rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        rows.truncate(limit);
        rows
    }

    /// All active alerts across every feed group, oldest first.
    pub async fn active_alerts(&self) -> Vec<AlertRecord> {
        let guard = self.inner.read().await;
        let mut alerts: Vec<AlertRecord> = guard
            .values()
            .flat_map(|snapshot| snapshot.alerts.iter().cloned())
            .collect();
        alerts.sort_by(|a, b| {
            a.observed_at
                .cmp(&b.observed_at)
                .then_with(|| a.alert_id.cmp(&b.alert_id))
        });
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;
    use crate::realtime::types::AlertEntities;

    fn whitelist() -> BTreeSet<RouteId> {
        ["4", "5", "6", "6X"].into_iter().map(RouteId::new).collect()
    }

    fn arrival(route: &str, stop: &str, time: i64) -> ArrivalRecord {
        ArrivalRecord {
            trip_id: format!("trip-{route}-{time}"),
            route_id: RouteId::new(route),
            stop_id: StopId::new(stop),
            arrival_time: time,
            departure_time: time + 30,
            observed_at: 0,
        }
    }

    fn alert(id: &str, header: &str, routes: &[&str]) -> AlertRecord {
        AlertRecord {
            alert_id: id.to_string(),
            header_text: header.to_string(),
            description_text: String::new(),
            entities: AlertEntities::from_route_ids(
                routes.iter().map(|r| RouteId::new(*r)).collect(),
            ),
            observed_at: 0,
        }
    }

    #[tokio::test]
    async fn arrivals_are_filtered_and_ordered() {
        let store = FeedStore::new();
        store
            .replace(
                "numbers",
                GroupSnapshot {
                    arrivals: vec![
                        arrival("6", "631N", 300),
                        arrival("4", "631N", 200),
                        arrival("5", "631S", 250),
                        arrival("4", "626N", 100), // other stop
                        arrival("7", "631N", 150), // not whitelisted
                        arrival("4", "631N", 50),  // already passed
                    ],
                    alerts: vec![],
                },
            )
            .await;

        let rows = store.next_arrivals("631", &whitelist(), 60, 10).await;

        let got: Vec<(&str, i64)> = rows.iter().map(|(r, t)| (r.as_str(), *t)).collect();
        // Prefix "631" covers both platforms; ascending by time.
        assert_eq!(got, vec![("4", 200), ("5", 250), ("6", 300)]);
    }

    #[tokio::test]
    async fn arrivals_respect_the_limit() {
        let store = FeedStore::new();
        store
            .replace(
                "numbers",
                GroupSnapshot {
                    arrivals: (1..=10).map(|i| arrival("6", "631N", i * 100)).collect(),
                    alerts: vec![],
                },
            )
            .await;

        let rows = store.next_arrivals("631", &whitelist(), 0, 5).await;
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].1, 100);
    }

    #[tokio::test]
    async fn as_of_beyond_all_arrivals_is_empty() {
        let store = FeedStore::new();
        store
            .replace(
                "numbers",
                GroupSnapshot {
                    arrivals: vec![arrival("6", "631N", 300)],
                    alerts: vec![],
                },
            )
            .await;

        assert!(store.next_arrivals("631", &whitelist(), 300, 5).await.is_empty());
        assert!(store.next_arrivals("631", &whitelist(), 9_999, 5).await.is_empty());
    }

    #[tokio::test]
    async fn replace_swaps_only_the_named_group() {
        let store = FeedStore::new();
        store
            .replace(
                "numbers",
                GroupSnapshot {
                    arrivals: vec![arrival("6", "631N", 300)],
                    alerts: vec![alert("n1", "Numbers alert", &["6"])],
                },
            )
            .await;
        store
            .replace(
                "ace",
                GroupSnapshot {
                    arrivals: vec![],
                    alerts: vec![alert("a1", "ACE alert", &[])],
                },
            )
            .await;

        // New generation for "numbers" only.
        store
            .replace(
                "numbers",
                GroupSnapshot {
                    arrivals: vec![arrival("4", "631N", 400)],
                    alerts: vec![],
                },
            )
            .await;

        let rows = store.next_arrivals("631", &whitelist(), 0, 10).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, RouteId::new("4"));

        // The other group's generation is untouched.
        let alerts = store.active_alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_id, "a1");
    }

    #[tokio::test]
    async fn alerts_aggregate_across_groups() {
        let store = FeedStore::new();
        store
            .replace(
                "numbers",
                GroupSnapshot {
                    arrivals: vec![],
                    alerts: vec![alert("n1", "Numbers", &["4"])],
                },
            )
            .await;
        store
            .replace(
                "ace",
                GroupSnapshot {
                    arrivals: vec![],
                    alerts: vec![alert("a1", "ACE", &["A"])],
                },
            )
            .await;

        let alerts = store.active_alerts().await;
        assert_eq!(alerts.len(), 2);
    }
}
