//! Topology construction from the static tables.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::config::NavigatorConfig;
use crate::domain::{RouteId, Stop, StopId, StopKind};
use crate::gtfs::{StaticTables, StopRecord};

use super::graph::{Edge, EdgeKind, Topology};

/// Error from topology construction. The only fatal condition in the
/// system: without a routable graph there is nothing to serve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("timetable produced no routable edges for the configured routes")]
    EmptyTimetable,
}

/// Builds the immutable route graph from the static tables.
pub struct TopologyBuilder;

impl TopologyBuilder {
    /// Build a topology scoped to the configured route whitelist.
    ///
    /// Track edges for the same ordered stop pair are merged: the route set
    /// is the union over all scheduled trips and the weight is the minimum
    /// observed travel time, since riders pick the fastest available trip.
    pub fn build(
        tables: &StaticTables,
        config: &NavigatorConfig,
    ) -> Result<Topology, TopologyError> {
        // Trips on whitelisted routes; everything else is out of scope.
        let route_of_trip: HashMap<&str, RouteId> = tables
            .trips
            .iter()
            .filter(|t| config.is_whitelisted(&t.route_id))
            .map(|t| (t.trip_id.as_str(), RouteId::new(t.route_id.as_str())))
            .collect();

        let mut by_trip: HashMap<&str, Vec<&crate::gtfs::StopTime>> = HashMap::new();
        for visit in &tables.stop_times {
            if route_of_trip.contains_key(visit.trip_id.as_str()) {
                by_trip
                    .entry(visit.trip_id.as_str())
                    .or_default()
                    .push(visit);
            }
        }

        // Merged track edges keyed by ordered stop pair. BTreeMap keeps node
        // interning order deterministic across builds.
        let mut tracks: BTreeMap<(String, String), (u32, BTreeSet<RouteId>)> = BTreeMap::new();
        for (trip_id, mut visits) in by_trip {
            visits.sort_by_key(|v| v.stop_sequence);
            let route = &route_of_trip[trip_id];
            for pair in visits.windows(2) {
                if pair[0].stop_id == pair[1].stop_id {
                    continue;
                }
                let weight = pair[1].arrival_secs.saturating_sub(pair[0].departure_secs);
                let entry = tracks
                    .entry((pair[0].stop_id.clone(), pair[1].stop_id.clone()))
                    .or_insert_with(|| (weight, BTreeSet::new()));
                entry.0 = entry.0.min(weight);
                entry.1.insert(route.clone());
            }
        }

        if tracks.is_empty() {
            return Err(TopologyError::EmptyTimetable);
        }

        let catalog: HashMap<&str, &StopRecord> = tables
            .stops
            .iter()
            .map(|s| (s.stop_id.as_str(), s))
            .collect();

        let mut stops: Vec<Stop> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut edges: Vec<(usize, usize, Edge)> = Vec::new();

        for ((from_id, to_id), (weight, routes)) in &tracks {
            let u = intern(from_id, &catalog, &mut stops, &mut index);
            let v = intern(to_id, &catalog, &mut stops, &mut index);
            edges.push((
                u,
                v,
                Edge {
                    kind: EdgeKind::Track,
                    weight_secs: *weight,
                    routes: routes.clone(),
                },
            ));
        }

        // Parent <-> platform structural links. Interned parents are
        // appended to `stops`, so iterate by index rather than by iterator.
        let mut linked: HashSet<(usize, usize)> = HashSet::new();
        let mut ix = 0;
        while ix < stops.len() {
            if let Some(parent_id) = stops[ix].parent_id.clone() {
                let parent = intern(parent_id.as_str(), &catalog, &mut stops, &mut index);
                if linked.insert((parent, ix)) {
                    edges.push((parent, ix, station_path()));
                    edges.push((ix, parent, station_path()));
                }
            }
            ix += 1;
        }

        // Declared transfers, one directed edge per row, only between stops
        // that made it into the graph.
        let mut seen_transfers: HashSet<(usize, usize)> = HashSet::new();
        for transfer in &tables.transfers {
            let (Some(&u), Some(&v)) = (
                index.get(transfer.from_stop_id.as_str()),
                index.get(transfer.to_stop_id.as_str()),
            ) else {
                continue;
            };
            if u == v || !seen_transfers.insert((u, v)) {
                continue;
            }
            edges.push((
                u,
                v,
                Edge {
                    kind: EdgeKind::Transfer,
                    weight_secs: transfer.min_transfer_time + config.transfer_penalty_secs,
                    routes: BTreeSet::new(),
                },
            ));
        }

        let mut adjacency: Vec<Vec<(usize, Edge)>> = vec![Vec::new(); stops.len()];
        let edge_count = edges.len();
        for (u, v, edge) in edges {
            adjacency[u].push((v, edge));
        }

        debug!(
            nodes = stops.len(),
            edges = edge_count,
            track_pairs = tracks.len(),
            "topology built"
        );

        Ok(Topology::new(stops, index, adjacency))
    }
}

fn station_path() -> Edge {
    Edge {
        kind: EdgeKind::StationPath,
        weight_secs: 0,
        routes: BTreeSet::new(),
    }
}

/// Add the stop to the node table if absent, returning its index.
///
/// Stops referenced by the timetable but missing from the catalog still
/// become nodes, named by their raw id.
fn intern(
    id: &str,
    catalog: &HashMap<&str, &StopRecord>,
    stops: &mut Vec<Stop>,
    index: &mut HashMap<String, usize>,
) -> usize {
    if let Some(&ix) = index.get(id) {
        return ix;
    }
    let stop = match catalog.get(id) {
        Some(record) => Stop {
            id: StopId::new(id),
            name: record.stop_name.clone(),
            kind: if record.location_type == "1" {
                StopKind::Parent
            } else {
                StopKind::Platform
            },
            parent_id: if record.parent_station.is_empty() {
                None
            } else {
                Some(StopId::new(record.parent_station.as_str()))
            },
        },
        None => Stop {
            id: StopId::new(id),
            name: id.to_string(),
            kind: StopKind::Platform,
            parent_id: None,
        },
    };
    let ix = stops.len();
    index.insert(id.to_string(), ix);
    stops.push(stop);
    ix
}
