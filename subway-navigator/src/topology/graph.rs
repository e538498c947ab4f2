//! Graph representation and shortest-path search.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use crate::domain::{RouteId, Stop, StopId};

/// What a directed edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Riding a train between two consecutive stops.
    Track,
    /// A declared walking connection between platforms.
    Transfer,
    /// Zero-weight structural link between a complex and one of its
    /// platforms. Never represents real travel.
    StationPath,
}

/// A directed edge of the route graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub weight_secs: u32,
    /// Routes traversing this exact stop pair. Non-empty iff `Track`.
    pub routes: BTreeSet<RouteId>,
}

/// One traversed edge of a computed path, with endpoints spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEdge {
    pub from: StopId,
    pub to: StopId,
    pub kind: EdgeKind,
    pub weight_secs: u32,
    pub routes: BTreeSet<RouteId>,
}

/// The result of a shortest-path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
    /// Edges in traversal order, source to target.
    pub edges: Vec<PathEdge>,
    /// Sum of all edge weights along the path, in seconds.
    pub total_secs: u32,
    /// Number of `Transfer`-kind edges traversed.
    pub transfers: usize,
}

impl RoutePath {
    /// Stop ids visited in order, including source and target.
    pub fn stops(&self) -> Vec<&StopId> {
        let mut out = Vec::with_capacity(self.edges.len() + 1);
        if let Some(first) = self.edges.first() {
            out.push(&first.from);
        }
        out.extend(self.edges.iter().map(|e| &e.to));
        out
    }
}

/// Immutable weighted graph over the stop catalog.
#[derive(Debug, Clone)]
pub struct Topology {
    stops: Vec<Stop>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<(usize, Edge)>>,
}

impl Topology {
    pub(crate) fn new(
        stops: Vec<Stop>,
        index: HashMap<String, usize>,
        adjacency: Vec<Vec<(usize, Edge)>>,
    ) -> Self {
        Self {
            stops,
            index,
            adjacency,
        }
    }

    /// Look up a stop by id.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.index.get(id.as_str()).map(|&ix| &self.stops[ix])
    }

    /// Iterate over all stops in the graph.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    /// Number of graph nodes.
    pub fn node_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// The lightest edge from `from` to `to`, if any.
    pub fn edge_between(&self, from: &StopId, to: &StopId) -> Option<&Edge> {
        let u = *self.index.get(from.as_str())?;
        let v = *self.index.get(to.as_str())?;
        self.adjacency[u]
            .iter()
            .filter(|(next, _)| *next == v)
            .map(|(_, edge)| edge)
            .min_by_key(|edge| edge.weight_secs)
    }

    /// Minimum-weight path from `from` to `to`.
    ///
    /// Returns `None` for unknown ids or disconnected pairs; the absence of
    /// a path is a normal outcome, not an error.
    pub fn shortest_path(&self, from: &StopId, to: &StopId) -> Option<RoutePath> {
        let source = *self.index.get(from.as_str())?;
        let target = *self.index.get(to.as_str())?;

        if source == target {
            return Some(RoutePath {
                edges: Vec::new(),
                total_secs: 0,
                transfers: 0,
            });
        }

        let n = self.stops.len();
        let mut dist = vec![u32::MAX; n];
        // prev[v] = (node we came from, index of the edge taken in its
        // adjacency list), for path reconstruction.
        let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
        dist[source] = 0;

        // Min-heap via Reverse; the node index is a deterministic tie-break.
        let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
        heap.push(Reverse((0, source)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == target {
                return Some(self.reconstruct(source, target, cost, &prev));
            }
            if cost > dist[node] {
                continue; // stale heap entry
            }
            for (adj_ix, (next, edge)) in self.adjacency[node].iter().enumerate() {
                let candidate = cost.saturating_add(edge.weight_secs);
                if candidate < dist[*next] {
                    dist[*next] = candidate;
                    prev[*next] = Some((node, adj_ix));
                    heap.push(Reverse((candidate, *next)));
                }
            }
        }

        None
    }

    fn reconstruct(
        &self,
        source: usize,
        target: usize,
        total_secs: u32,
        prev: &[Option<(usize, usize)>],
    ) -> RoutePath {
        let mut edges = Vec::new();
        let mut current = target;
        while current != source {
            let Some((node, adj_ix)) = prev[current] else {
                break;
            };
            let (next, edge) = &self.adjacency[node][adj_ix];
            edges.push(PathEdge {
                from: self.stops[node].id.clone(),
                to: self.stops[*next].id.clone(),
                kind: edge.kind,
                weight_secs: edge.weight_secs,
                routes: edge.routes.clone(),
            });
            current = node;
        }
        edges.reverse();

        let transfers = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Transfer)
            .count();

        RoutePath {
            edges,
            total_secs,
            transfers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopKind;

    fn stop(id: &str, name: &str) -> Stop {
        Stop {
            id: StopId::new(id),
            name: name.to_string(),
            kind: StopKind::Platform,
            parent_id: None,
        }
    }

    fn track(weight: u32, routes: &[&str]) -> Edge {
        Edge {
            kind: EdgeKind::Track,
            weight_secs: weight,
            routes: routes.iter().map(|r| RouteId::new(*r)).collect(),
        }
    }

    /// A -> B -> C in a line, plus a slow direct A -> C edge.
    fn line_graph() -> Topology {
        let stops = vec![stop("A", "Alpha"), stop("B", "Beta"), stop("C", "Gamma")];
        let index = stops
            .iter()
            .enumerate()
            .map(|(ix, s)| (s.id.as_str().to_string(), ix))
            .collect();
        let adjacency = vec![
            vec![(1, track(100, &["4"])), (2, track(500, &["5"]))],
            vec![(2, track(100, &["4"]))],
            vec![],
        ];
        Topology::new(stops, index, adjacency)
    }

    #[test]
    fn shortest_path_prefers_lower_total_weight() {
        let graph = line_graph();
        let path = graph
            .shortest_path(&StopId::new("A"), &StopId::new("C"))
            .unwrap();

        assert_eq!(path.total_secs, 200);
        assert_eq!(path.edges.len(), 2);
        assert_eq!(path.edges[0].from, StopId::new("A"));
        assert_eq!(path.edges[1].to, StopId::new("C"));
    }

    #[test]
    fn total_equals_sum_of_edge_weights() {
        let graph = line_graph();
        let path = graph
            .shortest_path(&StopId::new("A"), &StopId::new("C"))
            .unwrap();

        let sum: u32 = path.edges.iter().map(|e| e.weight_secs).sum();
        assert_eq!(sum, path.total_secs);
    }

    #[test]
    fn disconnected_pair_is_none_not_an_error() {
        let graph = line_graph();
        // C has no outgoing edges
        assert!(graph
            .shortest_path(&StopId::new("C"), &StopId::new("A"))
            .is_none());
    }

    #[test]
    fn unknown_ids_are_none() {
        let graph = line_graph();
        assert!(graph
            .shortest_path(&StopId::new("Z"), &StopId::new("A"))
            .is_none());
        assert!(graph.stop(&StopId::new("Z")).is_none());
    }

    #[test]
    fn same_source_and_target_is_an_empty_path() {
        let graph = line_graph();
        let path = graph
            .shortest_path(&StopId::new("A"), &StopId::new("A"))
            .unwrap();

        assert!(path.edges.is_empty());
        assert_eq!(path.total_secs, 0);
        assert_eq!(path.transfers, 0);
    }

    #[test]
    fn transfers_are_counted() {
        let stops = vec![stop("A", "Alpha"), stop("B", "Beta"), stop("C", "Gamma")];
        let index = stops
            .iter()
            .enumerate()
            .map(|(ix, s)| (s.id.as_str().to_string(), ix))
            .collect();
        let walk = Edge {
            kind: EdgeKind::Transfer,
            weight_secs: 180,
            routes: BTreeSet::new(),
        };
        let adjacency = vec![
            vec![(1, track(100, &["4"]))],
            vec![(2, walk)],
            vec![],
        ];
        let graph = Topology::new(stops, index, adjacency);

        let path = graph
            .shortest_path(&StopId::new("A"), &StopId::new("C"))
            .unwrap();
        assert_eq!(path.transfers, 1);
        assert_eq!(path.total_secs, 280);
    }

    #[test]
    fn edge_between_picks_the_lightest_parallel_edge() {
        let stops = vec![stop("A", "Alpha"), stop("B", "Beta")];
        let index = stops
            .iter()
            .enumerate()
            .map(|(ix, s)| (s.id.as_str().to_string(), ix))
            .collect();
        let adjacency = vec![
            vec![(1, track(300, &["5"])), (1, track(100, &["4"]))],
            vec![],
        ];
        let graph = Topology::new(stops, index, adjacency);

        let edge = graph
            .edge_between(&StopId::new("A"), &StopId::new("B"))
            .unwrap();
        assert_eq!(edge.weight_secs, 100);
    }

    #[test]
    fn path_stops_include_both_endpoints() {
        let graph = line_graph();
        let path = graph
            .shortest_path(&StopId::new("A"), &StopId::new("C"))
            .unwrap();

        let stops: Vec<&str> = path.stops().iter().map(|s| s.as_str()).collect();
        assert_eq!(stops, vec!["A", "B", "C"]);
    }
}
