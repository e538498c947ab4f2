//! Fuzzy station name resolution.
//!
//! Free text goes in, graph nodes come out. The protocol tolerates
//! near-miss spelling while still surfacing genuine ambiguity between
//! distinct stations: candidates are scored, thresholded against the top
//! score, grouped by matched name, and only then classified as resolved
//! or ambiguous.

use crate::config::NavigatorConfig;
use crate::domain::{StopId, StopKind};
use crate::topology::Topology;

/// One scored candidate from a station search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationMatch {
    pub stop_id: StopId,
    pub matched_name: String,
    /// Similarity on a 0-100 scale; 100 is an exact normalized match.
    pub score: u8,
    pub kind: StopKind,
}

/// Outcome of resolving free text to station nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing plausibly matched.
    NotFound,
    /// One station; multiple members are platforms of the same complex and
    /// all equally valid entry/exit points.
    Resolved(Vec<StationMatch>),
    /// Several plausible stations; the caller should re-prompt with one of
    /// the listed candidates.
    Ambiguous(Vec<StationMatch>),
}

struct IndexRow {
    id: StopId,
    name: String,
    normalized: String,
    kind: StopKind,
}

/// Name index over the topology's stop catalog.
///
/// Built once from a fully constructed topology; rebuilding the topology
/// means rebuilding the index.
pub struct StationIndex {
    rows: Vec<IndexRow>,
    search_limit: usize,
    min_match_score: u8,
    ambiguity_window: u8,
}

impl StationIndex {
    pub fn new(topology: &Topology, config: &NavigatorConfig) -> Self {
        let mut rows: Vec<IndexRow> = topology
            .stops()
            .map(|stop| IndexRow {
                id: stop.id.clone(),
                name: stop.name.clone(),
                normalized: normalize(&stop.name),
                kind: stop.kind,
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Self {
            rows,
            search_limit: config.search_limit,
            min_match_score: config.min_match_score,
            ambiguity_window: config.ambiguity_window,
        }
    }

    /// Number of indexed stops.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fuzzy search over all stop names, best matches first.
    ///
    /// Ordering is deterministic: score descending, then name, then id.
    pub fn search(&self, text: &str, limit: usize) -> Vec<StationMatch> {
        let query = normalize(text);
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<StationMatch> = self
            .rows
            .iter()
            .filter_map(|row| {
                let score = similarity(&query, &row.normalized);
                (score >= self.min_match_score).then(|| StationMatch {
                    stop_id: row.id.clone(),
                    matched_name: row.name.clone(),
                    score,
                    kind: row.kind,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.matched_name.cmp(&b.matched_name))
                .then_with(|| a.stop_id.cmp(&b.stop_id))
        });
        matches.truncate(limit);
        matches
    }

    /// Resolve free text to station nodes with the ambiguity protocol.
    ///
    /// Parent complexes are preferred over their platforms when any parent
    /// is among the results. Candidates within the score threshold are
    /// grouped by matched name: one name naming one complex resolves (its
    /// platforms are interchangeable entry points), one name naming several
    /// parent complexes is ambiguous (genuinely different stations sharing
    /// a name), and several names are always ambiguous.
    pub fn resolve(&self, text: &str) -> Resolution {
        let results = self.search(text, self.search_limit);
        if results.is_empty() {
            return Resolution::NotFound;
        }

        let parents: Vec<StationMatch> = results
            .iter()
            .filter(|m| m.kind == StopKind::Parent)
            .cloned()
            .collect();
        let candidates = if parents.is_empty() { results } else { parents };

        // Perfect top match tolerates no weaker candidates; otherwise allow
        // a fixed window below the top score.
        let top = candidates[0].score;
        let threshold = if top == 100 {
            100
        } else {
            top.saturating_sub(self.ambiguity_window)
        };

        // Group survivors by matched name, preserving candidate order.
        let mut groups: Vec<(String, Vec<StationMatch>)> = Vec::new();
        for candidate in candidates.into_iter().filter(|c| c.score >= threshold) {
            match groups
                .iter_mut()
                .find(|(name, _)| *name == candidate.matched_name)
            {
                Some((_, members)) => members.push(candidate),
                None => groups.push((candidate.matched_name.clone(), vec![candidate])),
            }
        }

        if groups.len() == 1 {
            let Some((_, members)) = groups.pop() else {
                return Resolution::NotFound;
            };
            if members.len() == 1 {
                return Resolution::Resolved(members);
            }
            // Same name, several parent complexes: distinct stations.
            if members.iter().all(|m| m.kind == StopKind::Parent) {
                return Resolution::Ambiguous(members);
            }
            // Several platforms of one complex: all valid entry points.
            return Resolution::Resolved(members);
        }

        Resolution::Ambiguous(groups.into_iter().flat_map(|(_, m)| m).collect())
    }
}

/// Lowercase with runs of whitespace collapsed to single spaces.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Jaro-Winkler similarity on a 0-100 scale; exact equality pins 100.
fn similarity(query: &str, name: &str) -> u8 {
    if query == name {
        return 100;
    }
    (strsim::jaro_winkler(query, name) * 100.0).round().min(100.0) as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn names() -> Vec<&'static str> {
        vec![
            "Grand Central-42 St",
            "14 St-Union Sq",
            "Brooklyn Bridge-City Hall",
            "125 St",
            "86 St",
        ]
    }

    fn fixture() -> StationIndex {
        use crate::domain::Stop;
        use std::collections::HashMap;

        let stops: Vec<Stop> = names()
            .into_iter()
            .enumerate()
            .map(|(ix, name)| Stop {
                id: StopId::new(format!("P{ix}")),
                name: name.to_string(),
                kind: StopKind::Parent,
                parent_id: None,
            })
            .collect();
        let index: HashMap<String, usize> = stops
            .iter()
            .enumerate()
            .map(|(ix, s)| (s.id.as_str().to_string(), ix))
            .collect();
        let adjacency = vec![Vec::new(); stops.len()];
        let topology = Topology::new(stops, index, adjacency);
        StationIndex::new(&topology, &NavigatorConfig::default())
    }

    proptest! {
        /// Scores are always on the 0-100 scale.
        #[test]
        fn scores_are_bounded(query in ".{0,40}") {
            let index = fixture();
            for m in index.search(&query, 10) {
                prop_assert!(m.score <= 100);
            }
        }

        /// Resolving the canonical name of a resolved result is stable.
        #[test]
        fn resolution_idempotent(choice in 0usize..5, uppercase in any::<bool>()) {
            let index = fixture();
            let name = names()[choice];
            let query = if uppercase { name.to_uppercase() } else { name.to_lowercase() };

            if let Resolution::Resolved(first) = index.resolve(&query) {
                match index.resolve(&first[0].matched_name) {
                    Resolution::Resolved(second) => {
                        let first_ids: Vec<_> = first.iter().map(|m| m.stop_id.clone()).collect();
                        let second_ids: Vec<_> = second.iter().map(|m| m.stop_id.clone()).collect();
                        prop_assert_eq!(first_ids, second_ids);
                    }
                    other => prop_assert!(false, "canonical name did not resolve: {other:?}"),
                }
            }
        }
    }
}
