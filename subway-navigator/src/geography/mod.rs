//! Direction and terminal labeling tables.
//!
//! Riders do not navigate by compass points: a northbound Lexington train
//! is "Uptown", and "Uptown to the Bronx" when it actually crosses the
//! river. The inference is a lookup over explicit keyword and terminal
//! tables so it can be swapped or extended without touching the itinerary
//! assembly.

use std::collections::HashMap;

use crate::domain::{DirectionHint, RouteId, StopId};

/// Rider-facing travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Uptown,
    UptownToBronx,
    Downtown,
    DowntownToBrooklyn,
}

impl Direction {
    /// Human label, e.g. `"Uptown to the Bronx"`.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Uptown => "Uptown",
            Direction::UptownToBronx => "Uptown to the Bronx",
            Direction::Downtown => "Downtown",
            Direction::DowntownToBrooklyn => "Downtown to Brooklyn",
        }
    }

    /// The bare axis: borough-qualified directions fall back to their
    /// unqualified form for terminal lookups.
    pub fn axis(&self) -> Direction {
        match self {
            Direction::UptownToBronx => Direction::Uptown,
            Direction::DowntownToBrooklyn => Direction::Downtown,
            other => *other,
        }
    }
}

/// Keyword and terminal tables driving direction inference.
#[derive(Debug, Clone, Default)]
pub struct Geography {
    bronx_keywords: Vec<String>,
    brooklyn_keywords: Vec<String>,
    terminals: HashMap<(RouteId, Direction), String>,
}

impl Geography {
    /// Infer the rider-facing direction of a leg.
    ///
    /// Combines the boarding platform's trailing direction marker with
    /// keyword hits on the origin and destination stop names. Returns
    /// `None` when neither source gives a signal (e.g. boarding at a
    /// parent complex toward an in-Manhattan stop).
    pub fn infer_direction(
        &self,
        from: &StopId,
        from_name: &str,
        to_name: &str,
    ) -> Option<Direction> {
        let hint = from.direction_hint();
        let to_bronx = hits(&self.bronx_keywords, to_name);
        let to_brooklyn = hits(&self.brooklyn_keywords, to_name);
        let from_bronx = hits(&self.bronx_keywords, from_name);
        let from_brooklyn = hits(&self.brooklyn_keywords, from_name);

        if to_brooklyn || (hint == Some(DirectionHint::South) && !from_bronx) {
            Some(if to_brooklyn {
                Direction::DowntownToBrooklyn
            } else {
                Direction::Downtown
            })
        } else if to_bronx || (hint == Some(DirectionHint::North) && !from_brooklyn) {
            Some(if to_bronx {
                Direction::UptownToBronx
            } else {
                Direction::Uptown
            })
        } else {
            match hint {
                Some(DirectionHint::North) => Some(Direction::Uptown),
                Some(DirectionHint::South) => Some(Direction::Downtown),
                None => None,
            }
        }
    }

    /// Terminal station for a route and direction, e.g. the Uptown 6
    /// runs to Pelham Bay Park.
    ///
    /// A borough-qualified direction with no entry of its own falls back
    /// to its bare axis; a route with no entry at all yields `None`.
    pub fn terminal(&self, route: &RouteId, direction: Direction) -> Option<&str> {
        self.terminals
            .get(&(route.clone(), direction))
            .or_else(|| self.terminals.get(&(route.clone(), direction.axis())))
            .map(String::as_str)
    }
}

fn hits(keywords: &[String], name: &str) -> bool {
    keywords.iter().any(|k| name.contains(k.as_str()))
}

/// Builder for geography tables.
#[derive(Debug, Default)]
pub struct GeographyBuilder {
    inner: Geography,
}

impl GeographyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a station-name fragment that marks a Bronx destination.
    pub fn bronx_keyword(mut self, keyword: &str) -> Self {
        self.inner.bronx_keywords.push(keyword.to_string());
        self
    }

    /// Add a station-name fragment that marks a Brooklyn destination.
    pub fn brooklyn_keyword(mut self, keyword: &str) -> Self {
        self.inner.brooklyn_keywords.push(keyword.to_string());
        self
    }

    /// Declare the terminal station of a route in a direction.
    pub fn terminal(mut self, route: &str, direction: Direction, station: &str) -> Self {
        self.inner
            .terminals
            .insert((RouteId::new(route), direction), station.to_string());
        self
    }

    pub fn build(self) -> Geography {
        self.inner
    }
}

/// Geography tables for the Lexington Avenue corridor (4/5/6 trains).
pub fn lexington_geography() -> Geography {
    GeographyBuilder::new()
        .bronx_keyword("Bronx")
        .bronx_keyword("Woodlawn")
        .bronx_keyword("Pelham")
        .bronx_keyword("Parkchester")
        .bronx_keyword("Hunts Point")
        .bronx_keyword("Yankee Stadium")
        .bronx_keyword("Fordham")
        .bronx_keyword("Bedford Park")
        .bronx_keyword("Eastchester")
        .bronx_keyword("Nereid")
        .bronx_keyword("Wakefield")
        .bronx_keyword("Dyre")
        .brooklyn_keyword("Brooklyn")
        .brooklyn_keyword("Bergen")
        .brooklyn_keyword("Crown")
        .brooklyn_keyword("Franklin Av")
        .brooklyn_keyword("Nostrand")
        .brooklyn_keyword("Kingston")
        .brooklyn_keyword("Utica")
        .brooklyn_keyword("Flatbush")
        .brooklyn_keyword("New Lots")
        .brooklyn_keyword("Nevins")
        .brooklyn_keyword("Atlantic Av")
        .brooklyn_keyword("Barclays")
        .terminal("4", Direction::Uptown, "Woodlawn")
        .terminal("4", Direction::Downtown, "Crown Hts-Utica Av")
        .terminal("5", Direction::Uptown, "Eastchester-Dyre Av")
        .terminal("5", Direction::UptownToBronx, "Eastchester-Dyre Av")
        .terminal("5", Direction::Downtown, "Flatbush Av-Brooklyn College")
        .terminal("5", Direction::DowntownToBrooklyn, "Flatbush Av-Brooklyn College")
        .terminal("6", Direction::Uptown, "Pelham Bay Park")
        .terminal("6", Direction::Downtown, "Brooklyn Bridge-City Hall")
        .terminal("6X", Direction::Uptown, "Pelham Bay Park")
        .terminal("6X", Direction::Downtown, "Brooklyn Bridge-City Hall")
        .build()
}
