//! Stop and route identifier types.

use std::fmt;

/// Travel direction encoded in a platform identifier's trailing letter.
///
/// Directional platform ids end in `N` or `S` (`"631N"` is the northbound
/// platform of the `"631"` complex). Parent complex ids carry no suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionHint {
    North,
    South,
}

/// A stable stop identifier from the static timetable.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing direction marker, if the id names a directional platform.
    pub fn direction_hint(&self) -> Option<DirectionHint> {
        match self.0.as_bytes().last() {
            Some(b'N') => Some(DirectionHint::North),
            Some(b'S') => Some(DirectionHint::South),
            _ => None,
        }
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StopId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A route code from the static timetable (`"4"`, `"6X"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the route code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rider-facing name: express variants render with the word spelled out
    /// (`"6X"` becomes `"6 express"`).
    pub fn display_name(&self) -> String {
        match self.0.strip_suffix('X') {
            Some(base) if !base.is_empty() => format!("{base} express"),
            _ => self.0.clone(),
        }
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Whether a stop is a station complex or one of its boarding platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    /// A parent station complex grouping one or more platforms.
    Parent,
    /// A physical boarding platform.
    Platform,
}

/// One entry of the stop catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub kind: StopKind,
    /// Present iff this is a platform grouped under a parent complex.
    pub parent_id: Option<StopId>,
}
