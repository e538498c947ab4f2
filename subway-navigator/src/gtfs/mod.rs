//! Static timetable tables.
//!
//! Loads the GTFS text tables the topology is built from: stops (with
//! parent/child grouping), trips, ordered stop-time sequences, and declared
//! transfers. Loader errors are fatal at startup; a navigator without a
//! timetable has nothing to route over.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors from loading or interpreting the static tables.
#[derive(Debug, thiserror::Error)]
pub enum GtfsError {
    /// A required table file is absent from the data directory.
    #[error("missing required table {path}")]
    MissingTable { path: PathBuf },

    /// A table failed to read or parse.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A clock time was not in `HH:MM:SS` form.
    #[error("invalid GTFS clock time '{0}'")]
    BadTime(String),
}

/// One row of `stops.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    pub stop_id: String,
    pub stop_name: String,
    /// `"1"` marks a parent station complex; empty or `"0"` a platform.
    #[serde(default)]
    pub location_type: String,
    #[serde(default)]
    pub parent_station: String,
}

/// One row of `trips.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRecord {
    pub route_id: String,
    pub trip_id: String,
}

/// Raw row of `stop_times.txt`; times are parsed into seconds at load.
#[derive(Debug, Deserialize)]
struct StopTimeRecord {
    trip_id: String,
    arrival_time: String,
    departure_time: String,
    stop_id: String,
    stop_sequence: u32,
}

/// One stop visit of a scheduled trip, with times in seconds past midnight
/// of the service day.
#[derive(Debug, Clone)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub arrival_secs: u32,
    pub departure_secs: u32,
}

/// One row of `transfers.txt`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRecord {
    pub from_stop_id: String,
    pub to_stop_id: String,
    #[serde(default)]
    pub min_transfer_time: u32,
}

/// The static tables the topology builder consumes.
#[derive(Debug)]
pub struct StaticTables {
    pub stops: Vec<StopRecord>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTime>,
    pub transfers: Vec<TransferRecord>,
}

/// Load the static tables from a GTFS directory.
///
/// `stops.txt`, `trips.txt`, and `stop_times.txt` are required;
/// `transfers.txt` is optional (absence means no declared transfers).
pub fn load_tables(dir: impl AsRef<Path>) -> Result<StaticTables, GtfsError> {
    let dir = dir.as_ref();

    let stops: Vec<StopRecord> = read_rows(&require(dir.join("stops.txt"))?)?;
    let trips: Vec<TripRecord> = read_rows(&require(dir.join("trips.txt"))?)?;
    let raw_stop_times: Vec<StopTimeRecord> = read_rows(&require(dir.join("stop_times.txt"))?)?;

    let transfers_path = dir.join("transfers.txt");
    let transfers: Vec<TransferRecord> = if transfers_path.exists() {
        read_rows(&transfers_path)?
    } else {
        Vec::new()
    };

    let mut stop_times = Vec::with_capacity(raw_stop_times.len());
    for raw in raw_stop_times {
        stop_times.push(StopTime {
            arrival_secs: parse_gtfs_time(&raw.arrival_time)?,
            departure_secs: parse_gtfs_time(&raw.departure_time)?,
            trip_id: raw.trip_id,
            stop_id: raw.stop_id,
            stop_sequence: raw.stop_sequence,
        });
    }

    Ok(StaticTables {
        stops,
        trips,
        stop_times,
        transfers,
    })
}

/// Parse a GTFS `HH:MM:SS` clock time into seconds past midnight.
///
/// Hours may exceed 23: trips that run past midnight are timestamped on the
/// service day they started (`"25:10:00"` is 1:10 AM the next calendar day).
pub fn parse_gtfs_time(text: &str) -> Result<u32, GtfsError> {
    let mut parts = text.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(GtfsError::BadTime(text.to_string()));
    };

    let hours: u32 = h.parse().map_err(|_| GtfsError::BadTime(text.to_string()))?;
    let minutes: u32 = m.parse().map_err(|_| GtfsError::BadTime(text.to_string()))?;
    let seconds: u32 = s.parse().map_err(|_| GtfsError::BadTime(text.to_string()))?;

    if minutes > 59 || seconds > 59 {
        return Err(GtfsError::BadTime(text.to_string()));
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

fn require(path: PathBuf) -> Result<PathBuf, GtfsError> {
    if path.exists() {
        Ok(path)
    } else {
        Err(GtfsError::MissingTable { path })
    }
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, GtfsError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| GtfsError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.map_err(|source| GtfsError::Csv {
            path: path.to_path_buf(),
            source,
        })?);
    }
    Ok(rows)
}
