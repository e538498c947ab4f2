//! Live arrival and alert ingestion.
//!
//! An ingestion loop polls several independent feed groups on a fixed
//! cadence, decoding each group's GTFS-realtime message and atomically
//! replacing that group's rows in the shared store. One group's outage
//! never blocks or corrupts another's data: the store is eventually
//! consistent, with staleness bounded by the poll interval, and different
//! groups may sit at different refresh generations simultaneously.

mod client;
mod error;
mod mock;
mod parse;
mod poller;
mod store;
mod types;

pub use client::{FeedClient, FeedGroup, FeedSource, default_feed_groups};
pub use error::FeedError;
pub use mock::MockFeedSource;
pub use parse::{FeedBatch, parse_feed};
pub use poller::{CycleReport, FeedPoller};
pub use store::{FeedStore, GroupSnapshot};
pub use types::{AlertEntities, AlertRecord, ArrivalRecord};
