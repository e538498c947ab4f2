use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use subway_navigator::config::NavigatorConfig;
use subway_navigator::domain::RouteId;
use subway_navigator::geography::lexington_geography;
use subway_navigator::gtfs::load_tables;
use subway_navigator::navigator::Navigator;
use subway_navigator::realtime::{FeedClient, FeedPoller, FeedStore, default_feed_groups};
use subway_navigator::topology::TopologyBuilder;

/// Default MTA realtime feed base URL.
const DEFAULT_FEED_BASE_URL: &str =
    "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds/nyct%2F";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let gtfs_dir = std::env::var("GTFS_DIR").unwrap_or_else(|_| "data/gtfs".to_string());
    let feed_base_url =
        std::env::var("FEED_BASE_URL").unwrap_or_else(|_| DEFAULT_FEED_BASE_URL.to_string());

    let config = NavigatorConfig::default();

    // Static topology: the only fatal failure in the system.
    info!(dir = %gtfs_dir, "loading static timetable");
    let tables = load_tables(&gtfs_dir).expect("Failed to load GTFS tables");
    let topology = TopologyBuilder::build(&tables, &config).expect("Failed to build topology");
    info!(
        stops = topology.node_count(),
        edges = topology.edge_count(),
        "topology ready"
    );

    // Realtime ingestion runs on its own task; the query path never
    // touches the network.
    let store = FeedStore::new();
    let client = FeedClient::new(config.fetch_timeout()).expect("Failed to build feed client");
    let groups = default_feed_groups(&feed_base_url);
    let poller = FeedPoller::new(client, store.clone(), groups, config.poll_interval());
    tokio::spawn(poller.run());

    let navigator = Navigator::new(topology, lexington_geography(), store, config);

    println!("subway-navigator ready. Commands:");
    println!("  plan <origin> to <destination>");
    println!("  next <station>");
    println!("  alerts [route]");
    println!("  quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        if let Some(rest) = line.strip_prefix("plan ") {
            match rest.split_once(" to ") {
                Some((origin, dest)) => {
                    println!("{}", navigator.plan_trip(origin.trim(), dest.trim()).await);
                }
                None => println!("usage: plan <origin> to <destination>"),
            }
        } else if let Some(station) = line.strip_prefix("next ") {
            println!("{}", navigator.next_trains(station.trim(), None, None).await);
        } else if line == "alerts" {
            println!("{}", navigator.alerts(None).await);
        } else if let Some(route) = line.strip_prefix("alerts ") {
            let route = RouteId::new(route.trim());
            println!("{}", navigator.alerts(Some(&route)).await);
        } else {
            println!("unknown command");
        }
    }
}
