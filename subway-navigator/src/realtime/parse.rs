//! GTFS-realtime message decoding.

use gtfs_rt::FeedMessage;
use prost::Message;
use tracing::warn;

use crate::domain::{RouteId, StopId};

use super::error::FeedError;
use super::types::{AlertEntities, AlertRecord, ArrivalRecord};

/// Everything extracted from one feed group's message.
#[derive(Debug, Default)]
pub struct FeedBatch {
    pub arrivals: Vec<ArrivalRecord>,
    pub alerts: Vec<AlertRecord>,
}

/// Decode one feed message into arrival and alert records.
///
/// `fallback_observed_at` stamps the records when the feed header carries
/// no timestamp. Stop-time updates without a positive arrival prediction
/// are dropped; an alert with no readable text is skipped with a warning
/// and never aborts the rest of the batch.
pub fn parse_feed(bytes: &[u8], fallback_observed_at: i64) -> Result<FeedBatch, FeedError> {
    let feed = FeedMessage::decode(bytes)?;
    let observed_at = feed
        .header
        .timestamp
        .map(|t| t as i64)
        .unwrap_or(fallback_observed_at);

    let mut batch = FeedBatch::default();

    for entity in feed.entity {
        if let Some(update) = entity.trip_update {
            let trip_id = update.trip.trip_id.clone().unwrap_or_default();
            let route_id = RouteId::new(update.trip.route_id.clone().unwrap_or_default());

            for stu in update.stop_time_update {
                let Some(stop_id) = stu.stop_id else {
                    continue;
                };
                let arrival_time = stu.arrival.as_ref().and_then(|a| a.time).unwrap_or(0);
                if arrival_time <= 0 {
                    continue;
                }
                let departure_time = stu.departure.as_ref().and_then(|d| d.time).unwrap_or(0);
                batch.arrivals.push(ArrivalRecord {
                    trip_id: trip_id.clone(),
                    route_id: route_id.clone(),
                    stop_id: StopId::new(stop_id),
                    arrival_time,
                    departure_time,
                    observed_at,
                });
            }
        }

        if let Some(alert) = entity.alert {
            let header = first_translation(alert.header_text.as_ref());
            let description = first_translation(alert.description_text.as_ref());
            if header.is_empty() && description.is_empty() {
                warn!(alert = %entity.id, "skipping alert with no readable text");
                continue;
            }

            let routes: Vec<RouteId> = alert
                .informed_entity
                .into_iter()
                .filter_map(|ie| ie.route_id)
                .map(RouteId::new)
                .collect();

            batch.alerts.push(AlertRecord {
                alert_id: entity.id.clone(),
                header_text: header,
                description_text: description,
                entities: AlertEntities::from_route_ids(routes),
                observed_at,
            });
        }
    }

    Ok(batch)
}

fn first_translation(text: Option<&gtfs_rt::TranslatedString>) -> String {
    text.and_then(|t| t.translation.first())
        .map(|t| t.text.trim().to_string())
        .unwrap_or_default()
}
