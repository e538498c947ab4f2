//! Shared text rendering for arrival and alert data.

use std::collections::BTreeSet;

use crate::domain::RouteId;
use crate::realtime::AlertRecord;

/// Comma-joined route codes, e.g. `"4, 5, 6, 6X"`.
pub(crate) fn routes_label(routes: &BTreeSet<RouteId>) -> String {
    routes
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One arrival line: `"Route 6 at 14:05 (3 min)"`.
pub(crate) fn arrival_line(route: &RouteId, arrival_time: i64, as_of: i64) -> String {
    let clock = chrono::DateTime::from_timestamp(arrival_time, 0)
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "??:??".to_string());
    let wait_mins = ((arrival_time - as_of) as f64 / 60.0).round() as i64;
    format!("Route {} at {} ({} min)", route.as_str(), clock, wait_mins)
}

/// Render upcoming arrivals, one line each.
///
/// An empty arrival set yields `no_data_message`; a non-empty set that the
/// route filter empties yields the distinct filtered-empty message, so a
/// caller can tell "no live data" from "nothing on your routes".
pub(crate) fn arrivals_report(
    arrivals: &[(RouteId, i64)],
    route_filter: Option<&[RouteId]>,
    as_of: i64,
    no_data_message: &str,
) -> String {
    if arrivals.is_empty() {
        return no_data_message.to_string();
    }

    let lines: Vec<String> = arrivals
        .iter()
        .filter(|(route, _)| route_filter.is_none_or(|filter| filter.contains(route)))
        .map(|(route, time)| arrival_line(route, *time, as_of))
        .collect();

    if lines.is_empty() {
        "No trains matching filter.".to_string()
    } else {
        lines.join("\n")
    }
}

/// Truncate to a bounded length, marking the cut with an ellipsis.
pub(crate) fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Format alerts as `"[<routes>] <header> - <description>"` lines.
///
/// An alert naming only out-of-whitelist routes is suppressed entirely.
/// An alert naming no routes is system-wide: it renders as `[System-wide]`
/// and passes every route filter.
pub(crate) fn alert_lines(
    alerts: &[AlertRecord],
    whitelist: &BTreeSet<RouteId>,
    route_filter: Option<&RouteId>,
    max_description_len: usize,
) -> Vec<String> {
    let mut lines = Vec::new();

    for alert in alerts {
        let in_scope: Vec<&RouteId> = alert
            .entities
            .routes()
            .iter()
            .filter(|r| whitelist.contains(*r))
            .collect();

        if in_scope.is_empty() && !alert.entities.is_system_wide() {
            continue;
        }
        if let Some(filter) = route_filter {
            if !in_scope.is_empty() && !in_scope.iter().any(|r| *r == filter) {
                continue;
            }
        }

        let route_str = if in_scope.is_empty() {
            "System-wide".to_string()
        } else {
            let mut labels: Vec<&str> = in_scope.iter().map(|r| r.as_str()).collect();
            labels.sort_unstable();
            labels.dedup();
            labels.join(", ")
        };

        let mut line = format!("[{route_str}] {}", alert.header_text);
        let description = alert.description_text.trim();
        if !description.is_empty() {
            line.push_str(" - ");
            line.push_str(&truncate_text(description, max_description_len));
        }
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::AlertEntities;

    fn whitelist() -> BTreeSet<RouteId> {
        ["4", "5", "6", "6X"].into_iter().map(RouteId::new).collect()
    }

    fn alert(header: &str, description: &str, routes: &[&str]) -> AlertRecord {
        AlertRecord {
            alert_id: format!("alert-{header}"),
            header_text: header.to_string(),
            description_text: description.to_string(),
            entities: AlertEntities::from_route_ids(
                routes.iter().map(|r| RouteId::new(*r)).collect(),
            ),
            observed_at: 0,
        }
    }

    #[test]
    fn arrival_line_rounds_the_wait() {
        let line = arrival_line(&RouteId::new("6"), 1_000_000_290, 1_000_000_000);
        assert!(line.starts_with("Route 6 at "));
        assert!(line.ends_with("(5 min)"));
    }

    #[test]
    fn empty_arrivals_use_the_no_data_message() {
        let text = arrivals_report(&[], None, 0, "No live arrival data found.");
        assert_eq!(text, "No live arrival data found.");
    }

    #[test]
    fn filtered_out_arrivals_are_a_distinct_message() {
        let arrivals = vec![(RouteId::new("6"), 500)];
        let filter = [RouteId::new("4")];
        let text = arrivals_report(&arrivals, Some(&filter), 0, "No live arrival data found.");
        assert_eq!(text, "No trains matching filter.");
    }

    #[test]
    fn out_of_whitelist_alert_is_suppressed() {
        let alerts = vec![alert("L train suspended", "", &["L"])];
        assert!(alert_lines(&alerts, &whitelist(), None, 150).is_empty());
    }

    #[test]
    fn system_wide_alert_passes_every_filter() {
        let alerts = vec![alert("Network-wide delays", "Heavy weather", &[])];

        let unfiltered = alert_lines(&alerts, &whitelist(), None, 150);
        assert_eq!(unfiltered.len(), 1);
        assert!(unfiltered[0].starts_with("[System-wide]"));

        let four = RouteId::new("4");
        let filtered = alert_lines(&alerts, &whitelist(), Some(&four), 150);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn route_filter_drops_unrelated_alerts() {
        let alerts = vec![
            alert("Delays on the 4", "", &["4"]),
            alert("Delays on the 6", "", &["6"]),
        ];

        let six = RouteId::new("6");
        let lines = alert_lines(&alerts, &whitelist(), Some(&six), 150);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "[6] Delays on the 6");
    }

    #[test]
    fn alert_route_label_is_sorted_and_scoped() {
        let alerts = vec![alert("Shared delays", "desc", &["5", "4", "L"])];
        let lines = alert_lines(&alerts, &whitelist(), None, 150);
        assert_eq!(lines[0], "[4, 5] Shared delays - desc");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let text = "x".repeat(200);
        let truncated = truncate_text(&text, 150);
        assert_eq!(truncated.chars().count(), 150);
        assert!(truncated.ends_with('…'));

        assert_eq!(truncate_text("short", 150), "short");
    }
}
