//! Feed client error types.

/// Errors from fetching or decoding one feed group.
///
/// Always scoped to a single group for a single cycle; the ingestion loop
/// logs the failure and moves on, leaving the group's previous generation
/// in place.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("feed group '{group}' returned status {status}")]
    Status { group: String, status: u16 },

    /// The response body was not a valid GTFS-realtime message.
    #[error("failed to decode feed message: {0}")]
    Decode(#[from] prost::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_names_the_group() {
        let err = FeedError::Status {
            group: "numbers".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "feed group 'numbers' returned status 503"
        );
    }
}
