//! Feed endpoints and the HTTP fetcher.

use std::future::Future;
use std::time::Duration;

use super::error::FeedError;

/// One independently polled realtime endpoint covering a subset of routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedGroup {
    pub id: String,
    pub url: String,
}

impl FeedGroup {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }
}

/// Source of raw feed bytes.
///
/// The seam between the ingestion loop and the network: the poller is
/// written against this trait so tests can substitute canned bytes for
/// live endpoints.
pub trait FeedSource: Send + Sync {
    fn fetch(
        &self,
        group: &FeedGroup,
    ) -> impl Future<Output = Result<Vec<u8>, FeedError>> + Send;
}

/// HTTP implementation of [`FeedSource`].
///
/// The timeout is applied at client construction, so a hanging endpoint
/// costs one group at most `timeout` per cycle.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl FeedSource for FeedClient {
    async fn fetch(&self, group: &FeedGroup) -> Result<Vec<u8>, FeedError> {
        let response = self.http.get(&group.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                group: group.id.clone(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// The MTA's per-line feed groups, relative to a base URL.
pub fn default_feed_groups(base_url: &str) -> Vec<FeedGroup> {
    [
        ("numbers", "gtfs"),
        ("ace", "gtfs-ace"),
        ("nqrw", "gtfs-nqrw"),
        ("bdfm", "gtfs-bdfm"),
        ("l", "gtfs-l"),
        ("g", "gtfs-g"),
        ("jz", "gtfs-jz"),
        ("sir", "gtfs-si"),
    ]
    .into_iter()
    .map(|(id, suffix)| FeedGroup::new(id, format!("{base_url}{suffix}")))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_groups_cover_all_lines() {
        let groups = default_feed_groups("https://example.test/feeds/");

        assert_eq!(groups.len(), 8);
        assert_eq!(groups[0].id, "numbers");
        assert_eq!(groups[0].url, "https://example.test/feeds/gtfs");
        assert!(groups.iter().any(|g| g.url.ends_with("gtfs-si")));
    }

    #[test]
    fn client_builds_with_a_timeout() {
        assert!(FeedClient::new(Duration::from_secs(10)).is_ok());
    }
}
