//! Mock feed source for testing without live endpoints.

use std::collections::HashMap;
use std::sync::Mutex;

use super::client::{FeedGroup, FeedSource};
use super::error::FeedError;

enum Canned {
    Bytes(Vec<u8>),
    Fail,
}

/// In-memory feed source serving canned bytes per group.
///
/// Responses can be swapped between cycles, which is how the ingestion
/// tests simulate a group going down after a successful refresh.
#[derive(Default)]
pub struct MockFeedSource {
    responses: Mutex<HashMap<String, Canned>>,
}

impl MockFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the given bytes for a group.
    pub fn set_bytes(&self, group_id: &str, bytes: Vec<u8>) {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .insert(group_id.to_string(), Canned::Bytes(bytes));
    }

    /// Make fetches for a group fail.
    pub fn set_failure(&self, group_id: &str) {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .insert(group_id.to_string(), Canned::Fail);
    }
}

impl FeedSource for MockFeedSource {
    async fn fetch(&self, group: &FeedGroup) -> Result<Vec<u8>, FeedError> {
        let responses = self.responses.lock().expect("mock lock poisoned");
        match responses.get(&group.id) {
            Some(Canned::Bytes(bytes)) => Ok(bytes.clone()),
            Some(Canned::Fail) => Err(FeedError::Status {
                group: group.id.clone(),
                status: 503,
            }),
            None => Err(FeedError::Status {
                group: group.id.clone(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_canned_bytes() {
        let mock = MockFeedSource::new();
        mock.set_bytes("numbers", vec![1, 2, 3]);

        let group = FeedGroup::new("numbers", "unused");
        assert_eq!(mock.fetch(&group).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unknown_and_failing_groups_error() {
        let mock = MockFeedSource::new();
        mock.set_failure("ace");

        assert!(mock.fetch(&FeedGroup::new("ace", "unused")).await.is_err());
        assert!(mock.fetch(&FeedGroup::new("l", "unused")).await.is_err());
    }

    #[tokio::test]
    async fn responses_can_be_swapped_between_fetches() {
        let mock = MockFeedSource::new();
        let group = FeedGroup::new("numbers", "unused");

        mock.set_bytes("numbers", vec![1]);
        assert!(mock.fetch(&group).await.is_ok());

        mock.set_failure("numbers");
        assert!(mock.fetch(&group).await.is_err());
    }
}
