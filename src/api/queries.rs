//! api::queries
//!
//! Typed helpers for the config server endpoints.

use serde_json::Value;

use super::client::ApiClient;
use super::errors::ApiError;
use super::types::{FeedEpisode, FeedResponse, PatternSummary, PreviewRequest};

/// Path of the pattern list.
pub const PATTERNS_PATH: &str = "/api/configs/patterns";

impl ApiClient {
    /// `GET /api/configs/patterns`
    pub async fn list_patterns(&self) -> Result<Vec<PatternSummary>, ApiError> {
        self.get(PATTERNS_PATH).await
    }

    /// `GET /api/configs/patterns/{id}/assembled`: the pattern with its
    /// playlists inlined, as the editor works on it.
    pub async fn assembled_config(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&assembled_path(id)).await
    }

    /// `GET /api/feeds?url=...`: the episodes of a feed.
    pub async fn feed_episodes(&self, feed_url: &str) -> Result<Vec<FeedEpisode>, ApiError> {
        let response: FeedResponse = self.get(&feed_path(feed_url)).await?;
        Ok(response.episodes)
    }

    /// `POST /api/configs/preview`: run a config against a feed without saving.
    pub async fn preview(&self, config: &Value, feed_url: &str) -> Result<Value, ApiError> {
        let body = PreviewRequest { config, feed_url };
        self.post("/api/configs/preview", Some(&body)).await
    }
}

fn assembled_path(id: &str) -> String {
    format!("{}/{}/assembled", PATTERNS_PATH, urlencoding::encode(id))
}

fn feed_path(feed_url: &str) -> String {
    format!("/api/feeds?url={}", urlencoding::encode(feed_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembled_path_encodes_id() {
        assert_eq!(assembled_path("p1"), "/api/configs/patterns/p1/assembled");
        assert_eq!(
            assembled_path("a b"),
            "/api/configs/patterns/a%20b/assembled"
        );
    }

    #[test]
    fn feed_path_encodes_url() {
        assert_eq!(
            feed_path("https://example.com/feed.xml?x=1"),
            "/api/feeds?url=https%3A%2F%2Fexample.com%2Ffeed.xml%3Fx%3D1"
        );
    }
}
