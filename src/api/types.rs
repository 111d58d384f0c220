//! api::types
//!
//! Response and request shapes of the config server endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of `GET /api/configs/patterns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSummary {
    pub id: String,
    pub version: i64,
    pub display_name: String,
    pub feed_url_hint: String,
    pub playlist_count: u64,
}

/// One episode of a parsed feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEpisode {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub season_number: Option<i64>,
    #[serde(default)]
    pub episode_number: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedResponse {
    pub episodes: Vec<FeedEpisode>,
}

/// Body of `POST /api/configs/preview`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest<'a> {
    pub config: &'a Value,
    pub feed_url: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pattern_summary_from_server_json() {
        let summary: PatternSummary = serde_json::from_value(json!({
            "id": "rebuild",
            "version": 1,
            "displayName": "Rebuild",
            "feedUrlHint": "https://feeds.example.com/rebuild",
            "playlistCount": 3
        }))
        .unwrap();
        assert_eq!(summary.display_name, "Rebuild");
        assert_eq!(summary.playlist_count, 3);
    }

    #[test]
    fn feed_episode_optional_fields() {
        let episode: FeedEpisode = serde_json::from_value(json!({
            "id": 7,
            "title": "Episode 7",
            "seasonNumber": null
        }))
        .unwrap();
        assert_eq!(episode.id, 7);
        assert!(episode.season_number.is_none());
        assert!(episode.guid.is_none());
    }

    #[test]
    fn preview_request_shape() {
        let config = json!({"id": "p1"});
        let body = serde_json::to_value(PreviewRequest {
            config: &config,
            feed_url: "https://feed",
        })
        .unwrap();
        assert_eq!(body, json!({"config": {"id": "p1"}, "feedUrl": "https://feed"}));
    }
}
