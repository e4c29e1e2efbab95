use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::LookupError;
use crate::models::{VideoResult, VideoSettings};

/// Remote video search consumed by the recorder.
#[async_trait]
pub trait VideoLookup: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoResult>, LookupError>;
}

// ─── YouTube Data API ───

#[derive(Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<SearchSnippet>,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct SearchSnippet {
    title: Option<String>,
}

/// Client for the YouTube `search` endpoint, restricted to embeddable HD videos.
pub struct YouTubeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fitness-recorder/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(settings: &VideoSettings, api_key: &str) -> Result<Self, LookupError> {
        Self::new(&settings.endpoint, api_key, Duration::from_secs(settings.timeout_secs))
    }
}

#[async_trait]
impl VideoLookup for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoResult>, LookupError> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("part", "snippet"),
                ("type", "video"),
                ("videoDefinition", "high"),
                ("videoEmbeddable", "true"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| LookupError::Transport(e.to_string()))?;

        if !status.is_success() {
            // Google reports a bad key as 400 with reason `keyInvalid`.
            let rejected_key = status == reqwest::StatusCode::BAD_REQUEST
                && (text.contains("keyInvalid") || text.contains("API key not valid"));
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
                || rejected_key
            {
                return Err(LookupError::Auth {
                    status: status.as_u16(),
                    message: text,
                });
            }
            return Err(LookupError::Transport(format!("API error {}: {}", status, text)));
        }

        let parsed: SearchResponse =
            serde_json::from_str(&text).map_err(|e| LookupError::MalformedResult(e.to_string()))?;
        let items = parsed.items.ok_or_else(|| {
            LookupError::MalformedResult("response has no `items` array".to_string())
        })?;

        if items.is_empty() {
            return Ok(Vec::new());
        }

        let total = items.len();
        let results: Vec<VideoResult> = items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id?.video_id.filter(|id| !id.trim().is_empty())?;
                Some(VideoResult {
                    video_id,
                    title: item.snippet.and_then(|s| s.title),
                })
            })
            .collect();

        if results.is_empty() {
            return Err(LookupError::MalformedResult(format!(
                "none of {} items carries a video id",
                total
            )));
        }
        if results.len() < total {
            log::warn!("Skipped {} search results without a video id", total - results.len());
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> YouTubeClient {
        let endpoint = format!("{}/youtube/v3/search", server.uri());
        YouTubeClient::new(endpoint, "test-key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_the_search_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/search"))
            .and(query_param("q", "cute kittens shorts"))
            .and(query_param("part", "snippet"))
            .and(query_param("type", "video"))
            .and(query_param("videoDefinition", "high"))
            .and(query_param("videoEmbeddable", "true"))
            .and(query_param("maxResults", "50"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "id": { "kind": "youtube#video", "videoId": "abc" },
                        "snippet": { "title": "Kitten" }
                    },
                    { "id": { "kind": "youtube#video", "videoId": "def" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client(&server).search("cute kittens shorts", 50).await.unwrap();
        assert_eq!(
            results,
            vec![
                VideoResult { video_id: "abc".into(), title: Some("Kitten".into()) },
                VideoResult { video_id: "def".into(), title: None },
            ]
        );
    }

    #[tokio::test]
    async fn empty_items_are_not_an_error_here() {
        let server = MockServer::start().await;
        let body = serde_json::json!({ "items": [] });
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        assert!(client(&server).search("q", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn items_without_ids_are_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [ { "id": { "kind": "youtube#channel", "channelId": "xyz" } } ]
            })))
            .mount(&server)
            .await;

        let err = client(&server).search("q", 50).await.unwrap_err();
        assert!(matches!(err, LookupError::MalformedResult(_)));
    }

    #[tokio::test]
    async fn missing_items_array_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).search("q", 50).await.unwrap_err();
        assert!(matches!(err, LookupError::MalformedResult(_)));
    }

    #[tokio::test]
    async fn forbidden_is_an_auth_fault() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
            .mount(&server)
            .await;

        let err = client(&server).search("q", 50).await.unwrap_err();
        assert!(matches!(err, LookupError::Auth { status: 403, .. }));
    }

    #[tokio::test]
    async fn invalid_key_is_an_auth_fault() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "errors": [ { "reason": "keyInvalid" } ]
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server).search("q", 50).await.unwrap_err();
        assert!(matches!(err, LookupError::Auth { status: 400, .. }));
    }

    #[tokio::test]
    async fn server_errors_are_transport_faults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).search("q", 50).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_fault() {
        let client =
            YouTubeClient::new("http://127.0.0.1:9/search", "k", Duration::from_secs(2)).unwrap();
        let err = client.search("q", 1).await.unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
    }
}
