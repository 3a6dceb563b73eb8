//! Typed HTTP client for the test server's REST API.
//!
//! All endpoint helpers go through [`ApiClient::fetch_json`], which maps a
//! GET request plus JSON-decoded body to a typed value and classifies every
//! failure into the [`FetchError`] taxonomy.

use crate::models::{Author, Comment, Post};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Connect timeout applied to every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A failed fetch, classified by where in the request lifecycle it failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Protocol { url: String, status: StatusCode },

    /// The response body does not parse into the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Client for the post/comment/author endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against `base_url` with the given total-request timeout.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET `url` and decode the JSON body into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!("{} -> {}", url, status);

        if !status.is_success() {
            return Err(FetchError::Protocol {
                url: url.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Fetch the full post collection.
    pub async fn posts(&self) -> Result<Vec<Post>, FetchError> {
        let url = format!("{}/api/slow/posts", self.base_url);
        self.fetch_json(&url).await
    }

    /// Fetch the comments of one post, in server order.
    pub async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, FetchError> {
        let url = format!("{}/api/slow/posts/{}/comments", self.base_url, post_id);
        self.fetch_json(&url).await
    }

    /// Fetch a single author record. Non-2xx (e.g. not found) is a [`FetchError::Protocol`].
    pub async fn author(&self, author_id: i64) -> Result<Author, FetchError> {
        let url = format!("{}/api/authors/{}", self.base_url, author_id);
        self.fetch_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn author_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "avatar": format!("https://example.com/{}.png", id)
        })
    }

    #[tokio::test]
    async fn test_author_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/authors/10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(author_json(10, "Alice")))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5);
        let author = client.author(10).await.unwrap();
        assert_eq!(author.id, 10);
        assert_eq!(author.name, "Alice");
    }

    #[tokio::test]
    async fn test_posts_hits_slow_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5);
        let posts = client.posts().await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/authors/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5);
        let err = client.author(404).await.unwrap_err();
        match err {
            FetchError::Protocol { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("expected Protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failing_post_list_returns_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow/posts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5);
        assert!(matches!(
            client.posts().await.unwrap_err(),
            FetchError::Protocol { .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/authors/10"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5);
        let err = client.author(10).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 1 is never bound in the test environment.
        let client = ApiClient::new("http://127.0.0.1:1", 5);
        let err = client.posts().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/", server.uri()), 5);
        assert!(client.posts().await.is_ok());
    }
}
