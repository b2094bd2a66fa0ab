//! Latest-release lookup against the GitHub REST API.

use async_trait::async_trait;
use reqwest::Client;
use setup_task_core::tools::{Release, ReleaseIndex};
use setup_task_core::{Error, Result};
use tracing::debug;

use crate::TASK_REPOSITORY;

/// Public GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Release index backed by `GET /repos/{owner}/{repo}/releases/latest`.
pub struct GitHubReleaseIndex {
    client: Client,
    api_base: String,
}

impl GitHubReleaseIndex {
    /// Create an index querying [`DEFAULT_API_BASE`].
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Query a different API endpoint (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// URL of the latest-release endpoint.
    #[must_use]
    pub fn latest_url(&self) -> String {
        format!(
            "{}/repos/{TASK_REPOSITORY}/releases/latest",
            self.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ReleaseIndex for GitHubReleaseIndex {
    async fn latest_release(&self, token: Option<&str>) -> Result<Release> {
        let url = self.latest_url();
        debug!(%url, authenticated = token.is_some(), "Fetching latest release");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::network(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::network(format!("{url} returned HTTP {status}")));
        }

        response
            .json::<Release>()
            .await
            .map_err(|e| Error::network(format!("invalid release JSON from {url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn index(server: &MockServer) -> GitHubReleaseIndex {
        GitHubReleaseIndex::new(crate::http_client().unwrap()).with_api_base(server.uri())
    }

    #[test]
    fn test_latest_url() {
        let index = GitHubReleaseIndex::new(Client::new()).with_api_base("https://ghe.example/api/v3/");
        assert_eq!(
            index.latest_url(),
            "https://ghe.example/api/v3/repos/go-task/task/releases/latest"
        );
    }

    #[tokio::test]
    async fn test_latest_release() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/go-task/task/releases/latest"))
            .and(header("user-agent", "setup-task"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tag_name": "v3.43.1",
                "name": "v3.43.1",
                "assets": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let release = index(&server).latest_release(None).await.unwrap();
        assert_eq!(release.tag_name.as_deref(), Some("v3.43.1"));
    }

    #[tokio::test]
    async fn test_latest_release_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/go-task/task/releases/latest"))
            .and(header("authorization", "Bearer ghp_secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"tag_name": "v3.0.0"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let release = index(&server)
            .latest_release(Some("ghp_secret"))
            .await
            .unwrap();
        assert_eq!(release.tag_name.as_deref(), Some("v3.0.0"));
    }

    #[tokio::test]
    async fn test_latest_release_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = index(&server).latest_release(None).await.unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_latest_release_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = index(&server).latest_release(None).await.unwrap_err();
        assert!(matches!(err, Error::Network { .. }));
        assert!(err.to_string().contains("invalid release JSON"));
    }

    #[tokio::test]
    async fn test_latest_release_without_tag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .mount(&server)
            .await;

        let release = index(&server).latest_release(None).await.unwrap();
        assert!(release.tag_name.is_none());
    }
}
