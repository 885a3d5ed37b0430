//! GitLab API client
//!
//! Provides an HTTP client for the GitLab REST API. Each method performs
//! exactly one request: no retries, no backoff, no pagination. Non-success
//! responses surface as `GitLabError::Upstream` with the status code and body
//! preserved; failures of the HTTP call itself surface as
//! `GitLabError::Transport`.

use crate::config::GitLabConfig;
use crate::error::{GitLabError, GitLabResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// GitLab API client
pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GitLabClient {
    /// Create a new GitLab client from configuration
    pub fn new(config: &GitLabConfig) -> GitLabResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("gitlab-mcp/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitLabError::Transport)?;

        Ok(Self {
            http,
            base_url: config.api_url(),
            token: config.token.clone().unwrap_or_default(),
        })
    }

    /// Build a URL for an API endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add authentication to a request
    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("PRIVATE-TOKEN", &self.token)
    }

    /// Send a request and map the response status
    async fn execute(&self, request: RequestBuilder) -> GitLabResult<Response> {
        let response = request.send().await.map_err(GitLabError::Transport)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "GitLab returned an error");
        Err(GitLabError::from_response(status.as_u16(), &body))
    }

    /// Make a GET request, returning the raw JSON value
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get(&self, endpoint: &str) -> GitLabResult<Value> {
        let request = self.authenticate(self.http.get(self.url(endpoint)));
        let response = self.execute(request).await?;

        response.json().await.map_err(|e| {
            GitLabError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }

    /// Make a POST request with a JSON body, returning the raw JSON value
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<Value> {
        let request = self.authenticate(self.http.post(self.url(endpoint)).json(body));
        let response = self.execute(request).await?;

        response.json().await.map_err(|e| {
            GitLabError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }

    /// URL-encode a project path for use in API endpoints
    pub fn encode_project(project: &str) -> String {
        urlencoding::encode(project).to_string()
    }
}
