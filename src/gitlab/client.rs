//! GitLab API client
//!
//! Thin typed HTTP client over the GitLab REST API. Every call is a single
//! request; failures are returned to the caller as they happen.

use crate::auth::BoxedAuthProvider;
use crate::config::GitLabConfig;
use crate::error::{GitLabError, GitLabResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// GitLab API client
///
/// Built once from configuration and shared by reference (`Arc`) with every
/// tool invocation. Holds no mutable state.
pub struct GitLabClient {
    http: Client,
    base_url: String,
    auth: BoxedAuthProvider,
}

impl GitLabClient {
    /// Create a new GitLab client from configuration
    ///
    /// No request is made here; the token is first checked by GitLab on the
    /// first real call.
    pub fn new(config: &GitLabConfig, auth: BoxedAuthProvider) -> GitLabResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .user_agent(format!("gitlab-gateway/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GitLabError::Request)?;

        debug!(
            base_url = %config.api_url(),
            auth = auth.auth_type(),
            "Created GitLab client"
        );

        Ok(Self {
            http,
            base_url: config.api_url(),
            auth,
        })
    }

    /// API base URL, e.g. `https://gitlab.com/api/v4`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an API endpoint
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add authentication to a request
    async fn authenticate(&self, request: RequestBuilder) -> GitLabResult<RequestBuilder> {
        let header = self
            .auth
            .get_auth_header()
            .await
            .map_err(|_| GitLabError::Unauthorized)?;

        Ok(request.header(header.header_name(), header.header_value()))
    }

    /// Send a request once and classify the response
    async fn execute(&self, request: RequestBuilder) -> GitLabResult<Response> {
        let request = self.authenticate(request).await?;
        let response = request.send().await.inspect_err(|e| {
            warn!(error = %e, "Request to GitLab failed");
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "GitLab returned an error");

        Err(GitLabError::from_response(status.as_u16(), &body))
    }

    /// Decode a JSON response body
    async fn decode<T: DeserializeOwned>(response: Response) -> GitLabResult<T> {
        response
            .json()
            .await
            .map_err(|e| GitLabError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Make a GET request
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> GitLabResult<T> {
        let response = self.execute(self.http.get(self.url(endpoint))).await?;
        Self::decode(response).await
    }

    /// Make a POST request with a JSON body
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<T> {
        let response = self
            .execute(self.http.post(self.url(endpoint)).json(body))
            .await?;
        Self::decode(response).await
    }

    /// Make a PUT request with a JSON body
    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> GitLabResult<T> {
        let response = self
            .execute(self.http.put(self.url(endpoint)).json(body))
            .await?;
        Self::decode(response).await
    }

    /// URL-encode a project ID or namespaced path for use in API endpoints
    pub fn encode_project(project: &str) -> String {
        urlencoding::encode(project).to_string()
    }

    /// URL-encode a repository file path (slashes included)
    pub fn encode_file_path(path: &str) -> String {
        urlencoding::encode(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PatProvider;

    #[test]
    fn test_encode_project() {
        assert_eq!(
            GitLabClient::encode_project("group/project"),
            "group%2Fproject"
        );
        assert_eq!(
            GitLabClient::encode_project("group/subgroup/project"),
            "group%2Fsubgroup%2Fproject"
        );
        assert_eq!(GitLabClient::encode_project("42"), "42");
    }

    #[test]
    fn test_encode_file_path() {
        assert_eq!(
            GitLabClient::encode_file_path("src/lib/app.rs"),
            "src%2Flib%2Fapp.rs"
        );
    }

    #[test]
    fn test_new_does_not_touch_network() {
        let config = GitLabConfig {
            url: "https://gitlab.invalid".to_string(),
            ..Default::default()
        };
        let auth = PatProvider::new("glpat-test").unwrap();
        let client = GitLabClient::new(&config, Box::new(auth)).unwrap();
        assert_eq!(client.base_url(), "https://gitlab.invalid/api/v4");
    }
}
