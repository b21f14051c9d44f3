//! GitHub REST API client implementation.
//!
//! This module provides the HTTP client behind every gateway trait.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{ConfigError, Error, GatewayError, GatewayResult, Result};

use super::gateway::{
    ActionsGateway, BranchProtectionGateway, EnvGateway, LabelGateway, PagesGateway, RepoGateway,
};
use super::types::{
    ActionsPermissions, ApiErrorBody, BranchProtection, Label, Pages, Repository, SecretList,
    SelectedActions, Variable, VariableList, WorkflowPermissions,
};

/// GitHub API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// REST API version sent with every request.
const API_VERSION: &str = "2022-11-28";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// Fallback wait reported when a rate limit response carries no hint.
const DEFAULT_RATE_LIMIT_SECS: u64 = 60;

/// Upper bound on pages fetched from a list endpoint.
const MAX_PAGES: usize = 100;

/// GitHub REST API client scoped to one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// HTTP client with auth headers preset.
    client: Client,
    /// API base URL without trailing slash.
    base_url: String,
    /// Repository owner.
    owner: String,
    /// Repository name.
    repo: String,
    /// Base delay for linear backoff.
    retry_delay: Duration,
}

impl GitHubClient {
    /// Creates a client for `owner/repo` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be created.
    pub fn new(token: &str, owner: &str, repo: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ConfigError::validation("Token contains characters not allowed in a header", "token")
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: GITHUB_API_URL.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Points the client at another API base, e.g. GitHub Enterprise.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the base retry delay.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Returns `owner/repo`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.owner, self.repo)
    }

    /// Performs a GET with retries on transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                debug!("Retry attempt {attempt} of {MAX_RETRIES} for {path}");
                tokio::time::sleep(self.retry_delay * attempt).await;
            }

            match self.get_once::<T>(path).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() => {
                    debug!(
                        "{path} failed with a retryable error ({e}), suggested wait {:?}s",
                        e.retry_delay_secs()
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| GatewayError::network("Max retries exceeded")))
    }

    /// Performs a single GET.
    async fn get_once<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = format!("{}{path}", self.base_url);
        trace!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        trace!("GET {url} -> {status}");

        if !status.is_success() {
            return Err(error_from_response(path, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::invalid_response(format!("Failed to parse response: {e}")))
    }

    /// Collects every page of a list endpoint.
    async fn get_paginated<P, T, F>(
        &self,
        path: &str,
        per_page: usize,
        mut unwrap_page: F,
    ) -> GatewayResult<Vec<T>>
    where
        P: DeserializeOwned + Send,
        F: FnMut(P) -> Vec<T> + Send,
        T: Send,
    {
        let mut items = Vec::new();

        for page in 1..=MAX_PAGES {
            let url = format!("{path}?per_page={per_page}&page={page}");
            let batch = unwrap_page(self.get_json::<P>(&url).await?);
            let last = batch.len() < per_page;
            items.extend(batch);
            if last {
                break;
            }
        }

        Ok(items)
    }
}

/// Maps a non-success response to the gateway error taxonomy.
async fn error_from_response(resource: &str, response: Response) -> GatewayError {
    let status = response.status();
    let headers = response.headers();

    let retry_after = headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());
    let exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && (exhausted || retry_after.is_some()))
    {
        return GatewayError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RATE_LIMIT_SECS),
        };
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::PermissionDenied { message }
        }
        StatusCode::NOT_FOUND => GatewayError::NotFound {
            resource: resource.to_string(),
            message,
        },
        _ => GatewayError::transport(status.as_u16(), message),
    }
}

#[async_trait]
impl RepoGateway for GitHubClient {
    async fn get_repo(&self) -> GatewayResult<Repository> {
        self.get_json(&self.repo_path("")).await
    }
}

#[async_trait]
impl BranchProtectionGateway for GitHubClient {
    async fn get_branch_protection(&self, branch: &str) -> GatewayResult<BranchProtection> {
        let path = self.repo_path(&format!("/branches/{branch}/protection"));
        match self.get_json(&path).await {
            Err(GatewayError::NotFound { message, .. })
                if message.to_lowercase().contains("not protected") =>
            {
                Err(GatewayError::BranchNotProtected {
                    branch: branch.to_string(),
                })
            }
            other => other,
        }
    }
}

#[async_trait]
impl LabelGateway for GitHubClient {
    async fn get_labels(&self) -> GatewayResult<Vec<Label>> {
        self.get_paginated(&self.repo_path("/labels"), 100, |page: Vec<Label>| page)
            .await
    }
}

#[async_trait]
impl EnvGateway for GitHubClient {
    async fn get_secrets(&self) -> GatewayResult<Vec<String>> {
        self.get_paginated(&self.repo_path("/actions/secrets"), 100, |page: SecretList| {
            page.secrets.into_iter().map(|s| s.name).collect()
        })
        .await
    }

    async fn get_variables(&self) -> GatewayResult<Vec<Variable>> {
        self.get_paginated(&self.repo_path("/actions/variables"), 30, |page: VariableList| {
            page.variables
        })
        .await
    }
}

#[async_trait]
impl ActionsGateway for GitHubClient {
    async fn get_actions_permissions(&self) -> GatewayResult<ActionsPermissions> {
        self.get_json(&self.repo_path("/actions/permissions")).await
    }

    async fn get_actions_selected_actions(&self) -> GatewayResult<SelectedActions> {
        self.get_json(&self.repo_path("/actions/permissions/selected-actions"))
            .await
    }

    async fn get_actions_workflow_permissions(&self) -> GatewayResult<WorkflowPermissions> {
        self.get_json(&self.repo_path("/actions/permissions/workflow"))
            .await
    }
}

#[async_trait]
impl PagesGateway for GitHubClient {
    async fn get_pages(&self) -> GatewayResult<Pages> {
        match self.get_json(&self.repo_path("/pages")).await {
            Err(GatewayError::NotFound { .. }) => Err(GatewayError::PagesNotEnabled),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header as header_matcher, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::new("test-token", "acme", "widget")
            .expect("client should build")
            .with_base_url(server.uri())
            .with_retry_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_get_repo_sends_auth_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget"))
            .and(header_matcher("authorization", "Bearer test-token"))
            .and(header_matcher("x-github-api-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "full_name": "acme/widget",
                "description": null,
                "visibility": "public",
                "allow_squash_merge": true,
                "topics": ["rust", "cli"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let repo = client_for(&server).get_repo().await.expect("repo");

        assert_eq!(repo.full_name, "acme/widget");
        assert!(repo.description.is_null());
        assert!(repo.allow_squash_merge);
        assert_eq!(repo.topics, vec!["rust", "cli"]);
    }

    #[tokio::test]
    async fn test_labels_follow_pages() {
        let server = MockServer::start().await;
        let full_page: Vec<_> = (0..100)
            .map(|i| json!({"name": format!("label-{i}"), "color": "ffffff"}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/labels"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(full_page))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/labels"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "bug", "color": "d73a4a", "description": "Something is broken"}
            ])))
            .mount(&server)
            .await;

        let labels = client_for(&server).get_labels().await.expect("labels");

        assert_eq!(labels.len(), 101);
        assert_eq!(labels[100].name, "bug");
    }

    #[tokio::test]
    async fn test_secret_names_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/actions/secrets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 2,
                "secrets": [{"name": "API_KEY", "created_at": "x"}, {"name": "DEPLOY_KEY"}]
            })))
            .mount(&server)
            .await;

        let secrets = client_for(&server).get_secrets().await.expect("secrets");

        assert_eq!(secrets, vec!["API_KEY", "DEPLOY_KEY"]);
    }

    #[tokio::test]
    async fn test_unprotected_branch_is_a_signal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/branches/main/protection"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Branch not protected"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_branch_protection("main")
            .await
            .expect_err("should be absent");

        assert_eq!(
            err,
            GatewayError::BranchNotProtected {
                branch: String::from("main")
            }
        );
    }

    #[tokio::test]
    async fn test_missing_branch_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/branches/nope/protection"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Branch not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_branch_protection("nope")
            .await
            .expect_err("should fail");

        assert!(matches!(err, GatewayError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_pages_not_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/pages"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let err = client_for(&server).get_pages().await.expect_err("absent");

        assert_eq!(err, GatewayError::PagesNotEnabled);
    }

    #[tokio::test]
    async fn test_unauthorized_is_permission_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/actions/variables"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_variables()
            .await
            .expect_err("denied");

        assert_eq!(
            err,
            GatewayError::PermissionDenied {
                message: String::from("Bad credentials")
            }
        );
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/actions/permissions"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "0")
                    .set_body_json(json!({"message": "API rate limit exceeded"})),
            )
            .expect(u64::from(MAX_RETRIES))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_actions_permissions()
            .await
            .expect_err("rate limited");

        assert_eq!(
            err,
            GatewayError::RateLimited {
                retry_after_secs: DEFAULT_RATE_LIMIT_SECS
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/actions/permissions/workflow"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_actions_workflow_permissions()
            .await
            .expect_err("transport");

        assert_eq!(err, GatewayError::transport(502, "bad gateway"));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/actions/permissions/selected-actions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_actions_selected_actions()
            .await
            .expect_err("invalid");

        assert!(matches!(err, GatewayError::InvalidResponse { .. }));
    }
}
