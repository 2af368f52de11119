// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub API client.
//!
//! Handles:
//! - OAuth authorize URL and code exchange
//! - Profile lookup for the signed-in user
//! - Tracking repository metadata, open issues and issue creation

use crate::config::Config;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("lightning-feedback/", env!("CARGO_PKG_VERSION"));
const ISSUES_PER_PAGE: usize = 100;
/// Scope needed to read the user's email.
const OAUTH_SCOPE: &str = "user:email";

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl GitHubClient {
    /// Create a client using the OAuth app credentials and endpoints in `config`.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            oauth_url: config.github_oauth_url.trim_end_matches('/').to_string(),
            client_id: config.github_client_id.clone(),
            client_secret: config.github_client_secret.clone(),
        })
    }

    // ─── OAuth ───────────────────────────────────────────────────

    /// URL the browser is sent to in order to grant access.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}&scope={}&state={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Returns `None` when GitHub declines the code (expired, reused, ...).
    pub async fn exchange_code(&self, code: &str) -> Result<Option<String>, AppError> {
        let response = self
            .http
            .post(format!("{}/access_token", self.oauth_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Token exchange failed: {}", e)))?;

        let token: TokenExchangeResponse = check_response_json(response).await?;
        if let Some(error) = token.error {
            tracing::warn!(
                error = %error,
                description = token.error_description.as_deref().unwrap_or(""),
                "GitHub declined authorization code"
            );
            return Ok(None);
        }
        Ok(token.access_token.filter(|t| !t.is_empty()))
    }

    // ─── API Calls ───────────────────────────────────────────────

    /// Get the profile of the user owning `access_token`.
    pub async fn get_user(&self, access_token: &str) -> Result<GitHubUser, AppError> {
        let raw: serde_json::Value = self
            .get_json(&format!("{}/user", self.api_url), Some(access_token))
            .await?;
        let profile: GitHubProfile = serde_json::from_value(raw.clone())
            .map_err(|e| AppError::GitHubApi(format!("Unexpected profile shape: {}", e)))?;
        Ok(GitHubUser { profile, raw })
    }

    /// Get repository metadata. Anonymous when `access_token` is `None`.
    pub async fn get_repo(
        &self,
        access_token: Option<&str>,
        owner: &str,
        name: &str,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/repos/{}/{}", self.api_url, owner, name);
        self.get_json(&url, access_token).await
    }

    /// List every open issue of a repository, following pagination.
    pub async fn list_open_issues(
        &self,
        access_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<Vec<GitHubIssue>, AppError> {
        let url = format!("{}/repos/{}/{}/issues", self.api_url, owner, name);
        let mut issues = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self
                .http
                .get(&url)
                .bearer_auth(access_token)
                .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                .query(&[
                    ("state", "open".to_string()),
                    ("per_page", ISSUES_PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ])
                .send()
                .await
                .map_err(|e| AppError::GitHubApi(e.to_string()))?;

            let batch: Vec<GitHubIssue> = check_response_json(response).await?;
            let batch_len = batch.len();
            issues.extend(batch);

            if batch_len < ISSUES_PER_PAGE {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = issues.len(), "Fetched open issues");
        Ok(issues)
    }

    /// File a new issue.
    pub async fn create_issue(
        &self,
        access_token: &str,
        owner: &str,
        name: &str,
        issue: &NewIssue,
    ) -> Result<CreatedIssue, AppError> {
        let response = self
            .http
            .post(format!("{}/repos/{}/{}/issues", self.api_url, owner, name))
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(issue)
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        let created: CreatedIssue = check_response_json(response).await?;
        tracing::info!(issue_id = created.id, url = %created.html_url, "Created GitHub issue");
        Ok(created)
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: Option<&str>,
    ) -> Result<T, AppError> {
        let mut request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Unauthorized - token revoked or expired
        if status.as_u16() == 401 {
            return Err(AppError::GitHubApi(AppError::GITHUB_TOKEN_ERROR.to_string()));
        }

        return Err(AppError::GitHubApi(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::GitHubApi(format!("JSON parse error: {}", e)))
}

/// Response of the OAuth code exchange.
#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Fields of the GitHub profile this server relies on.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubProfile {
    pub id: i64,
    pub login: String,
    pub email: Option<String>,
}

/// GitHub profile, typed and as returned by the API.
#[derive(Debug, Clone)]
pub struct GitHubUser {
    pub profile: GitHubProfile,
    pub raw: serde_json::Value,
}

/// Open issue from the tracking repository.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
    pub id: u64,
    pub number: u64,
    pub html_url: String,
    pub body: Option<String>,
}

/// Issue creation request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

/// Issue creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub id: u64,
    pub number: u64,
    pub html_url: String,
}
