// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FullStory REST API client for session-replay lookups.

use crate::config::Config;
use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

/// FullStory session lookup client.
#[derive(Clone)]
pub struct FullStoryClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// One FullStory session as returned by `/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct FullStorySession {
    #[serde(rename = "FsUrl")]
    pub fs_url: String,
}

impl FullStoryClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            api_url: config.fullstory_api_url.trim_end_matches('/').to_string(),
            api_key: config.fullstory_api_key.clone(),
        })
    }

    /// Replay URLs of up to `limit` sessions identified as `uid`.
    ///
    /// A non-success status (typically a rejected API key) yields an empty
    /// list rather than failing the caller.
    pub async fn session_urls(&self, uid: &str, limit: usize) -> Result<Vec<String>, AppError> {
        let response = self
            .http
            .post(format!("{}/sessions", self.api_url))
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", self.api_key))
            .json(&serde_json::json!({ "uid": uid, "limit": limit }))
            .send()
            .await
            .map_err(|e| AppError::SessionReplayApi(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                "FullStory session lookup rejected, reporting no sessions"
            );
            return Ok(Vec::new());
        }

        let sessions: Vec<FullStorySession> = response
            .json()
            .await
            .map_err(|e| AppError::SessionReplayApi(format!("JSON parse error: {}", e)))?;

        Ok(sessions.into_iter().take(limit).map(|s| s.fs_url).collect())
    }
}
