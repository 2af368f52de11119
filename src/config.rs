// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Configuration is read once at startup and handed to every handler through
//! [`crate::AppState`].

use std::env;
use std::path::PathBuf;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_GITHUB_OAUTH_URL: &str = "https://github.com/login/oauth";
const DEFAULT_FULLSTORY_API_URL: &str = "https://www.fullstory.com/api/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Page settings (non-sensitive) ---
    /// Cesium Ion access token rendered into the landing page
    pub cesium_key: String,
    /// Directory holding the ISS LIS NetCDF files
    pub data_dir: PathBuf,
    /// Date of the dataset shown on the landing page
    pub date: String,
    /// FullStory org code rendered into the landing page
    pub fs_org_code: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Tracking repository ---
    pub github_repo_owner: String,
    pub github_repo_name: String,
    /// GitHub logins allowed to read the session correlation report
    pub admin_logins: Vec<String>,

    // --- Upstream endpoints (overridable for tests) ---
    pub github_api_url: String,
    pub github_oauth_url: String,
    pub fullstory_api_url: String,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout_secs: u64,

    // --- Storage ---
    pub database_url: String,

    // --- Secrets ---
    /// Server secret used to sign sessions and OAuth state and to derive uids
    pub secret_key: Vec<u8>,
    /// GitHub OAuth app client ID
    pub github_client_id: String,
    /// GitHub OAuth app client secret
    pub github_client_secret: String,
    /// Service token used to read and file issues on the tracking repository
    pub github_access_token: String,
    /// FullStory REST API key
    pub fullstory_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            cesium_key: required("CESIUM_KEY")?,
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string())),
            date: env::var("DATE").unwrap_or_else(|_| "2019-03-04".to_string()),
            fs_org_code: env::var("FULLSTORY_ORG_CODE").unwrap_or_default(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            github_repo_owner: required("GITHUB_REPO_OWNER")?,
            github_repo_name: required("GITHUB_REPO_NAME")?,
            admin_logins: parse_list(&env::var("ADMIN_LOGINS").unwrap_or_default()),

            github_api_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
            github_oauth_url: env::var("GITHUB_OAUTH_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_OAUTH_URL.to_string()),
            fullstory_api_url: env::var("FULLSTORY_API_URL")
                .unwrap_or_else(|_| DEFAULT_FULLSTORY_API_URL.to_string()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://lightning.db?mode=rwc".to_string()),

            secret_key: required("SECRET_KEY")?.into_bytes(),
            github_client_id: required("GITHUB_CLIENT_ID")?,
            github_client_secret: required("GITHUB_CLIENT_SECRET")?,
            github_access_token: required("GITHUB_ACCESS_TOKEN")?,
            fullstory_api_key: env::var("FULLSTORY_API_KEY")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            cesium_key: "test_cesium_key".to_string(),
            data_dir: PathBuf::from("data"),
            date: "2019-03-04".to_string(),
            fs_org_code: "TEST1".to_string(),
            frontend_url: "http://localhost:8080".to_string(),
            port: 8080,
            github_repo_owner: "test-owner".to_string(),
            github_repo_name: "test-repo".to_string(),
            admin_logins: vec!["octocat".to_string()],
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_oauth_url: DEFAULT_GITHUB_OAUTH_URL.to_string(),
            fullstory_api_url: DEFAULT_FULLSTORY_API_URL.to_string(),
            http_timeout_secs: 5,
            database_url: "sqlite::memory:".to_string(),
            secret_key: b"test_secret_key_32_bytes_minimum!".to_vec(),
            github_client_id: "test_client_id".to_string(),
            github_client_secret: "test_client_secret".to_string(),
            github_access_token: "test_service_token".to_string(),
            fullstory_api_key: "test_fs_key".to_string(),
        }
    }

    /// Whether the given GitHub login may read operator-only reports.
    pub fn is_admin(&self, login: &str) -> bool {
        self.admin_logins
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(login))
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| ConfigError::Missing(name))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
