// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("FullStory API error: {0}")]
    SessionReplayApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Marker used when GitHub rejects the stored OAuth token.
    pub const GITHUB_TOKEN_ERROR: &'static str = "GitHub token invalid or revoked";

    /// Check whether this error means the caller's GitHub token is no longer valid.
    pub fn is_github_token_error(&self) -> bool {
        matches!(self, AppError::GitHubApi(msg) if msg == Self::GITHUB_TOKEN_ERROR)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<crate::lightning::DatasetError> for AppError {
    fn from(err: crate::lightning::DatasetError) -> Self {
        AppError::Dataset(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::GitHubApi(msg) => {
                tracing::warn!(error = %msg, "GitHub API error");
                (StatusCode::BAD_GATEWAY, "github_error", Some(msg.clone()))
            }
            AppError::SessionReplayApi(msg) => {
                tracing::warn!(error = %msg, "FullStory API error");
                (StatusCode::BAD_GATEWAY, "fullstory_error", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Dataset(msg) => {
                tracing::error!(error = %msg, "Dataset generation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "dataset_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
