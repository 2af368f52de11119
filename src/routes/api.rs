// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes: user info, repository proxy, feedback issues and the
//! session correlation report.

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::models::{CorrelationReport, User};
use crate::services::correlator::{self, TrackingRepo};
use crate::services::derive_uid;
use crate::services::feedback::{compose_issue, IssueType};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes that serve anonymous callers too.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", get(get_user))
        .route("/repo", get(get_repo))
}

/// Routes that need a session. The auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/fs", get(get_session_report))
        .route("/issue", post(create_issue))
}

/// Load the user behind a session inside its own unit of work.
async fn session_user(state: &AppState, user_id: i64) -> Result<Option<User>> {
    let mut uow = state.db.begin().await?;
    uow.find_user_by_id(user_id).await
}

// ─── User Info ───────────────────────────────────────────────

/// Signed-in user's uid and GitHub profile.
///
/// `uid` is `false` whenever no uid can be produced.
#[derive(Serialize)]
pub struct UserInfoResponse {
    #[serde(serialize_with = "uid_or_false")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl UserInfoResponse {
    fn anonymous() -> Self {
        Self {
            uid: None,
            user: None,
        }
    }
}

fn uid_or_false<S: Serializer>(
    uid: &Option<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match uid {
        Some(uid) => serializer.serialize_str(uid),
        None => serializer.serialize_bool(false),
    }
}

/// Get the caller's uid and GitHub profile.
async fn get_user(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(session): MaybeAuthUser,
) -> Result<Json<UserInfoResponse>> {
    let Some(session) = session else {
        return Ok(Json(UserInfoResponse::anonymous()));
    };
    let Some(user) = session_user(&state, session.user_id).await? else {
        tracing::warn!(user_id = session.user_id, "Session references unknown user");
        return Ok(Json(UserInfoResponse::anonymous()));
    };

    match state.github.get_user(&user.github_access_token).await {
        Ok(github_user) => {
            let uid = github_user
                .profile
                .email
                .as_deref()
                .map(|email| derive_uid(&state.config.secret_key, email));
            Ok(Json(UserInfoResponse {
                uid,
                user: Some(github_user.raw),
            }))
        }
        Err(e) => {
            tracing::warn!(user_id = user.id, error = %e, "GitHub profile lookup failed");
            Ok(Json(UserInfoResponse::anonymous()))
        }
    }
}

// ─── Repository ──────────────────────────────────────────────

/// Proxy the tracking repository's metadata.
async fn get_repo(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(session): MaybeAuthUser,
) -> Result<Json<serde_json::Value>> {
    let user = match session {
        Some(session) => session_user(&state, session.user_id).await?,
        None => None,
    };

    let repo = state
        .github
        .get_repo(
            user.as_ref().map(|u| u.github_access_token.as_str()),
            &state.config.github_repo_owner,
            &state.config.github_repo_name,
        )
        .await?;
    Ok(Json(repo))
}

// ─── Session Report ──────────────────────────────────────────

/// FullStory sessions and open issues per uid. Operators only.
async fn get_session_report(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthUser>,
) -> Result<Json<CorrelationReport>> {
    let mut uow = state.db.begin().await?;
    let caller = uow
        .find_user_by_id(session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let is_admin = caller
        .github_login
        .as_deref()
        .is_some_and(|login| state.config.is_admin(login));
    if !is_admin {
        tracing::warn!(user_id = caller.id, "Non-admin requested session report");
        return Err(AppError::Forbidden(
            "session report is restricted to operators".to_string(),
        ));
    }

    let users = uow.list_users().await?;
    drop(uow);

    let repo = TrackingRepo {
        owner: &state.config.github_repo_owner,
        name: &state.config.github_repo_name,
        access_token: &state.config.github_access_token,
    };
    let report = correlator::build_report(
        &users,
        &state.config.secret_key,
        &state.fullstory,
        &state.github,
        &repo,
    )
    .await?;

    Ok(Json(report))
}

// ─── Feedback Issues ─────────────────────────────────────────

/// Feedback submitted from the landing page.
#[derive(Debug, Deserialize, Validate)]
pub struct IssueRequest {
    pub issue_type: IssueType,
    #[validate(length(min = 1, max = 256))]
    pub issue_title: String,
    #[validate(length(max = 65536))]
    pub issue_body: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IssueCreatedResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub issue_id: u64,
}

/// File feedback as a GitHub issue tagged with the caller's uid.
async fn create_issue(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthUser>,
    payload: std::result::Result<Json<IssueRequest>, JsonRejection>,
) -> Result<Json<IssueCreatedResponse>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = session_user(&state, session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let github_user = state.github.get_user(&user.github_access_token).await?;
    let email = github_user.profile.email.as_deref().ok_or_else(|| {
        AppError::BadRequest("GitHub account has no public email to identify the issue".to_string())
    })?;
    let uid = derive_uid(&state.config.secret_key, email);

    let issue = compose_issue(
        request.issue_type,
        &request.issue_title,
        &request.issue_body,
        &uid,
    );
    let created = state
        .github
        .create_issue(
            &state.config.github_access_token,
            &state.config.github_repo_owner,
            &state.config.github_repo_name,
            &issue,
        )
        .await?;

    Ok(Json(IssueCreatedResponse {
        issue_id: created.id,
    }))
}
