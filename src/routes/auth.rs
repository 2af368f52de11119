// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_session_token, removal_cookie, session_cookie, MaybeAuthUser,
};
use crate::services::identity;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// How long a user has to complete the GitHub consent screen.
const OAUTH_STATE_MAX_AGE_MS: u128 = 15 * 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/github-callback", get(github_callback))
        .route("/logout", get(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct LoginParams {
    /// Local path to return to after login.
    #[serde(default)]
    next: Option<String>,
}

/// Start OAuth flow - redirect to GitHub authorization.
async fn login(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoginParams>,
    MaybeAuthUser(session): MaybeAuthUser,
    headers: HeaderMap,
) -> Result<Response> {
    if session.is_some() {
        return Ok("Already logged in".into_response());
    }

    let next = safe_next(params.next.as_deref());
    let oauth_state = sign_state(&next, now_millis()?, &state.config.secret_key)?;

    let (scheme, host) = request_origin(&headers);
    let callback_url = format!("{}://{}/github-callback", scheme, host);
    let auth_url = state.github.authorize_url(&callback_url, &oauth_state);

    tracing::info!(next = %next, "Starting OAuth flow, redirecting to GitHub");
    Ok(Redirect::temporary(&auth_url).into_response())
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for a token, record the user, start a session.
async fn github_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let now = now_millis()?;
    let Some(next) = params
        .state
        .as_deref()
        .and_then(|s| verify_state(s, &state.config.secret_key, now))
    else {
        tracing::warn!("Invalid, expired or tampered OAuth state, ignoring callback");
        return Ok((jar, Redirect::temporary("/")));
    };

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from GitHub");
        return Ok((jar, Redirect::temporary(&next)));
    }

    let Some(code) = params.code else {
        tracing::warn!("OAuth callback without code");
        return Ok((jar, Redirect::temporary(&next)));
    };

    let Some(access_token) = state.github.exchange_code(&code).await? else {
        return Ok((jar, Redirect::temporary(&next)));
    };

    let user = identity::complete_login(&state.db, &state.github, &access_token).await?;

    let token = create_session_token(user.id, &state.config.secret_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
    let (scheme, _) = request_origin(&headers);
    let jar = jar.add(session_cookie(token, scheme == "https"));

    Ok((jar, Redirect::temporary(&next)))
}

/// Logout - drop the session cookie and go back to the landing page.
async fn logout(headers: HeaderMap, jar: CookieJar) -> (CookieJar, Redirect) {
    let (scheme, _) = request_origin(&headers);
    (
        jar.remove(removal_cookie(scheme == "https")),
        Redirect::temporary("/"),
    )
}

/// Scheme and host the client used to reach us.
fn request_origin(headers: &HeaderMap) -> (&'static str, String) {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "localhost:8080".to_string());

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };
    (scheme, host)
}

/// Only local absolute paths may be used as post-login redirects.
fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

fn now_millis() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis())
}

/// Sign "next|timestamp_hex" and encode it as the OAuth state parameter.
fn sign_state(next: &str, timestamp_ms: u128, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", next, timestamp_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Verify the OAuth state and return the `next` path it carries.
fn verify_state(state: &str, secret: &[u8], now_ms: u128) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "next|timestamp_hex|signature_hex"; `next` may itself contain '|'
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let next = parts.next()?;

    let payload = format!("{}|{}", next, timestamp_hex);
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if !bool::from(expected_signature.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued_at = u128::from_str_radix(timestamp_hex, 16).ok()?;
    if now_ms.saturating_sub(issued_at) > OAUTH_STATE_MAX_AGE_MS {
        return None;
    }

    Some(safe_next(Some(next)))
}
