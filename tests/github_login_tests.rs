// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub OAuth login tests against a mocked GitHub.
//!
//! These tests verify that:
//! 1. /login redirects to GitHub with a signed state
//! 2. The callback exchanges the code, records the user and sets the session
//! 3. A tampered state or a declined code never creates a session

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use lightning_feedback::db::Db;
use lightning_feedback::services::{identity, GitHubClient};
use std::time::{Duration, Instant};
use tower::ServiceExt;
use wiremock::{
    matchers::{body_string_contains, header as header_eq, method, path},
    Mock, MockServer, ResponseTemplate,
};

mod common;

async fn mock_github_login(server: &MockServer, access_token: &str, email: Option<&str>) {
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(body_string_contains("code=good-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access_token,
            "token_type": "bearer",
            "scope": "user:email",
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_eq("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::github_profile(583231, "octocat", email)),
        )
        .mount(server)
        .await;
}

/// Start a login and pull the signed state out of the GitHub redirect.
async fn start_login(app: &axum::Router, next: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/login?next={}", urlencoding::encode(next)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    let encoded = location.split("&state=").nth(1).expect("state parameter");
    urlencoding::decode(encoded).unwrap().into_owned()
}

async fn callback(app: &axum::Router, query: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(format!("/github-callback?{query}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_login_redirects_to_github() {
    let server = MockServer::start().await;
    let config = common::config_for(&server);
    let (app, _) = common::create_test_app(config).await;

    let response = app
        .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with(&format!("{}/login/oauth/authorize?", server.uri())));
    assert!(location.contains("client_id=test_client_id"));
    assert!(location.contains("scope=user%3Aemail"));
    assert!(location.contains(&format!(
        "redirect_uri={}",
        urlencoding::encode("http://localhost:8080/github-callback")
    )));
}

#[tokio::test]
async fn test_full_login_sets_session_and_returns_to_next() {
    let server = MockServer::start().await;
    mock_github_login(&server, "gho_first", Some("octocat@github.com")).await;
    let config = common::config_for(&server);
    let (app, state) = common::create_test_app(config).await;

    let oauth_state = start_login(&app, "/data").await;
    let response = callback(
        &app,
        &format!("code=good-code&state={}", urlencoding::encode(&oauth_state)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/data");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("lightning_session="));
    assert!(cookie.contains("HttpOnly"));

    let mut uow = state.db.begin().await.unwrap();
    let users = uow.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].github_access_token, "gho_first");
    assert_eq!(users[0].github_login.as_deref(), Some("octocat"));
    assert_eq!(users[0].github_email.as_deref(), Some("octocat@github.com"));
}

#[tokio::test]
async fn test_already_logged_in() {
    let server = MockServer::start().await;
    let config = common::config_for(&server);
    let (app, state) = common::create_test_app(config).await;
    let user = common::seed_user(&state.db, "gho_existing", Some("octocat"), None).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/login")
                .header(header::COOKIE, common::session_cookie_header(user.id, &state.config))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Already logged in");
}

#[tokio::test]
async fn test_tampered_state_creates_no_session() {
    let server = MockServer::start().await;
    mock_github_login(&server, "gho_first", Some("octocat@github.com")).await;
    let config = common::config_for(&server);
    let (app, state) = common::create_test_app(config).await;

    let response = callback(&app, "code=good-code&state=Zm9vfDE4YzBmfGJhZA").await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let mut uow = state.db.begin().await.unwrap();
    assert!(uow.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_declined_code_creates_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        })))
        .mount(&server)
        .await;
    let config = common::config_for(&server);
    let (app, state) = common::create_test_app(config).await;

    let oauth_state = start_login(&app, "/").await;
    let response = callback(
        &app,
        &format!("code=stale&state={}", urlencoding::encode(&oauth_state)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let mut uow = state.db.begin().await.unwrap();
    assert!(uow.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_github_error_redirects_without_session() {
    let server = MockServer::start().await;
    let config = common::config_for(&server);
    let (app, _) = common::create_test_app(config).await;

    let oauth_state = start_login(&app, "/data").await;
    let response = callback(
        &app,
        &format!("error=access_denied&state={}", urlencoding::encode(&oauth_state)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/data");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_removes_cookie() {
    let server = MockServer::start().await;
    let config = common::config_for(&server);
    let (app, _) = common::create_test_app(config).await;

    let response = app
        .oneshot(Request::builder().uri("/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("lightning_session="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_complete_login_reuses_user_for_same_token() {
    let server = MockServer::start().await;
    mock_github_login(&server, "gho_same", Some("octocat@github.com")).await;
    let config = common::config_for(&server);
    let (_, state) = common::create_test_app(config.clone()).await;
    let github = GitHubClient::new(&config).unwrap();

    let first = identity::complete_login(&state.db, &github, "gho_same").await.unwrap();
    let second = identity::complete_login(&state.db, &github, "gho_same").await.unwrap();

    assert_eq!(first.id, second.id);
    let mut uow = state.db.begin().await.unwrap();
    assert_eq!(uow.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_complete_login_rolls_back_on_profile_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let config = common::config_for(&server);
    let (_, state) = common::create_test_app(config.clone()).await;
    let github = GitHubClient::new(&config).unwrap();

    let err = identity::complete_login(&state.db, &github, "gho_revoked")
        .await
        .unwrap_err();
    assert!(err.is_github_token_error());

    let mut uow = state.db.begin().await.unwrap();
    assert!(uow.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_overlapping_logins_do_not_block_each_other() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_eq("authorization", "Bearer gho_slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::github_profile(1, "slowpoke", Some("slow@example.com")))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_eq("authorization", "Bearer gho_fast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::github_profile(2, "speedy", Some("fast@example.com"))),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("identity.db").display());
    let db = Db::connect(&url).await.unwrap();
    db.migrate().await.unwrap();
    let github = GitHubClient::new(&common::config_for(&server)).unwrap();

    let slow = identity::complete_login(&db, &github, "gho_slow");
    let fast = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let started = Instant::now();
        let result = identity::complete_login(&db, &github, "gho_fast").await;
        (result, started.elapsed())
    };
    let (slow, (fast, fast_elapsed)) = tokio::join!(slow, fast);

    assert_eq!(slow.unwrap().github_login.as_deref(), Some("slowpoke"));
    assert_eq!(fast.unwrap().github_login.as_deref(), Some("speedy"));
    // The fast login must not wait for the slow one's GitHub round trip
    assert!(fast_elapsed < Duration::from_secs(2), "fast login took {fast_elapsed:?}");

    let mut uow = db.begin().await.unwrap();
    assert_eq!(uow.list_users().await.unwrap().len(), 2);
}
