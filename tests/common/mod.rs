// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use lightning_feedback::config::Config;
use lightning_feedback::db::Db;
use lightning_feedback::middleware::auth::{create_session_token, SESSION_COOKIE};
use lightning_feedback::models::User;
use lightning_feedback::routes::create_router;
use lightning_feedback::AppState;
use netcdf3::{DataSet, FileWriter, Version};
use std::path::Path;
use std::sync::Arc;
use wiremock::MockServer;

/// Path prefix FullStory mocks are mounted under.
#[allow(dead_code)]
pub const FULLSTORY_PREFIX: &str = "/fullstory";

/// Test config with every upstream pointed at `server`.
#[allow(dead_code)]
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::test_default();
    config.github_api_url = server.uri();
    config.github_oauth_url = format!("{}/login/oauth", server.uri());
    config.fullstory_api_url = format!("{}{}", server.uri(), FULLSTORY_PREFIX);
    config
}

/// Create a test app around `config` with a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let db = Db::in_memory().await.expect("in-memory database");
    let state = Arc::new(AppState::new(config, db).expect("app state"));
    (create_router(state.clone()), state)
}

/// Store a user as a completed login would.
#[allow(dead_code)]
pub async fn seed_user(
    db: &Db,
    access_token: &str,
    login: Option<&str>,
    email: Option<&str>,
) -> User {
    let mut uow = db.begin().await.unwrap();
    let mut user = uow.create_user(access_token).await.unwrap();
    user.github_id = Some(1000 + user.id);
    user.github_login = login.map(str::to_string);
    user.github_email = email.map(str::to_string);
    uow.save_user(&user).await.unwrap();
    uow.commit().await.unwrap();
    user
}

/// `Cookie` header value carrying a session for `user_id`.
#[allow(dead_code)]
pub fn session_cookie_header(user_id: i64, config: &Config) -> String {
    let token = create_session_token(user_id, &config.secret_key).unwrap();
    format!("{}={}", SESSION_COOKIE, token)
}

/// GitHub `/user` payload.
#[allow(dead_code)]
pub fn github_profile(id: i64, login: &str, email: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "login": login,
        "email": email,
        "html_url": format!("https://github.com/{login}"),
    })
}

/// Write a classic NetCDF flash file with the given columns.
#[allow(dead_code)]
pub fn write_flash_file(
    path: &Path,
    tai93: &[f64],
    observe: &[i16],
    lat: &[f32],
    lon: &[f32],
) {
    let mut data_set = DataSet::new();
    data_set.add_fixed_dim("flashes", tai93.len()).unwrap();
    data_set
        .add_var_f64("lightning_flash_TAI93_time", &["flashes"])
        .unwrap();
    data_set
        .add_var_i16("lightning_flash_observe_time", &["flashes"])
        .unwrap();
    data_set
        .add_var_f32("lightning_flash_lat", &["flashes"])
        .unwrap();
    data_set
        .add_var_f32("lightning_flash_lon", &["flashes"])
        .unwrap();

    let mut writer = FileWriter::open(path).unwrap();
    writer.set_def(&data_set, Version::Classic, 0).unwrap();
    writer
        .write_var_f64("lightning_flash_TAI93_time", tai93)
        .unwrap();
    writer
        .write_var_i16("lightning_flash_observe_time", observe)
        .unwrap();
    writer.write_var_f32("lightning_flash_lat", lat).unwrap();
    writer.write_var_f32("lightning_flash_lon", lon).unwrap();
    writer.close().unwrap();
}

/// Write a one-flash NetCDF file carrying every flash variable except `omit`.
#[allow(dead_code)]
pub fn write_flash_file_without(path: &Path, omit: &str) {
    let mut data_set = DataSet::new();
    data_set.add_fixed_dim("flashes", 1).unwrap();
    if omit != "lightning_flash_TAI93_time" {
        data_set
            .add_var_f64("lightning_flash_TAI93_time", &["flashes"])
            .unwrap();
    }
    if omit != "lightning_flash_observe_time" {
        data_set
            .add_var_i16("lightning_flash_observe_time", &["flashes"])
            .unwrap();
    }
    for name in ["lightning_flash_lat", "lightning_flash_lon"] {
        if omit != name {
            data_set.add_var_f32(name, &["flashes"]).unwrap();
        }
    }

    let mut writer = FileWriter::open(path).unwrap();
    writer.set_def(&data_set, Version::Classic, 0).unwrap();
    if omit != "lightning_flash_TAI93_time" {
        writer
            .write_var_f64("lightning_flash_TAI93_time", &[825845071.2741437])
            .unwrap();
    }
    if omit != "lightning_flash_observe_time" {
        writer
            .write_var_i16("lightning_flash_observe_time", &[93])
            .unwrap();
    }
    for name in ["lightning_flash_lat", "lightning_flash_lon"] {
        if omit != name {
            writer.write_var_f32(name, &[1.5]).unwrap();
        }
    }
    writer.close().unwrap();
}
