// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Landing page and health check.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{extract::State, response::Html, routing::get, Json, Router};
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const INDEX_TEMPLATE: &str = "index";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}

/// Build the template registry used by page handlers.
pub fn templates() -> std::result::Result<Handlebars<'static>, AppError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(INDEX_TEMPLATE, include_str!("../../templates/index.hbs"))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid index template: {}", e)))?;
    Ok(registry)
}

#[derive(Serialize)]
struct IndexPage<'a> {
    data: IndexData<'a>,
}

#[derive(Serialize)]
struct IndexData<'a> {
    date: &'a str,
    cesium_key: &'a str,
    fs_org_code: &'a str,
}

/// Landing page.
async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let page = IndexPage {
        data: IndexData {
            date: &state.config.date,
            cesium_key: &state.config.cesium_key,
            fs_org_code: &state.config.fs_org_code,
        },
    };

    let html = state
        .templates
        .render(INDEX_TEMPLATE, &page)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Template render failed: {}", e)))?;
    Ok(Html(html))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}
