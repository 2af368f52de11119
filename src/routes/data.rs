// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lightning dataset endpoint.

use crate::error::{AppError, Result};
use crate::lightning::{build_dataset, FlashRecord};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/data", get(get_data))
}

/// Regenerate the flash dataset from the data directory and return it.
///
/// Nothing is cached; every call re-reads the NetCDF files.
async fn get_data(State(state): State<Arc<AppState>>) -> Result<Json<Vec<FlashRecord>>> {
    let data_dir = state.config.data_dir.clone();

    let records = tokio::task::spawn_blocking(move || build_dataset(&data_dir))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Dataset task failed: {}", e)))??;

    tracing::debug!(rows = records.len(), "Serving lightning dataset");
    Ok(Json(records))
}
