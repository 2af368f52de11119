// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lightning Feedback API Server
//!
//! Serves the lightning flash dataset and the GitHub/FullStory feedback loop.

use lightning_feedback::{config::Config, db::Db, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        "Starting Lightning Feedback API"
    );

    let db = Db::connect(&config.database_url).await?;
    db.migrate().await?;
    tracing::info!("Database ready");

    let state = Arc::new(AppState::new(config.clone(), db)?);
    tracing::info!(
        repo = %format!("{}/{}", config.github_repo_owner, config.github_repo_name),
        admins = config.admin_logins.len(),
        "Services initialized"
    );

    let app = lightning_feedback::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lightning_feedback=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
