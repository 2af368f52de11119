// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Lightning Feedback: serve ISS lightning flashes and track user feedback
//!
//! This crate provides the backend for a lightning map: it flattens NetCDF
//! flash files into a dataset, signs users in with GitHub, files their
//! feedback as issues and cross-references those issues with FullStory
//! session recordings.

pub mod config;
pub mod db;
pub mod error;
pub mod lightning;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use error::AppError;
use handlebars::Handlebars;
use services::{FullStoryClient, GitHubClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub github: GitHubClient,
    pub fullstory: FullStoryClient,
    pub templates: Handlebars<'static>,
}

impl AppState {
    /// Build the outbound clients and templates around a connected database.
    pub fn new(config: Config, db: Db) -> Result<Self, AppError> {
        let github = GitHubClient::new(&config)?;
        let fullstory = FullStoryClient::new(&config)?;
        let templates = routes::pages::templates()?;

        Ok(Self {
            config,
            db,
            github,
            fullstory,
            templates,
        })
    }
}
