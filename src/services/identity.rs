// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity bookkeeping for GitHub logins.

use crate::db::Db;
use crate::error::AppError;
use crate::models::User;
use crate::services::github::GitHubClient;

/// Record a successful GitHub login.
///
/// The profile is fetched before the unit of work opens, so no transaction
/// is held across the GitHub request. Then the user holding `access_token` is
/// found (or created), updated and committed. Nothing is persisted if any
/// step fails.
pub async fn complete_login(
    db: &Db,
    github: &GitHubClient,
    access_token: &str,
) -> Result<User, AppError> {
    let profile = github.get_user(access_token).await?.profile;

    let mut uow = db.begin().await?;

    let mut user = match uow.find_user_by_access_token(access_token).await? {
        Some(user) => user,
        None => uow.create_user(access_token).await?,
    };
    user.github_access_token = access_token.to_string();
    user.github_id = Some(profile.id);
    user.github_login = Some(profile.login);
    user.github_email = profile.email;

    uow.save_user(&user).await?;
    uow.commit().await?;

    tracing::info!(
        user_id = user.id,
        login = user.github_login.as_deref().unwrap_or(""),
        "GitHub login recorded"
    );
    Ok(user)
}
