// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite-backed identity store.
//!
//! All reads and writes go through a [`UnitOfWork`]: one transaction that a
//! request opens on entry. Calling [`UnitOfWork::commit`] persists its
//! changes; dropping it on any other exit path rolls them back.

use crate::db::tables;
use crate::error::AppError;
use crate::models::User;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 5;
/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity database handle, shared across requests.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect to the database at `url`.
    ///
    /// In-memory databases are pinned to a single long-lived connection, since
    /// every SQLite connection to `:memory:` sees its own empty database.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let connect_options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .busy_timeout(BUSY_TIMEOUT);

        let options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = options
            .connect_with(connect_options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        tracing::info!("Connected to identity database");
        Ok(Self { pool })
    }

    /// Open a fresh in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self, AppError> {
        let db = Self::connect("sqlite::memory:").await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                github_access_token VARCHAR(255) NOT NULL,
                github_id INTEGER,
                github_login VARCHAR(255),
                github_email VARCHAR(512)
            )",
            tables::USERS
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_users_access_token ON {} (github_access_token)",
            tables::USERS
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Start a unit of work.
    pub async fn begin(&self) -> Result<UnitOfWork, AppError> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork { tx })
    }
}

/// A single transaction over the identity store.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by local id.
    pub async fn find_user_by_id(&mut self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT id, github_access_token, github_id, github_login, github_email \
             FROM {} WHERE id = ?",
            tables::USERS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    /// Get the user that currently holds `access_token`.
    pub async fn find_user_by_access_token(
        &mut self,
        access_token: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT id, github_access_token, github_id, github_login, github_email \
             FROM {} WHERE github_access_token = ? ORDER BY id LIMIT 1",
            tables::USERS
        ))
        .bind(access_token)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(user)
    }

    /// Insert a new user holding `access_token`, with no profile yet.
    pub async fn create_user(&mut self, access_token: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO {} (github_access_token) VALUES (?) \
             RETURNING id, github_access_token, github_id, github_login, github_email",
            tables::USERS
        ))
        .bind(access_token)
        .fetch_one(&mut *self.tx)
        .await?;
        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Write back every mutable field of `user`.
    pub async fn save_user(&mut self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET github_access_token = ?, github_id = ?, github_login = ?, \
             github_email = ? WHERE id = ?",
            tables::USERS
        ))
        .bind(&user.github_access_token)
        .bind(user.github_id)
        .bind(&user.github_login)
        .bind(&user.github_email)
        .bind(user.id)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {}", user.id)));
        }
        Ok(())
    }

    /// List every stored user.
    pub async fn list_users(&mut self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT id, github_access_token, github_id, github_login, github_email \
             FROM {} ORDER BY id",
            tables::USERS
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(users)
    }

    /// Persist everything done in this unit of work.
    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
