//! User model for storage.

/// A GitHub identity known to this server.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    /// Local id, referenced by the session cookie
    pub id: i64,
    /// Latest GitHub OAuth access token (replaced on every login)
    pub github_access_token: String,
    /// GitHub numeric account id
    pub github_id: Option<i64>,
    /// GitHub login name
    pub github_login: Option<String>,
    /// Public GitHub email (may be None if not shared)
    pub github_email: Option<String>,
}
