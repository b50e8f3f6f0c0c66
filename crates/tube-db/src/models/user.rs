//! User rows

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Public columns of `users`; the password hash is only read at login.
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CredentialsModel {
    #[sqlx(flatten)]
    pub user: UserModel,
    pub password_hash: String,
}
