//! PostgreSQL implementation of UserRepository
//!
//! Accounts are soft-deleted (`deleted_at`); every lookup ignores them, and
//! the email unique index only covers live rows.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tube_core::entities::User;
use tube_core::error::DomainError;
use tube_core::traits::{RepoResult, UserRepository};
use tube_core::value_objects::Snowflake;

use crate::models::{CredentialsModel, UserModel};

use super::error::{map_db_error, map_unique_violation, user_not_found};

const LIVE_USER: &str = "SELECT id, username, email, avatar, created_at, updated_at \
                         FROM users WHERE deleted_at IS NULL";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserModel>(&format!("{LIVE_USER} AND id = $1"))
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_credentials(&self, email: &str) -> RepoResult<Option<(User, String)>> {
        let row = sqlx::query_as::<_, CredentialsModel>(
            r"
            SELECT id, username, email, avatar, created_at, updated_at, password_hash
            FROM users
            WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(|r| (User::from(r.user), r.password_hash)))
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS({LIVE_USER} AND LOWER(email) = LOWER($1))"
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, email, password_hash, avatar, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.avatar)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let updated = sqlx::query(
            "UPDATE users SET username = $2, avatar = $3, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.avatar)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if updated == 0 {
            return Err(user_not_found(user.id));
        }
        Ok(())
    }
}
