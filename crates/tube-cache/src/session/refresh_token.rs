//! Refresh sessions in Redis.
//!
//! Every login opens a session whose id is embedded in both tokens of the
//! pair. A refresh token is only honoured while its session key exists, so
//! logout and rotation are a key delete.

use crate::pool::{RedisPool, RedisResult, Ttl};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tube_core::Snowflake;

const SESSION_PREFIX: &str = "refresh_session:";
const USER_SESSIONS_PREFIX: &str = "user_sessions:";

/// 7 days, the default refresh token lifetime
const DEFAULT_SESSION_TTL: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub user_id: Snowflake,
    pub session_id: String,
    /// Unix epoch seconds
    pub created_at: i64,
    pub user_agent: Option<String>,
}

impl RefreshSession {
    #[must_use]
    pub fn new(user_id: Snowflake, session_id: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id: session_id.into(),
            created_at: chrono::Utc::now().timestamp(),
            user_agent: None,
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[derive(Clone)]
pub struct RefreshSessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshSessionStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self::with_ttl(pool, DEFAULT_SESSION_TTL)
    }

    /// Sessions live as long as the refresh tokens that point at them.
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(session_id: &str) -> String {
        format!("{SESSION_PREFIX}{session_id}")
    }

    fn user_key(user_id: Snowflake) -> String {
        format!("{USER_SESSIONS_PREFIX}{user_id}")
    }

    /// Save the session and add it to the user's index. The index expires
    /// with the newest session.
    pub async fn store(&self, session: &RefreshSession) -> RedisResult<()> {
        let ttl = Ttl::from_secs(self.ttl_seconds)?;
        self.pool
            .put_json(&Self::key(&session.session_id), session, ttl)
            .await?;

        let index = Self::user_key(session.user_id);
        let mut conn = self.pool.get().await?;
        redis::pipe()
            .sadd(&index, &session.session_id)
            .ignore()
            .expire(&index, ttl.as_i64())
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        tracing::debug!(
            user_id = %session.user_id,
            session_id = %session.session_id,
            "Refresh session opened"
        );
        Ok(())
    }

    /// `None` once the session expired or was revoked.
    pub async fn get(&self, session_id: &str) -> RedisResult<Option<RefreshSession>> {
        self.pool.get_json(&Self::key(session_id)).await
    }

    /// End one session. `false` when it was already gone.
    pub async fn revoke(&self, session_id: &str) -> RedisResult<bool> {
        let Some(session) = self.get(session_id).await? else {
            return Ok(false);
        };

        let mut conn = self.pool.get().await?;
        conn.srem::<_, _, ()>(Self::user_key(session.user_id), session_id)
            .await?;
        let removed = self.pool.remove(&[Self::key(session_id)]).await? > 0;

        tracing::debug!(session_id = %session_id, "Refresh session revoked");
        Ok(removed)
    }

    /// Logout everywhere. Returns how many live sessions were dropped.
    pub async fn revoke_all_for_user(&self, user_id: Snowflake) -> RedisResult<usize> {
        let index = Self::user_key(user_id);
        let mut conn = self.pool.get().await?;

        let session_ids: Vec<String> = conn.smembers(&index).await?;
        let mut keys: Vec<String> = session_ids.iter().map(|id| Self::key(id)).collect();
        let live = self.pool.remove(&keys).await?;

        keys.clear();
        keys.push(index);
        self.pool.remove(&keys).await?;

        tracing::info!(user_id = %user_id, sessions = live, "All refresh sessions revoked");
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let user_id = Snowflake::new(12345);
        let session = RefreshSession::new(user_id, "abc").with_user_agent("curl/8.5");

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.session_id, "abc");
        assert_eq!(session.user_agent.as_deref(), Some("curl/8.5"));
        assert!(session.created_at > 0);
    }

    #[test]
    fn test_key_generation() {
        assert_eq!(RefreshSessionStore::key("abc"), "refresh_session:abc");
        assert_eq!(
            RefreshSessionStore::user_key(Snowflake::new(7)),
            "user_sessions:7"
        );
    }

    #[test]
    fn test_session_json_keeps_string_ids() {
        let session = RefreshSession::new(Snowflake::new(99), "s1");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["user_id"], "99");

        let back: RefreshSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }
}
