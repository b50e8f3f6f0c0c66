//! Redis connection pool (deadpool-redis) with small JSON key/value helpers.
//!
//! Everything Tube keeps in Redis is short-lived JSON: refresh sessions and
//! the sets that index them. Pub/sub goes through the same pool.

use std::sync::Arc;
use std::time::Duration;

use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// Connection URL, e.g. `redis://localhost:6379`
    pub url: String,
    pub max_connections: usize,
    /// How long a checkout may wait for a free connection
    pub wait_timeout: Duration,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 10,
            wait_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&tube_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &tube_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
            ..Self::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Failed to build Redis pool: {0}")]
    Build(String),

    #[error("No Redis connection available: {0}")]
    Checkout(#[from] deadpool_redis::PoolError),

    #[error("Redis command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("Cached value is not valid JSON: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("TTL out of range: {0}s")]
    InvalidTtl(u64),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Expiry in whole seconds, range-checked once so both `SET EX` (u64) and
/// `EXPIRE` (i64) accept it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl(i64);

impl Ttl {
    pub fn from_secs(seconds: u64) -> RedisResult<Self> {
        match i64::try_from(seconds) {
            Ok(secs) if secs > 0 => Ok(Self(secs)),
            _ => Err(RedisPoolError::InvalidTtl(seconds)),
        }
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }

    #[allow(clippy::cast_sign_loss)]
    pub const fn as_u64(self) -> u64 {
        self.0 as u64
    }
}

#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    /// Build the pool. No connection is opened until the first checkout.
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let mut pool_config = Config::from_url(&config.url);
        let mut limits = deadpool_redis::PoolConfig::new(config.max_connections);
        limits.timeouts.wait = Some(config.wait_timeout);
        pool_config.pool = Some(limits);

        let pool = pool_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| RedisPoolError::Build(e.to_string()))?;

        // Credentials sit before the '@'
        let host = config.url.rsplit('@').next().unwrap_or_default();
        tracing::info!(
            host = %host,
            max_connections = config.max_connections,
            "Redis pool ready"
        );

        Ok(Self { pool })
    }

    pub async fn get(&self) -> RedisResult<Connection> {
        Ok(self.pool.get().await?)
    }

    /// PING round trip, used by the readiness probe.
    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    /// Write `value` as JSON under `key`, expiring after `ttl`.
    pub async fn put_json<V: Serialize>(&self, key: &str, value: &V, ttl: Ttl) -> RedisResult<()> {
        let json = serde_json::to_string(value)?;
        let mut conn = self.get().await?;
        conn.set_ex::<_, _, ()>(key, json, ttl.as_u64()).await?;
        Ok(())
    }

    /// Read and decode `key`; `None` when it is absent or expired.
    pub async fn get_json<V: DeserializeOwned>(&self, key: &str) -> RedisResult<Option<V>> {
        let mut conn = self.get().await?;
        let json: Option<String> = conn.get(key).await?;
        Ok(json.as_deref().map(serde_json::from_str::<V>).transpose()?)
    }

    /// Delete `keys`, returning how many existed.
    pub async fn remove(&self, keys: &[String]) -> RedisResult<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.get().await?;
        let removed: usize = conn.del(keys).await?;
        Ok(removed)
    }
}

pub type SharedRedisPool = Arc<RedisPool>;

pub fn create_shared_pool(config: RedisPoolConfig) -> RedisResult<SharedRedisPool> {
    RedisPool::new(config).map(Arc::new)
}
