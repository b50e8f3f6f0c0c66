//! # tube-cache
//!
//! Redis layer: connection pool, refresh sessions and pub/sub publishing.
//!
//! ```ignore
//! use tube_cache::{Publisher, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool.clone());
//! publisher.publish_domain(&event).await?;
//! ```

pub mod pool;
pub mod pubsub;
pub mod session;

pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool, Ttl,
};
pub use pubsub::{PubSubChannel, PubSubEvent, Publisher, USER_CHANNEL_PREFIX, VIDEO_CHANNEL_PREFIX};
pub use session::{RefreshSession, RefreshSessionStore};
