//! # tube-db
//!
//! Database layer implementing the tube-core ports with PostgreSQL via SQLx.
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives and entity mappers
//! - Repositories for users, videos and comments
//! - The engagement unit of work (reactions plus counter projection)
//! - An in-memory engagement store for tests and local experiments
//!
//! ```rust,ignore
//! use tube_db::{create_pool, DatabaseConfig, PgEngagementStore};
//!
//! let pool = create_pool(&DatabaseConfig::new(url)).await?;
//! tube_db::run_migrations(&pool).await?;
//! let engagement = PgEngagementStore::new(pool.clone());
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryEngagementStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgCommentRepository, PgEngagementStore, PgEngagementUnit, PgTargetResolver, PgUserRepository,
    PgVideoRepository,
};
