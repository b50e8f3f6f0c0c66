//! Service context - dependency container for services
//!
//! Holds the repositories, the reaction engine, the Redis-backed stores and
//! the id/token services every service borrows.

use std::sync::Arc;

use tube_cache::{Publisher, RefreshSessionStore, SharedRedisPool};
use tube_common::JwtService;
use tube_core::traits::{
    CommentRepository, EngagementStore, TargetResolver, UserRepository, VideoRepository,
};
use tube_core::{Snowflake, SnowflakeGenerator};
use tube_db::PgPool;

use super::error::{ServiceError, ServiceResult};
use crate::engine::ReactionEngine;

#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    redis_pool: SharedRedisPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    video_repo: Arc<dyn VideoRepository>,
    comment_repo: Arc<dyn CommentRepository>,

    // Engagement
    engine: ReactionEngine,

    // Cache
    session_store: RefreshSessionStore,
    publisher: Publisher,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        user_repo: Arc<dyn UserRepository>,
        video_repo: Arc<dyn VideoRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        engagement_store: Arc<dyn EngagementStore>,
        target_resolver: Arc<dyn TargetResolver>,
        jwt_service: Arc<JwtService>,
        snowflake_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        let inner_pool = (*redis_pool).clone();
        // Sessions expire together with the refresh tokens that name them.
        let session_ttl = u64::try_from(jwt_service.refresh_token_expiry()).unwrap_or_default();
        let session_store = RefreshSessionStore::with_ttl(inner_pool.clone(), session_ttl);
        let publisher = Publisher::new(inner_pool);
        let engine = ReactionEngine::new(
            engagement_store,
            target_resolver,
            Arc::clone(&snowflake_generator),
        );

        Self {
            pool,
            redis_pool,
            user_repo,
            video_repo,
            comment_repo,
            engine,
            session_store,
            publisher,
            jwt_service,
            snowflake_generator,
        }
    }

    // === Pools ===

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn video_repo(&self) -> &dyn VideoRepository {
        self.video_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    // === Engagement ===

    /// The only path that writes reactions or like/dislike counters
    pub fn engine(&self) -> &ReactionEngine {
        &self.engine
    }

    // === Cache ===

    pub fn session_store(&self) -> &RefreshSessionStore {
        &self.session_store
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &self.redis_pool)
            .field("engine", &self.engine)
            .field("repositories", &"...")
            .finish()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    video_repo: Option<Arc<dyn VideoRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    engagement_store: Option<Arc<dyn EngagementStore>>,
    target_resolver: Option<Arc<dyn TargetResolver>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn video_repo(mut self, repo: Arc<dyn VideoRepository>) -> Self {
        self.video_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn engagement_store(mut self, store: Arc<dyn EngagementStore>) -> Self {
        self.engagement_store = Some(store);
        self
    }

    pub fn target_resolver(mut self, resolver: Arc<dyn TargetResolver>) -> Self {
        self.target_resolver = Some(resolver);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// # Errors
    /// Returns `ServiceError::MissingDependency` naming the first one absent
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn require<T>(value: Option<T>, name: &'static str) -> ServiceResult<T> {
            value.ok_or(ServiceError::MissingDependency(name))
        }

        Ok(ServiceContext::new(
            require(self.pool, "pool")?,
            require(self.redis_pool, "redis_pool")?,
            require(self.user_repo, "user_repo")?,
            require(self.video_repo, "video_repo")?,
            require(self.comment_repo, "comment_repo")?,
            require(self.engagement_store, "engagement_store")?,
            require(self.target_resolver, "target_resolver")?,
            require(self.jwt_service, "jwt_service")?,
            require(self.snowflake_generator, "snowflake_generator")?,
        ))
    }
}
