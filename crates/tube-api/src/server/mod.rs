//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tube_cache::{create_shared_pool, RedisPoolConfig};
use tube_common::{AppConfig, AppError, JwtService};
use tube_core::SnowflakeGenerator;
use tube_db::{
    create_pool, run_migrations, DatabaseConfig, PgCommentRepository, PgEngagementStore,
    PgTargetResolver, PgUserRepository, PgVideoRepository,
};
use tube_service::ServiceContextBuilder;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    let api = apply_rate_limit(create_router(), &config.rate_limit);
    let router = api.merge(health_routes());
    let router = apply_middleware(router, &config.cors, config.app.env.is_production());

    router.with_state(state)
}

/// Connect to PostgreSQL and Redis and assemble the service context
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("migration failed: {e}")))?;
    }

    info!("Connecting to Redis...");
    let redis_pool = create_shared_pool(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;
    if let Err(e) = redis_pool.health_check().await {
        // Sessions and events need Redis; readiness reports it until it's back.
        warn!(error = %e, "Redis is not reachable yet");
    } else {
        info!("Redis connection established");
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let snowflake_generator = Arc::new(
        SnowflakeGenerator::new(config.snowflake.worker_id)
            .map_err(|e| AppError::Config(e.to_string()))?,
    );

    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .redis_pool(redis_pool)
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .video_repo(Arc::new(PgVideoRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .engagement_store(Arc::new(PgEngagementStore::new(pool.clone())))
        .target_resolver(Arc::new(PgTargetResolver::new(pool)))
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on `addr` (`host:port`) until Ctrl-C
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let local: Option<SocketAddr> = listener.local_addr().ok();
    info!(addr = ?local, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, &addr).await
}
