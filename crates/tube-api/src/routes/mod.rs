//! Route definitions
//!
//! API routes are mounted at the root. Health routes are built separately so
//! they can bypass rate limiting.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, comments, health, reactions, users, videos};
use crate::state::AppState;

/// Every API route except the health probes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(video_routes())
        .merge(comment_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id/videos", get(videos::list_user_videos))
}

fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/videos", get(videos::list_videos).post(videos::create_video))
        .route(
            "/videos/:video_id",
            get(videos::get_video)
                .patch(videos::update_video)
                .delete(videos::delete_video),
        )
        // Comments
        .route(
            "/videos/:video_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        // Engagement
        .route("/videos/:video_id/like", post(reactions::like_video))
        .route("/videos/:video_id/dislike", post(reactions::dislike_video))
        .route("/videos/:video_id/reactions", post(reactions::react_to_video))
        .route("/videos/:video_id/like-status", get(reactions::video_like_status))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/:comment_id",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        // Engagement
        .route("/comments/:comment_id/like", post(reactions::like_comment))
        .route("/comments/:comment_id/dislike", post(reactions::dislike_comment))
        .route("/comments/:comment_id/reactions", post(reactions::react_to_comment))
        .route(
            "/comments/:comment_id/like-status",
            get(reactions::comment_like_status),
        )
}
