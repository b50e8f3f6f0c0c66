//! Like/dislike handlers
//!
//! `like` and `dislike` are shorthands for `POST .../reactions` with a fixed
//! kind. Sending the kind already held removes it; the other kind replaces it.

use axum::{
    extract::{Path, State},
    Json,
};
use tube_core::{ReactionKind, TargetRef};
use tube_service::dto::{LikeStatusResponse, ReactRequest, ReactionResponse};
use tube_service::services::ReactionService;

use crate::extractors::{AuthUser, CommentIdPath, ValidatedJson, VideoIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

async fn react(
    state: &AppState,
    auth: AuthUser,
    target: TargetRef,
    kind: ReactionKind,
) -> ApiResult<Json<ReactionResponse>> {
    let service = ReactionService::new(state.service_context());
    let response = service.react(auth.user_id, target, kind).await?;
    Ok(Json(response))
}

async fn like_status(
    state: &AppState,
    auth: AuthUser,
    target: TargetRef,
) -> ApiResult<Json<LikeStatusResponse>> {
    let service = ReactionService::new(state.service_context());
    let response = service.like_status(auth.user_id, target).await?;
    Ok(Json(response))
}

fn video(path: &VideoIdPath) -> ApiResult<TargetRef> {
    path.video_id().map(TargetRef::video)
}

fn comment(path: &CommentIdPath) -> ApiResult<TargetRef> {
    path.comment_id().map(TargetRef::comment)
}

// ============================================================================
// Videos
// ============================================================================

/// POST /videos/{video_id}/like
pub async fn like_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
) -> ApiResult<Json<ReactionResponse>> {
    react(&state, auth, video(&path)?, ReactionKind::Like).await
}

/// POST /videos/{video_id}/dislike
pub async fn dislike_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
) -> ApiResult<Json<ReactionResponse>> {
    react(&state, auth, video(&path)?, ReactionKind::Dislike).await
}

/// POST /videos/{video_id}/reactions
pub async fn react_to_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
    ValidatedJson(request): ValidatedJson<ReactRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let target = video(&path)?;
    react(&state, auth, target, request.kind()?).await
}

/// GET /videos/{video_id}/like-status
pub async fn video_like_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
) -> ApiResult<Json<LikeStatusResponse>> {
    like_status(&state, auth, video(&path)?).await
}

// ============================================================================
// Comments
// ============================================================================

/// POST /comments/{comment_id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<ReactionResponse>> {
    react(&state, auth, comment(&path)?, ReactionKind::Like).await
}

/// POST /comments/{comment_id}/dislike
pub async fn dislike_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<ReactionResponse>> {
    react(&state, auth, comment(&path)?, ReactionKind::Dislike).await
}

/// POST /comments/{comment_id}/reactions
pub async fn react_to_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(request): ValidatedJson<ReactRequest>,
) -> ApiResult<Json<ReactionResponse>> {
    let target = comment(&path)?;
    react(&state, auth, target, request.kind()?).await
}

/// GET /comments/{comment_id}/like-status
pub async fn comment_like_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<LikeStatusResponse>> {
    like_status(&state, auth, comment(&path)?).await
}
