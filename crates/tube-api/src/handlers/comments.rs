//! Comment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use tube_service::dto::{
    CommentResponse, CreateCommentRequest, PaginatedResponse, UpdateCommentRequest,
};
use tube_service::services::CommentService;

use crate::extractors::{AuthUser, CommentIdPath, Pagination, ValidatedJson, VideoIdPath};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /videos/{video_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let video_id = path.video_id()?;
    let service = CommentService::new(state.service_context());
    let response = service.create_comment(video_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// GET /videos/{video_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(path): Path<VideoIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<CommentResponse>>> {
    let video_id = path.video_id()?;
    let service = CommentService::new(state.service_context());
    let response = service.list_comments(video_id, pagination.query()).await?;
    Ok(Json(response))
}

/// GET /comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<CommentResponse>> {
    let comment_id = path.comment_id()?;
    let service = CommentService::new(state.service_context());
    let response = service.get_comment(comment_id).await?;
    Ok(Json(response))
}

/// Author only
///
/// PATCH /comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let comment_id = path.comment_id()?;
    let service = CommentService::new(state.service_context());
    let response = service.update_comment(comment_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// Author or video owner
///
/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<NoContent> {
    let comment_id = path.comment_id()?;
    let service = CommentService::new(state.service_context());
    service.delete_comment(comment_id, auth.user_id).await?;
    Ok(NoContent)
}
