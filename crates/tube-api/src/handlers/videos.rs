//! Video handlers
//!
//! Browsing is public; uploads, edits and deletes need an access token.

use axum::{
    extract::{Path, State},
    Json,
};
use tube_service::dto::{CreateVideoRequest, PaginatedResponse, UpdateVideoRequest, VideoResponse};
use tube_service::services::VideoService;

use crate::extractors::{AuthUser, Pagination, UserIdPath, ValidatedJson, VideoIdPath};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /videos
pub async fn create_video(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> ApiResult<Created<Json<VideoResponse>>> {
    let service = VideoService::new(state.service_context());
    let response = service.create_video(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Newest first, cursor paginated
///
/// GET /videos
pub async fn list_videos(
    State(state): State<AppState>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<VideoResponse>>> {
    let service = VideoService::new(state.service_context());
    let response = service.list_videos(pagination.query()).await?;
    Ok(Json(response))
}

/// GET /users/{user_id}/videos
pub async fn list_user_videos(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<VideoResponse>>> {
    let owner_id = path.user_id()?;
    let service = VideoService::new(state.service_context());
    let response = service.list_user_videos(owner_id, pagination.query()).await?;
    Ok(Json(response))
}

/// Fetch a video; counts as a view
///
/// GET /videos/{video_id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(path): Path<VideoIdPath>,
) -> ApiResult<Json<VideoResponse>> {
    let video_id = path.video_id()?;
    let service = VideoService::new(state.service_context());
    let response = service.get_video(video_id).await?;
    Ok(Json(response))
}

/// Owner only
///
/// PATCH /videos/{video_id}
pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateVideoRequest>,
) -> ApiResult<Json<VideoResponse>> {
    let video_id = path.video_id()?;
    let service = VideoService::new(state.service_context());
    let response = service.update_video(video_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// Owner only. Removes the video's comments and every reaction on both.
///
/// DELETE /videos/{video_id}
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<VideoIdPath>,
) -> ApiResult<NoContent> {
    let video_id = path.video_id()?;
    let service = VideoService::new(state.service_context());
    service.delete_video(video_id, auth.user_id).await?;
    Ok(NoContent)
}
