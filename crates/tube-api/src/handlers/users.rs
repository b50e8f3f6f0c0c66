//! User handlers

use axum::{
    extract::{Path, State},
    Json,
};
use tube_service::dto::{CurrentUserResponse, PublicUserResponse, UpdateUserRequest};
use tube_service::services::UserService;

use crate::extractors::{AuthUser, UserIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_user(auth.user_id, request).await?;
    Ok(Json(response))
}

/// Public profile
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<PublicUserResponse>> {
    let user_id = path.user_id()?;
    let service = UserService::new(state.service_context());
    let response = service.get_user(user_id).await?;
    Ok(Json(response))
}
