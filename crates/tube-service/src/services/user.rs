//! User service
//!
//! Handles user profile operations.

use tracing::{info, instrument};

use tube_core::entities::User;
use tube_core::{DomainError, Snowflake};

use crate::dto::{CurrentUserResponse, PublicUserResponse, UpdateUserRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<PublicUserResponse> {
        let user = self.get_user_entity(user_id).await?;
        Ok(PublicUserResponse::from(&user))
    }

    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.get_user_entity(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        user_id: Snowflake,
        request: UpdateUserRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let mut user = self.get_user_entity(user_id).await?;
        let mut changed = false;

        if let Some(username) = request.username.filter(|u| *u != user.username) {
            user.set_username(username);
            changed = true;
        }

        if let Some(avatar) = request.avatar {
            user.set_avatar(Some(avatar));
            changed = true;
        }

        if changed {
            self.ctx.user_repo().update(&user).await?;
            info!(user_id = %user_id, "User profile updated");
        }

        Ok(CurrentUserResponse::from(&user))
    }

    /// Reject tokens whose user no longer exists.
    pub async fn require_live(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized.into())
    }

    async fn get_user_entity(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}
