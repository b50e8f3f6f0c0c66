//! Authentication service
//!
//! Registration, login, token refresh and logout. Each login opens a
//! refresh session in Redis; refreshing rotates it.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use tube_cache::RefreshSession;
use tube_common::{hash_password, validate_password_strength, verify_password, AppError};
use tube_core::entities::User;
use tube_core::{DomainError, Snowflake};

use crate::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, RefreshTokenRequest, RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request, user_agent), fields(username = %request.username))]
    pub async fn register(
        &self,
        request: RegisterRequest,
        user_agent: Option<String>,
    ) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(self.ctx.generate_id(), request.username, request.email);

        // The unique index still guards against a concurrent registration.
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered");

        self.open_session(&user, user_agent).await
    }

    #[instrument(skip(self, request, user_agent))]
    pub async fn login(
        &self,
        request: LoginRequest,
        user_agent: Option<String>,
    ) -> ServiceResult<AuthResponse> {
        let Some((user, password_hash)) = self.ctx.user_repo().find_credentials(&request.email).await?
        else {
            warn!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials.into());
        };

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");

        self.open_session(&user, user_agent).await
    }

    /// Swap a refresh token for a new pair. The old session is revoked, so a
    /// refresh token works once.
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        let session = self
            .ctx
            .session_store()
            .get(&claims.session_id)
            .await?
            .filter(|s| s.user_id == user_id)
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Refresh with revoked or unknown session");
                AppError::InvalidToken
            })?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        // Lost a race with a concurrent refresh of the same token
        if !self.ctx.session_store().revoke(&session.session_id).await? {
            return Err(AppError::InvalidToken.into());
        }
        let response = self.open_session(&user, session.user_agent).await?;

        info!(user_id = %user.id, "Tokens refreshed");
        Ok(response)
    }

    /// End one session, or all of them when no refresh token is given.
    #[instrument(skip(self, refresh_token))]
    pub async fn logout(&self, user_id: Snowflake, refresh_token: Option<String>) -> ServiceResult<()> {
        match refresh_token {
            Some(token) => {
                let claims = self.ctx.jwt_service().validate_refresh_token(&token)?;
                if claims.user_id()? != user_id {
                    return Err(AppError::InvalidToken.into());
                }
                self.ctx.session_store().revoke(&claims.session_id).await?;
            }
            None => {
                self.ctx.session_store().revoke_all_for_user(user_id).await?;
            }
        }

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    async fn open_session(&self, user: &User, user_agent: Option<String>) -> ServiceResult<AuthResponse> {
        let session_id = Uuid::new_v4().to_string();
        let tokens = self.ctx.jwt_service().issue_pair(user.id, &session_id)?;

        let mut session = RefreshSession::new(user.id, session_id);
        if let Some(agent) = user_agent {
            session = session.with_user_agent(agent);
        }
        self.ctx
            .session_store()
            .store(&session)
            .await
            .map_err(|e| ServiceError::internal(format!("failed to store session: {e}")))?;

        Ok(AuthResponse::new(
            tokens.access_token,
            tokens.refresh_token,
            tokens.expires_in,
            CurrentUserResponse::from(user),
        ))
    }
}
