//! Bearer access token extractor
//!
//! Every engagement and write endpoint takes an [`AuthUser`]. A missing
//! header is `MISSING_AUTHORIZATION`; anything wrong with the token itself
//! (signature, expiry, a refresh token used as an access token) is
//! `INVALID_TOKEN`.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tube_common::JwtService;
use tube_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

/// The actor behind a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

impl AuthUser {
    pub fn from_access_token(jwt: &JwtService, token: &str) -> Result<Self, ApiError> {
        let claims = jwt.validate_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            ApiError::InvalidAuth
        })?;

        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Access token carries a malformed subject");
            ApiError::InvalidAuth
        })?;

        Ok(Self { user_id })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let state = AppState::from_ref(state);
        Self::from_access_token(state.jwt_service(), bearer.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtService {
        JwtService::new("extractor-test-secret-extractor-test", 900, 3600)
    }

    #[test]
    fn test_access_token_yields_actor() {
        let jwt = jwt();
        let pair = jwt.issue_pair(Snowflake::new(77), "s-1").unwrap();

        let auth = AuthUser::from_access_token(&jwt, &pair.access_token).unwrap();
        assert_eq!(auth.user_id, Snowflake::new(77));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let jwt = jwt();
        let pair = jwt.issue_pair(Snowflake::new(77), "s-1").unwrap();

        let err = AuthUser::from_access_token(&jwt, &pair.refresh_token).unwrap_err();
        assert!(matches!(err, ApiError::InvalidAuth));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let other = JwtService::new("some-other-secret-some-other-secret", 900, 3600);
        let pair = other.issue_pair(Snowflake::new(1), "s-2").unwrap();

        assert!(AuthUser::from_access_token(&jwt(), &pair.access_token).is_err());
    }
}
