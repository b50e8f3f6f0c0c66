//! Application error types
//!
//! Auth, configuration and infrastructure failures shared by every crate
//! above the domain layer.

use serde::Serialize;
use tube_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// HTTP status for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired => 401,
            Self::Database(_) | Self::Cache(_) | Self::Config(_) | Self::Internal(_) => 500,
            Self::Domain(e) => domain_status(e),
        }
    }

    /// Stable code for API error bodies
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// HTTP status for a domain error.
#[must_use]
pub fn domain_status(e: &DomainError) -> u16 {
    if e.is_not_found() {
        404
    } else if e.is_unauthorized() {
        401
    } else if e.is_authorization() {
        403
    } else if e.is_validation() {
        400
    } else if e.is_conflict() && !e.is_reaction_conflict() {
        409
    } else {
        // Reaction races are retried internally; one that escapes is a failure.
        500
    }
}

/// Error body returned to API clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let message = if err.is_server_error() {
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self {
            message,
            code: err.error_code().to_string(),
            details: None,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tube_core::{Snowflake, TargetRef};

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredentials.status_code(), 401);
        assert_eq!(AppError::TokenExpired.status_code(), 401);
        assert_eq!(AppError::Database("down".to_string()).status_code(), 500);
        assert_eq!(AppError::Config("API_PORT".to_string()).error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_domain_mapping() {
        let target = TargetRef::video(Snowflake::new(1));
        assert_eq!(AppError::from(DomainError::TargetNotFound(target)).status_code(), 404);
        assert_eq!(AppError::from(DomainError::Unauthorized).status_code(), 401);
        assert_eq!(AppError::from(DomainError::NotCommentAuthor).status_code(), 403);
        assert_eq!(
            AppError::from(DomainError::InvalidReactionKind("x".to_string())).status_code(),
            400
        );
        assert_eq!(AppError::from(DomainError::EmailAlreadyExists).status_code(), 409);
        assert_eq!(AppError::from(DomainError::CounterUnderflow(target)).status_code(), 500);
        assert_eq!(
            AppError::from(DomainError::ReactionConflict {
                actor: Snowflake::new(2),
                target,
            })
            .status_code(),
            500
        );
    }

    #[test]
    fn test_error_response_hides_internal_detail() {
        let response = ErrorResponse::from(&AppError::Database("password=hunter2".to_string()));
        assert_eq!(response.message, "Internal server error");
        assert_eq!(response.code, "DATABASE_ERROR");

        let response = ErrorResponse::from(&AppError::from(DomainError::VideoNotFound(Snowflake::new(9))));
        assert_eq!(response.code, "UNKNOWN_VIDEO");
        assert!(response.message.contains('9'));
        assert!(response.details.is_none());
    }
}
