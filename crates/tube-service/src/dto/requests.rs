//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use tube_core::{DomainError, ReactionKind};
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request. Without a refresh token every session of the user ends.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: Option<String>,

    #[validate(url(message = "Avatar must be a URL"))]
    pub avatar: Option<String>,
}

// ============================================================================
// Video Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Video URL must be a URL"))]
    pub video_url: String,

    #[validate(url(message = "Thumbnail URL must be a URL"))]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Thumbnail URL must be a URL"))]
    pub thumbnail_url: Option<String>,
}

// ============================================================================
// Comment Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Body of `POST /{videos|comments}/{id}/reactions`.
///
/// `kind` stays a string so a bad value reports `INVALID_REACTION_KIND`
/// instead of a generic body rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReactRequest {
    #[validate(length(min = 1, message = "Reaction kind is required"))]
    pub kind: String,
}

impl ReactRequest {
    pub fn kind(&self) -> Result<ReactionKind, DomainError> {
        self.kind.parse()
    }
}
