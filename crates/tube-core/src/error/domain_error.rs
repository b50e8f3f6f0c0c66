//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::engagement::TargetRef;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Video not found: {0}")]
    VideoNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    #[error("Reaction target not found: {0}")]
    TargetNotFound(TargetRef),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid reaction kind: {0:?} (expected \"like\" or \"dislike\")")]
    InvalidReactionKind(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not video owner")]
    NotVideoOwner,

    #[error("Not comment author")]
    NotCommentAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    /// Another request created the same (actor, target) reaction first.
    #[error("Reaction already exists for {actor} on {target}")]
    ReactionConflict { actor: Snowflake, target: TargetRef },

    // =========================================================================
    // Consistency Errors
    // =========================================================================
    #[error("Counter underflow on {0}")]
    CounterUnderflow(TargetRef),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::VideoNotFound(_) => "UNKNOWN_VIDEO",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::TargetNotFound(_) => "UNKNOWN_TARGET",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidReactionKind(_) => "INVALID_REACTION_KIND",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Authorization
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotVideoOwner => "NOT_VIDEO_OWNER",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::ReactionConflict { .. } => "REACTION_CONFLICT",

            // Consistency / Infrastructure
            Self::CounterUnderflow(_) => "COUNTER_UNDERFLOW",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::VideoNotFound(_)
                | Self::CommentNotFound(_)
                | Self::TargetNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidReactionKind(_)
                | Self::WeakPassword(_)
                | Self::ContentTooLong { .. }
        )
    }

    /// Check if the caller is unauthenticated
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotVideoOwner | Self::NotCommentAuthor)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::ReactionConflict { .. }
        )
    }

    /// Check if this error is a lost uniqueness race on a reaction row
    pub fn is_reaction_conflict(&self) -> bool {
        matches!(self, Self::ReactionConflict { .. })
    }

    /// Check if this should surface as an internal failure
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::CounterUnderflow(_)
                | Self::DatabaseError(_)
                | Self::CacheError(_)
                | Self::InternalError(_)
        )
    }
}
