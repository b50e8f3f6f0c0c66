//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tube_core::ReactionStatus;

// ============================================================================
// Common Response Types
// ============================================================================

/// Page of results with snowflake cursors
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(
        data: Vec<T>,
        before: Option<String>,
        after: Option<String>,
        has_more: bool,
        limit: i64,
    ) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                before,
                after,
                has_more,
                limit,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Cursor for the page of older items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Cursor for the page of newer items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    pub has_more: bool,
    pub limit: i64,
}

// ============================================================================
// Auth Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: CurrentUserResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// The authenticated user's own profile (includes email)
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicUserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Video / Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub video_id: String,
    pub author_id: String,
    pub content: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// The reacted-to entity, serialized as the plain video or comment
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TargetResponse {
    Video(VideoResponse),
    Comment(CommentResponse),
}

/// Body returned by every like/dislike endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub message: String,
    pub status: ReactionStatus,
    pub likes: i64,
    pub dislikes: i64,
    pub data: TargetResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatusResponse {
    pub liked: bool,
    pub disliked: bool,
}

impl From<ReactionStatus> for LikeStatusResponse {
    fn from(status: ReactionStatus) -> Self {
        Self {
            liked: status.liked(),
            disliked: status.disliked(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if database_healthy && redis_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: label(redis_healthy),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
