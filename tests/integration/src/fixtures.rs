//! Test fixtures and data generators
//!
//! Request bodies the tests send and the response shapes they read back.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique across test processes sharing one database
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}{n}", chrono::Utc::now().timestamp_micros())
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("viewer{}", &suffix[suffix.len().saturating_sub(12)..]),
            email: format!("viewer{suffix}@example.com"),
            password: "TestPass123".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
}

impl CreateVideoRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            title: format!("Clip {suffix}"),
            description: Some("Integration test upload".to_string()),
            video_url: format!("https://cdn.example.com/videos/{suffix}.mp4"),
            thumbnail_url: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl CreateCommentRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReactRequest {
    pub kind: String,
}

impl ReactRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub video_id: String,
    pub author_id: String,
    pub content: String,
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReactionResponse {
    pub message: String,
    pub status: String,
    pub likes: i64,
    pub dislikes: i64,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct LikeStatus {
    pub liked: bool,
    pub disliked: bool,
}

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

#[derive(Debug, Deserialize)]
pub struct PageMeta {
    pub before: Option<String>,
    pub after: Option<String>,
    pub has_more: bool,
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
}
