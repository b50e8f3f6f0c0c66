//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `reactions` table. Exactly one of `video_id` and
/// `comment_id` is set (enforced by a CHECK constraint).
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: i64,
    pub actor_id: i64,
    pub video_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `likes`/`dislikes` pair, either read from a target row or recounted.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CountersModel {
    pub likes: i64,
    pub dislikes: i64,
}
