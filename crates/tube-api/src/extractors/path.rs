//! Path parameter extractors
//!
//! Snowflake ids arrive as decimal strings; a malformed id is a 400.

use serde::Deserialize;
use tube_core::Snowflake;

use crate::response::ApiError;

fn parse_id(raw: &str, field: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {field} format")))
}

#[derive(Debug, Deserialize)]
pub struct VideoIdPath {
    pub video_id: String,
}

impl VideoIdPath {
    pub fn video_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.video_id, "video_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentIdPath {
    pub comment_id: String,
}

impl CommentIdPath {
    pub fn comment_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.comment_id, "comment_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}
