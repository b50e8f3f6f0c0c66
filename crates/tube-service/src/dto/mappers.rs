//! Entity to DTO mappers

use tube_core::entities::{Comment, Target, User, Video};
use tube_core::{PageQuery, Snowflake};

use super::responses::{
    CommentResponse, CurrentUserResponse, PaginatedResponse, PublicUserResponse, ReactionResponse,
    TargetResponse, VideoResponse,
};
use crate::engine::ReactionOutcome;

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Video / Comment Mappers
// ============================================================================

impl From<&Video> for VideoResponse {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.to_string(),
            owner_id: video.owner_id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            video_url: video.video_url.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            views: video.views,
            likes: video.likes,
            dislikes: video.dislikes,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            video_id: comment.video_id.to_string(),
            author_id: comment.author_id.to_string(),
            content: comment.content.clone(),
            likes: comment.likes,
            dislikes: comment.dislikes,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

// ============================================================================
// Reaction Mappers
// ============================================================================

impl From<&Target> for TargetResponse {
    fn from(target: &Target) -> Self {
        match target {
            Target::Video(v) => Self::Video(v.into()),
            Target::Comment(c) => Self::Comment(c.into()),
        }
    }
}

impl From<&ReactionOutcome> for ReactionResponse {
    fn from(outcome: &ReactionOutcome) -> Self {
        Self {
            message: outcome.message.clone(),
            status: outcome.status,
            likes: outcome.counters.likes,
            dislikes: outcome.counters.dislikes,
            data: (&outcome.target).into(),
        }
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Wrap one page of snowflake-ordered items with the cursors for the older
/// (`before`) and newer (`after`) neighbouring pages.
///
/// `items` is a repository read of up to `query.fetch_limit()` rows; the
/// lookahead row only sets `has_more` and is dropped.
pub fn paginate<E, T>(mut items: Vec<E>, query: PageQuery, id: fn(&E) -> Snowflake) -> PaginatedResponse<T>
where
    for<'a> T: From<&'a E>,
{
    let limit = query.clamped_limit();
    let page_len = usize::try_from(limit).unwrap_or(usize::MAX);
    let has_more = items.len() > page_len;
    items.truncate(page_len);

    let ascending = query.after.is_some() && query.before.is_none();

    let first = items.first().map(id);
    let last = items.last().map(id);
    let (oldest, newest) = if ascending { (first, last) } else { (last, first) };

    PaginatedResponse::new(
        items.iter().map(T::from).collect(),
        oldest.map(|id| id.to_string()),
        newest.map(|id| id.to_string()),
        has_more,
        limit,
    )
}
