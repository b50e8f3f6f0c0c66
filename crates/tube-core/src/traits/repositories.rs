//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Comment, User, Video};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Cursor pagination over snowflake-ordered rows.
///
/// `before` walks backwards from a cursor (newest first), `after` walks
/// forwards (oldest first). With neither set the newest rows are returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub limit: i64,
}

impl PageQuery {
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(before: Option<Snowflake>, after: Option<Snowflake>, limit: i64) -> Self {
        Self {
            before,
            after,
            limit,
        }
    }

    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }

    /// Rows a repository fetches: the page plus one lookahead row that
    /// tells the caller whether another page follows.
    pub fn fetch_limit(&self) -> i64 {
        self.clamped_limit() + 1
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Live accounts only
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Case-insensitive email match, with the stored password hash
    async fn find_credentials(&self, email: &str) -> RepoResult<Option<(User, String)>>;

    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Fails with `EmailAlreadyExists` when a live account holds the email
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Persist username and avatar
    async fn update(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Video Repository
// ============================================================================

#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>>;

    /// Paged reads return up to `query.fetch_limit()` rows.
    async fn list(&self, query: PageQuery) -> RepoResult<Vec<Video>>;

    async fn find_by_owner(&self, owner_id: Snowflake, query: PageQuery) -> RepoResult<Vec<Video>>;

    async fn create(&self, video: &Video) -> RepoResult<()>;

    /// Update title, description and thumbnail. Counters are never written here.
    async fn update(&self, video: &Video) -> RepoResult<()>;

    /// Bump the view counter and return the new value
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    async fn find_by_video(&self, video_id: Snowflake, query: PageQuery) -> RepoResult<Vec<Comment>>;

    /// All comment ids on a video, used to cascade reaction cleanup
    async fn ids_by_video(&self, video_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Update content only. Counters are never written here.
    async fn update(&self, comment: &Comment) -> RepoResult<()>;
}
