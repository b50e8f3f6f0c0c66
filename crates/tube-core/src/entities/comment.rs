//! Comment entity - text attached to a video

use chrono::{DateTime, Utc};

use crate::engagement::Counters;
use crate::value_objects::Snowflake;

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub video_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: Snowflake, video_id: Snowflake, author_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            video_id,
            author_id,
            content,
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn counters(&self) -> Counters {
        Counters::new(self.likes, self.dislikes)
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Replace the content, rejecting empty or oversized text.
    pub fn edit(&mut self, content: String) -> Result<(), crate::DomainError> {
        if content.trim().is_empty() {
            return Err(crate::DomainError::ValidationError(
                "Comment content cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(crate::DomainError::ContentTooLong {
                max: MAX_COMMENT_LENGTH,
            });
        }
        self.content = content;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment::new(
            Snowflake::new(10),
            Snowflake::new(1),
            Snowflake::new(2),
            "first".to_string(),
        )
    }

    #[test]
    fn test_edit_validates_content() {
        let mut c = comment();
        assert!(c.edit("   ".to_string()).is_err());
        assert!(matches!(
            c.edit("x".repeat(MAX_COMMENT_LENGTH + 1)),
            Err(crate::DomainError::ContentTooLong { max: MAX_COMMENT_LENGTH })
        ));
        c.edit("second".to_string()).unwrap();
        assert_eq!(c.content, "second");
    }

    #[test]
    fn test_is_author() {
        let c = comment();
        assert!(c.is_author(Snowflake::new(2)));
        assert!(!c.is_author(Snowflake::new(1)));
    }
}
