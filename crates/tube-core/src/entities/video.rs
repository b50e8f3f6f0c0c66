//! Video entity - uploaded video metadata plus its engagement counters

use chrono::{DateTime, Utc};

use crate::engagement::Counters;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(id: Snowflake, owner_id: Snowflake, title: String, video_url: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            title,
            description: None,
            video_url,
            thumbnail_url: None,
            views: 0,
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
    pub fn is_owned_by(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }
}
