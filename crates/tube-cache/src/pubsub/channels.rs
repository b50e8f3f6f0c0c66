//! Pub/Sub channel naming.

use tube_core::Snowflake;

/// Everything that happens to a video, its comments and their reactions
pub const VIDEO_CHANNEL_PREFIX: &str = "video:";
pub const USER_CHANNEL_PREFIX: &str = "user:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    Video(Snowflake),
    User(Snowflake),
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn video(video_id: Snowflake) -> Self {
        Self::Video(video_id)
    }

    #[must_use]
    pub fn user(user_id: Snowflake) -> Self {
        Self::User(user_id)
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Video(id) => format!("{VIDEO_CHANNEL_PREFIX}{id}"),
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Inverse of [`PubSubChannel::name`]. Unknown names become `Custom`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let typed = |prefix: &str| {
            name.strip_prefix(prefix)
                .and_then(|id| Snowflake::parse(id).ok())
        };

        if let Some(id) = typed(VIDEO_CHANNEL_PREFIX) {
            return Self::Video(id);
        }
        if let Some(id) = typed(USER_CHANNEL_PREFIX) {
            return Self::User(id);
        }
        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
