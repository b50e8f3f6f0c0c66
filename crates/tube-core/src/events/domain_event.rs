//! Domain events - emitted after a state change commits
//!
//! Services publish these to Redis so that other processes can refresh
//! caches or push live counter updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engagement::{Counters, ReactionStatus, TargetKind, TargetRef};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Video Events
    // =========================================================================
    VideoCreated(VideoEvent),
    VideoUpdated(VideoEvent),

    // =========================================================================
    // Comment Events
    // =========================================================================
    CommentCreated(CommentEvent),
    CommentUpdated(CommentEvent),

    // =========================================================================
    // Engagement Events
    // =========================================================================
    ReactionChanged(ReactionChangedEvent),
    TargetRemoved(TargetRemovedEvent),
}

impl DomainEvent {
    /// Name used when the event is published
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::VideoCreated(_) => "VIDEO_CREATED",
            Self::VideoUpdated(_) => "VIDEO_UPDATED",
            Self::CommentCreated(_) => "COMMENT_CREATED",
            Self::CommentUpdated(_) => "COMMENT_UPDATED",
            Self::ReactionChanged(e) => match e.target.kind {
                TargetKind::Video => "VIDEO_REACTION_UPDATE",
                TargetKind::Comment => "COMMENT_REACTION_UPDATE",
            },
            Self::TargetRemoved(_) => "TARGET_REMOVED",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::VideoCreated(e) | Self::VideoUpdated(e) => e.timestamp,
            Self::CommentCreated(e) | Self::CommentUpdated(e) => e.timestamp,
            Self::ReactionChanged(e) => e.timestamp,
            Self::TargetRemoved(e) => e.timestamp,
        }
    }

    /// The video whose subscribers should hear about this event.
    pub fn video_id(&self) -> Snowflake {
        match self {
            Self::VideoCreated(e) | Self::VideoUpdated(e) => e.video_id,
            Self::CommentCreated(e) | Self::CommentUpdated(e) => e.video_id,
            Self::ReactionChanged(e) => e.video_id,
            Self::TargetRemoved(e) => e.video_id,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEvent {
    pub video_id: Snowflake,
    pub owner_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEvent {
    pub comment_id: Snowflake,
    pub video_id: Snowflake,
    pub author_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionChangedEvent {
    pub target: TargetRef,
    /// Video the target belongs to (the target itself for videos).
    pub video_id: Snowflake,
    pub actor_id: Snowflake,
    pub status: ReactionStatus,
    pub counters: Counters,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRemovedEvent {
    pub target: TargetRef,
    pub video_id: Snowflake,
    pub reactions_removed: u64,
    pub timestamp: DateTime<Utc>,
}
