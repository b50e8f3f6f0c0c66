//! # tube-core
//!
//! Domain layer containing entities, the engagement state machine, repository
//! traits, and domain events. This crate has zero dependencies on
//! infrastructure (database, web framework, etc.).

pub mod engagement;
pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use engagement::{
    CounterDelta, Counters, ReactionKind, ReactionStatus, TargetKind, TargetRef, Transition,
};
pub use entities::{Comment, Reaction, Target, User, Video, MAX_COMMENT_LENGTH};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    CommentRepository, CounterMaintainer, EngagementStore, EngagementUnit, PageQuery,
    ReactionStore, RepoResult, TargetResolver, UserRepository, VideoRepository,
};
pub use value_objects::{InvalidWorkerId, Snowflake, SnowflakeGenerator, SnowflakeParseError};
