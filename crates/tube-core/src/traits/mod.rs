//! Repository and unit-of-work traits (ports)

mod engagement;
mod repositories;

pub use engagement::{
    CounterMaintainer, EngagementStore, EngagementUnit, ReactionStore, TargetResolver,
};
pub use repositories::{
    CommentRepository, PageQuery, RepoResult, UserRepository, VideoRepository,
};
