//! Engagement - the like/dislike relation between a user and a target.
//!
//! The reaction set is the source of truth; the `likes`/`dislikes` columns
//! on videos and comments are a projection of it. Everything that changes
//! either goes through a [`Transition`] so both stay in step.

mod counters;
mod kind;
mod target;
mod transition;

pub use counters::{CounterDelta, Counters};
pub use kind::{ReactionKind, ReactionStatus};
pub use target::{TargetKind, TargetRef};
pub use transition::Transition;
