//! Engagement ports - reaction storage, counter projection and the unit of
//! work that binds them.
//!
//! Every reaction change runs inside an [`EngagementUnit`]. A unit that is
//! dropped without [`EngagementUnit::commit`] must discard all of its writes,
//! so a cancelled request can never leave a reaction row and its counter
//! out of step.

use async_trait::async_trait;

use crate::engagement::{CounterDelta, Counters, ReactionKind, TargetRef};
use crate::entities::{Reaction, Target};
use crate::value_objects::Snowflake;

use super::RepoResult;

/// Looks up the live entity behind a target reference.
#[async_trait]
pub trait TargetResolver: Send + Sync {
    async fn resolve(&self, target: TargetRef) -> RepoResult<Option<Target>>;
}

/// Reaction rows keyed by (actor, target).
#[async_trait]
pub trait ReactionStore: Send {
    /// Find the actor's reaction and hold it against concurrent writers
    /// until the unit finishes.
    async fn find(&mut self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>>;

    /// Insert a reaction. Fails with `ReactionConflict` when the actor already
    /// has one on the target.
    async fn create(&mut self, reaction: &Reaction) -> RepoResult<()>;

    async fn update_kind(&mut self, id: Snowflake, kind: ReactionKind) -> RepoResult<Reaction>;

    async fn delete(&mut self, id: Snowflake) -> RepoResult<()>;

    /// Delete every reaction on the target and return how many went.
    async fn delete_all_for_target(&mut self, target: TargetRef) -> RepoResult<u64>;

    /// Recount reactions on the target from the rows themselves.
    async fn count_by_kind(&mut self, target: TargetRef) -> RepoResult<Counters>;
}

/// The `likes`/`dislikes` projection stored on videos and comments.
#[async_trait]
pub trait CounterMaintainer: Send {
    /// Apply a signed delta in storage and return the resulting totals.
    ///
    /// Fails with `CounterUnderflow` if either total would go negative and
    /// with a not-found error if the target row is gone.
    async fn adjust(&mut self, target: TargetRef, delta: CounterDelta) -> RepoResult<Counters>;

    /// Replace the totals outright. Only reconciliation uses this.
    async fn overwrite(&mut self, target: TargetRef, counters: Counters) -> RepoResult<()>;
}

/// A single atomic engagement write.
#[async_trait]
pub trait EngagementUnit: ReactionStore + CounterMaintainer {
    /// Delete the target entity itself. Callers clear its reactions first.
    async fn remove_target(&mut self, target: TargetRef) -> RepoResult<()>;

    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

#[async_trait]
pub trait EngagementStore: Send + Sync {
    async fn begin(&self) -> RepoResult<Box<dyn EngagementUnit>>;

    /// Read the actor's reaction outside of any unit.
    async fn find_reaction(&self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>>;
}
