//! In-memory engagement store
//!
//! Mirrors the PostgreSQL semantics closely enough to exercise the reaction
//! engine without a database: units are serialized by an async mutex, work on
//! a staged copy of the state, and only publish it on commit. Deleting a
//! video also deletes its comments, like the `ON DELETE CASCADE` foreign key.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use tube_core::engagement::{CounterDelta, Counters, ReactionKind, TargetKind, TargetRef};
use tube_core::entities::{Comment, Reaction, Target, Video};
use tube_core::error::DomainError;
use tube_core::traits::{
    CounterMaintainer, EngagementStore, EngagementUnit, ReactionStore, RepoResult, TargetResolver,
};
use tube_core::value_objects::Snowflake;

#[derive(Debug, Clone, Default)]
struct State {
    videos: HashMap<Snowflake, Video>,
    comments: HashMap<Snowflake, Comment>,
    reactions: HashMap<Snowflake, Reaction>,
}

impl State {
    fn find(&self, actor: Snowflake, target: TargetRef) -> Option<&Reaction> {
        self.reactions
            .values()
            .find(|r| r.actor_id == actor && r.target == target)
    }

    fn counters_mut(&mut self, target: TargetRef) -> Option<(&mut i64, &mut i64)> {
        match target.kind {
            TargetKind::Video => self
                .videos
                .get_mut(&target.id)
                .map(|v| (&mut v.likes, &mut v.dislikes)),
            TargetKind::Comment => self
                .comments
                .get_mut(&target.id)
                .map(|c| (&mut c.likes, &mut c.dislikes)),
        }
    }

    fn counters(&self, target: TargetRef) -> Option<Counters> {
        match target.kind {
            TargetKind::Video => self.videos.get(&target.id).map(Video::counters),
            TargetKind::Comment => self.comments.get(&target.id).map(Comment::counters),
        }
    }

    fn exists(&self, target: TargetRef) -> bool {
        self.counters(target).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryEngagementStore {
    state: Arc<Mutex<State>>,
}

impl MemoryEngagementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_video(&self, video: Video) {
        self.state.lock().await.videos.insert(video.id, video);
    }

    pub async fn insert_comment(&self, comment: Comment) {
        self.state.lock().await.comments.insert(comment.id, comment);
    }

    /// Stored counters for a target, if it exists.
    pub async fn counters(&self, target: TargetRef) -> Option<Counters> {
        self.state.lock().await.counters(target)
    }

    /// All reaction rows pointing at a target.
    pub async fn reactions_for(&self, target: TargetRef) -> Vec<Reaction> {
        self.state
            .lock()
            .await
            .reactions
            .values()
            .filter(|r| r.target == target)
            .cloned()
            .collect()
    }

    pub async fn reaction_count(&self) -> usize {
        self.state.lock().await.reactions.len()
    }
}

#[async_trait]
impl TargetResolver for MemoryEngagementStore {
    async fn resolve(&self, target: TargetRef) -> RepoResult<Option<Target>> {
        let state = self.state.lock().await;
        Ok(match target.kind {
            TargetKind::Video => state.videos.get(&target.id).cloned().map(Target::Video),
            TargetKind::Comment => state.comments.get(&target.id).cloned().map(Target::Comment),
        })
    }
}

#[async_trait]
impl EngagementStore for MemoryEngagementStore {
    async fn begin(&self) -> RepoResult<Box<dyn EngagementUnit>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryEngagementUnit { guard, staged }))
    }

    async fn find_reaction(&self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>> {
        Ok(self.state.lock().await.find(actor, target).cloned())
    }
}

/// Holds the store lock for its whole lifetime; writes go to `staged`.
pub struct MemoryEngagementUnit {
    guard: OwnedMutexGuard<State>,
    staged: State,
}

#[async_trait]
impl ReactionStore for MemoryEngagementUnit {
    async fn find(&mut self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>> {
        Ok(self.staged.find(actor, target).cloned())
    }

    async fn create(&mut self, reaction: &Reaction) -> RepoResult<()> {
        if self.staged.find(reaction.actor_id, reaction.target).is_some() {
            return Err(DomainError::ReactionConflict {
                actor: reaction.actor_id,
                target: reaction.target,
            });
        }
        if !self.staged.exists(reaction.target) {
            return Err(DomainError::TargetNotFound(reaction.target));
        }
        self.staged.reactions.insert(reaction.id, reaction.clone());
        Ok(())
    }

    async fn update_kind(&mut self, id: Snowflake, kind: ReactionKind) -> RepoResult<Reaction> {
        let reaction = self
            .staged
            .reactions
            .get_mut(&id)
            .ok_or_else(|| DomainError::InternalError(format!("reaction {id} vanished mid-update")))?;
        reaction.set_kind(kind);
        Ok(reaction.clone())
    }

    async fn delete(&mut self, id: Snowflake) -> RepoResult<()> {
        self.staged
            .reactions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::InternalError(format!("reaction {id} vanished mid-delete")))
    }

    async fn delete_all_for_target(&mut self, target: TargetRef) -> RepoResult<u64> {
        let before = self.staged.reactions.len();
        self.staged.reactions.retain(|_, r| r.target != target);
        Ok((before - self.staged.reactions.len()) as u64)
    }

    async fn count_by_kind(&mut self, target: TargetRef) -> RepoResult<Counters> {
        let mut counters = Counters::default();
        for reaction in self.staged.reactions.values().filter(|r| r.target == target) {
            match reaction.kind {
                ReactionKind::Like => counters.likes += 1,
                ReactionKind::Dislike => counters.dislikes += 1,
            }
        }
        Ok(counters)
    }
}

#[async_trait]
impl CounterMaintainer for MemoryEngagementUnit {
    async fn adjust(&mut self, target: TargetRef, delta: CounterDelta) -> RepoResult<Counters> {
        let (likes, dislikes) = self
            .staged
            .counters_mut(target)
            .ok_or(DomainError::TargetNotFound(target))?;

        let next = Counters::new(*likes, *dislikes)
            .checked_apply(delta)
            .ok_or(DomainError::CounterUnderflow(target))?;
        *likes = next.likes;
        *dislikes = next.dislikes;
        Ok(next)
    }

    async fn overwrite(&mut self, target: TargetRef, counters: Counters) -> RepoResult<()> {
        let (likes, dislikes) = self
            .staged
            .counters_mut(target)
            .ok_or(DomainError::TargetNotFound(target))?;
        *likes = counters.likes;
        *dislikes = counters.dislikes;
        Ok(())
    }
}

#[async_trait]
impl EngagementUnit for MemoryEngagementUnit {
    async fn remove_target(&mut self, target: TargetRef) -> RepoResult<()> {
        let removed = match target.kind {
            TargetKind::Video => {
                let removed = self.staged.videos.remove(&target.id).is_some();
                if removed {
                    let orphans: Vec<Snowflake> = self
                        .staged
                        .comments
                        .values()
                        .filter(|c| c.video_id == target.id)
                        .map(|c| c.id)
                        .collect();
                    for id in orphans {
                        self.staged.comments.remove(&id);
                        self.staged
                            .reactions
                            .retain(|_, r| r.target != TargetRef::comment(id));
                    }
                }
                removed
            }
            TargetKind::Comment => self.staged.comments.remove(&target.id).is_some(),
        };

        if !removed {
            return Err(DomainError::TargetNotFound(target));
        }
        self.staged.reactions.retain(|_, r| r.target != target);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let Self { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
