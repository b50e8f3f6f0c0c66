//! Like/dislike state machine
//!
//! [`ReactionEngine::react`] reads the reaction the actor currently holds,
//! plans the [`Transition`], and applies the reaction write and the matching
//! counter delta in one [`EngagementUnit`](tube_core::EngagementUnit). If a
//! concurrent request by the same actor wins the unique-key race, the unit is
//! discarded and the whole decision is made again from fresh state, once.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use tube_core::engagement::{CounterDelta, Counters, ReactionKind, ReactionStatus, TargetRef, Transition};
use tube_core::entities::{Reaction, Target};
use tube_core::error::DomainError;
use tube_core::traits::{EngagementStore, TargetResolver};
use tube_core::value_objects::{Snowflake, SnowflakeGenerator};

const MAX_ATTEMPTS: u32 = 2;

pub type EngineResult<T> = Result<T, DomainError>;

/// Result of a committed reaction request.
#[derive(Debug, Clone)]
pub struct ReactionOutcome {
    pub transition: Transition,
    pub status: ReactionStatus,
    pub counters: Counters,
    pub message: String,
    /// The target entity carrying the committed counters
    pub target: Target,
}

#[derive(Clone)]
pub struct ReactionEngine {
    store: Arc<dyn EngagementStore>,
    resolver: Arc<dyn TargetResolver>,
    ids: Arc<SnowflakeGenerator>,
}

impl std::fmt::Debug for ReactionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionEngine")
            .field("worker_id", &self.ids.worker_id())
            .finish_non_exhaustive()
    }
}

impl ReactionEngine {
    pub fn new(
        store: Arc<dyn EngagementStore>,
        resolver: Arc<dyn TargetResolver>,
        ids: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            store,
            resolver,
            ids,
        }
    }

    /// Apply a like or dislike request from `actor` to `target`.
    #[instrument(skip(self), fields(target = %target))]
    pub async fn react(
        &self,
        actor: Snowflake,
        target: TargetRef,
        kind: ReactionKind,
    ) -> EngineResult<ReactionOutcome> {
        let entity = self.resolve(target).await?;

        let mut attempt = 1;
        let (transition, counters) = loop {
            match self.apply(actor, target, kind).await {
                Ok(applied) => break applied,
                Err(e) if e.is_reaction_conflict() && attempt < MAX_ATTEMPTS => {
                    warn!(
                        actor = %actor,
                        target = %target,
                        kind = %kind,
                        attempt,
                        "Lost reaction race, retrying"
                    );
                    attempt += 1;
                }
                Err(e) if e.is_reaction_conflict() => {
                    error!(
                        actor = %actor,
                        target = %target,
                        kind = %kind,
                        "Reaction conflict persisted after retry"
                    );
                    return Err(DomainError::InternalError(format!(
                        "reaction by {actor} on {target} kept conflicting"
                    )));
                }
                Err(e) => {
                    if e.is_internal() {
                        error!(
                            actor = %actor,
                            target = %target,
                            kind = %kind,
                            error = %e,
                            "Reaction write failed"
                        );
                    }
                    return Err(e);
                }
            }
        };

        info!(
            actor = %actor,
            target = %target,
            transition = ?transition,
            likes = counters.likes,
            dislikes = counters.dislikes,
            "Reaction applied"
        );

        Ok(ReactionOutcome {
            transition,
            status: transition.status(),
            counters,
            message: transition.message(target.kind),
            target: entity.with_counters(counters),
        })
    }

    /// One attempt in its own unit. Any early return drops the unit, which
    /// rolls it back.
    async fn apply(
        &self,
        actor: Snowflake,
        target: TargetRef,
        kind: ReactionKind,
    ) -> EngineResult<(Transition, Counters)> {
        let mut unit = self.store.begin().await?;

        let held = unit.find(actor, target).await?;
        let transition = Transition::plan(held.as_ref().map(|r| r.kind), kind);

        match (transition, held.map(|r| r.id)) {
            (Transition::Added(kind), _) => {
                let reaction = Reaction::new(self.ids.generate(), actor, target, kind);
                unit.create(&reaction).await?;
            }
            (Transition::Removed(_), Some(id)) => unit.delete(id).await?,
            (Transition::Switched { to, .. }, Some(id)) => {
                unit.update_kind(id, to).await?;
            }
            (_, None) => {
                return Err(DomainError::InternalError(
                    "transition planned against a missing reaction".to_string(),
                ))
            }
        }

        let counters = unit.adjust(target, transition.delta()).await?;
        unit.commit().await?;

        Ok((transition, counters))
    }

    /// What the actor currently holds on the target.
    #[instrument(skip(self), fields(target = %target))]
    pub async fn status(&self, actor: Snowflake, target: TargetRef) -> EngineResult<ReactionStatus> {
        self.resolve(target).await?;

        let held = self.store.find_reaction(actor, target).await?;
        Ok(held.map(|r| r.kind).into())
    }

    /// Delete `target` with every reaction on it and on `dependents`
    /// (the comments of a video). Returns the number of reactions removed.
    #[instrument(skip(self, dependents), fields(target = %target, dependents = dependents.len()))]
    pub async fn remove_target(&self, target: TargetRef, dependents: &[TargetRef]) -> EngineResult<u64> {
        let mut unit = self.store.begin().await?;

        let mut removed = 0;
        for dependent in dependents {
            removed += unit.delete_all_for_target(*dependent).await?;
        }
        removed += unit.delete_all_for_target(target).await?;
        unit.remove_target(target).await?;
        unit.commit().await?;

        info!(target = %target, reactions_removed = removed, "Target removed");
        Ok(removed)
    }

    /// Recount the reactions on `target` and overwrite its counters if they
    /// drifted. Returns the corrected counters.
    #[instrument(skip(self), fields(target = %target))]
    pub async fn reconcile(&self, target: TargetRef) -> EngineResult<Counters> {
        let mut unit = self.store.begin().await?;

        // A zero delta reads the stored totals and locks the target row.
        let stored = unit.adjust(target, CounterDelta::default()).await?;
        let actual = unit.count_by_kind(target).await?;

        if stored != actual {
            warn!(
                target = %target,
                stored_likes = stored.likes,
                stored_dislikes = stored.dislikes,
                likes = actual.likes,
                dislikes = actual.dislikes,
                "Counter drift repaired"
            );
            unit.overwrite(target, actual).await?;
        }
        unit.commit().await?;

        Ok(actual)
    }

    async fn resolve(&self, target: TargetRef) -> EngineResult<Target> {
        self.resolver
            .resolve(target)
            .await?
            .ok_or(DomainError::TargetNotFound(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    use async_trait::async_trait;
    use tube_core::entities::{Comment, Video};
    use tube_core::traits::{CounterMaintainer, EngagementUnit, ReactionStore, RepoResult};
    use tube_db::MemoryEngagementStore;

    const LIKE: ReactionKind = ReactionKind::Like;
    const DISLIKE: ReactionKind = ReactionKind::Dislike;

    fn ids() -> Arc<SnowflakeGenerator> {
        Arc::new(SnowflakeGenerator::new(1).unwrap())
    }

    fn engine_for(store: &MemoryEngagementStore) -> ReactionEngine {
        ReactionEngine::new(Arc::new(store.clone()), Arc::new(store.clone()), ids())
    }

    async fn seeded() -> (MemoryEngagementStore, TargetRef, TargetRef) {
        let store = MemoryEngagementStore::new();
        let video = Video::new(
            Snowflake::new(10),
            Snowflake::new(1),
            "clip".to_string(),
            "https://cdn.example.com/clip.mp4".to_string(),
        );
        let comment = Comment::new(
            Snowflake::new(20),
            video.id,
            Snowflake::new(1),
            "first".to_string(),
        );
        store.insert_video(video).await;
        store.insert_comment(comment).await;
        (
            store,
            TargetRef::video(Snowflake::new(10)),
            TargetRef::comment(Snowflake::new(20)),
        )
    }

    async fn assert_projection_matches(store: &MemoryEngagementStore, target: TargetRef) {
        let rows = store.reactions_for(target).await;
        let likes = rows.iter().filter(|r| r.kind == LIKE).count() as i64;
        let dislikes = rows.iter().filter(|r| r.kind == DISLIKE).count() as i64;
        assert_eq!(store.counters(target).await, Some(Counters::new(likes, dislikes)));
    }

    #[tokio::test]
    async fn test_same_kind_twice_toggles_off() {
        let (store, video, _) = seeded().await;
        let engine = engine_for(&store);
        let actor = Snowflake::new(2);

        let first = engine.react(actor, video, LIKE).await.unwrap();
        assert_eq!(first.status, ReactionStatus::Like);
        assert_eq!(first.counters, Counters::new(1, 0));
        assert_eq!(first.message, "Video liked");

        let second = engine.react(actor, video, LIKE).await.unwrap();
        assert_eq!(second.status, ReactionStatus::None);
        assert_eq!(second.counters, Counters::default());
        assert_eq!(second.message, "Like removed");
        assert!(store.reactions_for(video).await.is_empty());
    }

    #[tokio::test]
    async fn test_flip_keeps_single_row() {
        let (store, _, comment) = seeded().await;
        let engine = engine_for(&store);
        let actor = Snowflake::new(2);

        engine.react(actor, comment, LIKE).await.unwrap();
        let flipped = engine.react(actor, comment, DISLIKE).await.unwrap();

        assert_eq!(flipped.counters, Counters::new(0, 1));
        assert_eq!(flipped.message, "Changed like to dislike");
        let rows = store.reactions_for(comment).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, DISLIKE);
        assert!(matches!(flipped.target, Target::Comment(c) if c.dislikes == 1));
    }

    #[tokio::test]
    async fn test_dislike_like_like_scenario() {
        let (store, video, _) = seeded().await;
        let engine = engine_for(&store);
        let actor = Snowflake::new(3);

        let step = engine.react(actor, video, DISLIKE).await.unwrap();
        assert_eq!((step.counters, step.status), (Counters::new(0, 1), ReactionStatus::Dislike));
        assert_eq!(step.message, "Video disliked");

        let step = engine.react(actor, video, LIKE).await.unwrap();
        assert_eq!((step.counters, step.status), (Counters::new(1, 0), ReactionStatus::Like));
        assert_eq!(step.message, "Changed dislike to like");

        let step = engine.react(actor, video, LIKE).await.unwrap();
        assert_eq!((step.counters, step.status), (Counters::default(), ReactionStatus::None));
        assert_eq!(step.message, "Like removed");

        assert_eq!(engine.status(actor, video).await.unwrap(), ReactionStatus::None);
    }

    #[tokio::test]
    async fn test_mixed_sequence_keeps_counters_consistent() {
        let (store, video, comment) = seeded().await;
        let engine = engine_for(&store);

        // Deterministic spread over 4 actors, both targets and both kinds.
        for step in 0u32..60 {
            let actor = Snowflake::new(100 + i64::from(step * 7 % 4));
            let target = if step % 3 == 0 { comment } else { video };
            let kind = if step * 5 % 7 < 4 { LIKE } else { DISLIKE };
            engine.react(actor, target, kind).await.unwrap();

            assert_projection_matches(&store, target).await;
        }

        for target in [video, comment] {
            let rows = store.reactions_for(target).await;
            let mut actors: Vec<_> = rows.iter().map(|r| r.actor_id).collect();
            actors.sort();
            actors.dedup();
            assert_eq!(actors.len(), rows.len());
        }
    }

    // Memory units hold the store lock from begin to commit, so spawned
    // requests queue up. Interleaving is covered against Postgres in
    // tests/engine_postgres.rs.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_queued_likes_from_distinct_actors_all_count() {
        let (store, video, _) = seeded().await;
        let engine = Arc::new(engine_for(&store));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move { engine.react(Snowflake::new(500 + i), video, LIKE).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.counters(video).await, Some(Counters::new(10, 0)));
        assert_eq!(store.reactions_for(video).await.len(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_queued_requests_from_same_actor_keep_one_row() {
        let (store, video, _) = seeded().await;
        let engine = Arc::new(engine_for(&store));
        let actor = Snowflake::new(9);

        let handles: Vec<_> = [LIKE, DISLIKE, LIKE, LIKE, DISLIKE]
            .into_iter()
            .map(|kind| {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move { engine.react(actor, video, kind).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(store.reactions_for(video).await.len() <= 1);
        assert_projection_matches(&store, video).await;
    }

    #[tokio::test]
    async fn test_missing_target_is_not_found() {
        let (store, _, _) = seeded().await;
        let engine = engine_for(&store);
        let ghost = TargetRef::video(Snowflake::new(404));

        let err = engine.react(Snowflake::new(2), ghost, LIKE).await.unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound(t) if t == ghost));

        let err = engine.status(Snowflake::new(2), ghost).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.reaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_video_cascades_all_reactions() {
        let (store, video, comment) = seeded().await;
        let engine = engine_for(&store);

        for actor in 1..=3 {
            engine.react(Snowflake::new(actor), video, LIKE).await.unwrap();
        }
        engine.react(Snowflake::new(4), comment, DISLIKE).await.unwrap();

        let removed = engine.remove_target(video, &[comment]).await.unwrap();

        assert_eq!(removed, 4);
        assert_eq!(store.reaction_count().await, 0);
        assert_eq!(store.counters(video).await, None);
        assert_eq!(store.counters(comment).await, None);
    }

    #[tokio::test]
    async fn test_reconcile_repairs_drift() {
        let (store, video, _) = seeded().await;
        let engine = engine_for(&store);
        engine.react(Snowflake::new(2), video, LIKE).await.unwrap();
        engine.react(Snowflake::new(3), video, DISLIKE).await.unwrap();

        // Knock the projection out of step behind the engine's back.
        let mut unit = store.begin().await.unwrap();
        unit.overwrite(video, Counters::new(7, 0)).await.unwrap();
        unit.commit().await.unwrap();

        let repaired = engine.reconcile(video).await.unwrap();
        assert_eq!(repaired, Counters::new(1, 1));
        assert_eq!(store.counters(video).await, Some(Counters::new(1, 1)));

        // Already consistent: nothing changes.
        assert_eq!(engine.reconcile(video).await.unwrap(), Counters::new(1, 1));
    }

    #[tokio::test]
    async fn test_underflow_rolls_back_the_reaction_write() {
        let (store, video, _) = seeded().await;
        let engine = engine_for(&store);
        let actor = Snowflake::new(2);
        engine.react(actor, video, LIKE).await.unwrap();

        // Counter says zero while a like row exists.
        let mut unit = store.begin().await.unwrap();
        unit.overwrite(video, Counters::default()).await.unwrap();
        unit.commit().await.unwrap();

        let err = engine.react(actor, video, LIKE).await.unwrap_err();
        assert!(matches!(err, DomainError::CounterUnderflow(_)));
        assert_eq!(store.reactions_for(video).await.len(), 1);
        assert_eq!(store.counters(video).await, Some(Counters::default()));
    }

    // ------------------------------------------------------------------------
    // Lost-race simulation
    // ------------------------------------------------------------------------

    /// Commits a rival reaction before the first unit it hands out, and hides
    /// existing rows from `find` for the first `blind_units` units, so the
    /// engine plans an insert that then hits the unique key.
    struct RacingStore {
        inner: MemoryEngagementStore,
        rival: Reaction,
        rival_committed: AtomicBool,
        blind_units: AtomicU32,
        begun: AtomicU32,
    }

    impl RacingStore {
        fn new(inner: MemoryEngagementStore, rival: Reaction, blind_units: u32) -> Self {
            Self {
                inner,
                rival,
                rival_committed: AtomicBool::new(false),
                blind_units: AtomicU32::new(blind_units),
                begun: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl EngagementStore for RacingStore {
        async fn begin(&self) -> RepoResult<Box<dyn EngagementUnit>> {
            self.begun.fetch_add(1, Ordering::SeqCst);
            if !self.rival_committed.swap(true, Ordering::SeqCst) {
                let mut unit = self.inner.begin().await?;
                unit.create(&self.rival).await?;
                unit.adjust(self.rival.target, CounterDelta::increment(self.rival.kind))
                    .await?;
                unit.commit().await?;
            }

            let blind = self
                .blind_units
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            Ok(Box::new(RacingUnit {
                inner: self.inner.begin().await?,
                blind,
            }))
        }

        async fn find_reaction(&self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>> {
            self.inner.find_reaction(actor, target).await
        }
    }

    struct RacingUnit {
        inner: Box<dyn EngagementUnit>,
        blind: bool,
    }

    #[async_trait]
    impl ReactionStore for RacingUnit {
        async fn find(&mut self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>> {
            if self.blind {
                return Ok(None);
            }
            self.inner.find(actor, target).await
        }

        async fn create(&mut self, reaction: &Reaction) -> RepoResult<()> {
            self.inner.create(reaction).await
        }

        async fn update_kind(&mut self, id: Snowflake, kind: ReactionKind) -> RepoResult<Reaction> {
            self.inner.update_kind(id, kind).await
        }

        async fn delete(&mut self, id: Snowflake) -> RepoResult<()> {
            self.inner.delete(id).await
        }

        async fn delete_all_for_target(&mut self, target: TargetRef) -> RepoResult<u64> {
            self.inner.delete_all_for_target(target).await
        }

        async fn count_by_kind(&mut self, target: TargetRef) -> RepoResult<Counters> {
            self.inner.count_by_kind(target).await
        }
    }

    #[async_trait]
    impl CounterMaintainer for RacingUnit {
        async fn adjust(&mut self, target: TargetRef, delta: CounterDelta) -> RepoResult<Counters> {
            self.inner.adjust(target, delta).await
        }

        async fn overwrite(&mut self, target: TargetRef, counters: Counters) -> RepoResult<()> {
            self.inner.overwrite(target, counters).await
        }
    }

    #[async_trait]
    impl EngagementUnit for RacingUnit {
        async fn remove_target(&mut self, target: TargetRef) -> RepoResult<()> {
            self.inner.remove_target(target).await
        }

        async fn commit(self: Box<Self>) -> RepoResult<()> {
            self.inner.commit().await
        }
    }

    #[tokio::test]
    async fn test_lost_race_is_retried_from_fresh_state() {
        let (store, video, _) = seeded().await;
        let actor = Snowflake::new(2);
        let rival = Reaction::new(Snowflake::new(900), actor, video, DISLIKE);
        let racing = Arc::new(RacingStore::new(store.clone(), rival, 1));
        let engine = ReactionEngine::new(racing.clone(), Arc::new(store.clone()), ids());

        let outcome = engine.react(actor, video, LIKE).await.unwrap();

        // The retry saw the rival dislike and flipped it.
        assert_eq!(outcome.message, "Changed dislike to like");
        assert_eq!(outcome.counters, Counters::new(1, 0));
        assert_eq!(racing.begun.load(Ordering::SeqCst), 2);
        assert_eq!(store.reactions_for(video).await.len(), 1);
        assert_projection_matches(&store, video).await;
    }

    #[tokio::test]
    async fn test_second_conflict_surfaces_as_internal_error() {
        let (store, video, _) = seeded().await;
        let actor = Snowflake::new(2);
        let rival = Reaction::new(Snowflake::new(900), actor, video, LIKE);
        let racing = Arc::new(RacingStore::new(store.clone(), rival, 2));
        let engine = ReactionEngine::new(racing.clone(), Arc::new(store.clone()), ids());

        let err = engine.react(actor, video, LIKE).await.unwrap_err();

        assert!(matches!(err, DomainError::InternalError(_)));
        assert_eq!(racing.begun.load(Ordering::SeqCst), 2);
        // Only the rival's committed write remains.
        assert_eq!(store.counters(video).await, Some(Counters::new(1, 0)));
        assert_projection_matches(&store, video).await;
    }
}
