//! PostgreSQL engagement store
//!
//! A [`PgEngagementUnit`] wraps one transaction. Reaction rows and the
//! counter columns on `videos`/`comments` are written through the same
//! transaction, so they commit or roll back together. Dropping a unit
//! without committing rolls it back (sqlx issues the ROLLBACK on drop).

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use tube_core::engagement::{CounterDelta, Counters, ReactionKind, TargetRef};
use tube_core::entities::{Reaction, Target};
use tube_core::error::DomainError;
use tube_core::traits::{
    CommentRepository, CounterMaintainer, EngagementStore, EngagementUnit, ReactionStore,
    RepoResult, TargetResolver, VideoRepository,
};
use tube_core::value_objects::Snowflake;

use crate::models::{CountersModel, ReactionModel};

use super::error::{
    map_db_error, map_reaction_insert_error, reaction_column, target_not_found, target_table,
};
use super::{PgCommentRepository, PgVideoRepository};

const REACTION_COLUMNS: &str = "id, actor_id, video_id, comment_id, kind, created_at, updated_at";

// ============================================================================
// Target Resolver
// ============================================================================

#[derive(Clone)]
pub struct PgTargetResolver {
    videos: PgVideoRepository,
    comments: PgCommentRepository,
}

impl PgTargetResolver {
    pub fn new(pool: PgPool) -> Self {
        Self {
            videos: PgVideoRepository::new(pool.clone()),
            comments: PgCommentRepository::new(pool),
        }
    }
}

#[async_trait]
impl TargetResolver for PgTargetResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, target: TargetRef) -> RepoResult<Option<Target>> {
        use tube_core::engagement::TargetKind;

        Ok(match target.kind {
            TargetKind::Video => self.videos.find_by_id(target.id).await?.map(Target::Video),
            TargetKind::Comment => self.comments.find_by_id(target.id).await?.map(Target::Comment),
        })
    }
}

// ============================================================================
// Engagement Store
// ============================================================================

#[derive(Clone)]
pub struct PgEngagementStore {
    pool: PgPool,
}

impl PgEngagementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementStore for PgEngagementStore {
    async fn begin(&self) -> RepoResult<Box<dyn EngagementUnit>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgEngagementUnit { tx }))
    }

    #[instrument(skip(self))]
    async fn find_reaction(&self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>> {
        let sql = format!(
            "SELECT {REACTION_COLUMNS} FROM reactions WHERE actor_id = $1 AND {} = $2",
            reaction_column(target.kind)
        );

        sqlx::query_as::<_, ReactionModel>(&sql)
            .bind(actor.into_inner())
            .bind(target.id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Reaction::try_from)
            .transpose()
    }
}

pub struct PgEngagementUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReactionStore for PgEngagementUnit {
    #[instrument(skip(self))]
    async fn find(&mut self, actor: Snowflake, target: TargetRef) -> RepoResult<Option<Reaction>> {
        let sql = format!(
            "SELECT {REACTION_COLUMNS} FROM reactions \
             WHERE actor_id = $1 AND {} = $2 FOR UPDATE",
            reaction_column(target.kind)
        );

        sqlx::query_as::<_, ReactionModel>(&sql)
            .bind(actor.into_inner())
            .bind(target.id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?
            .map(Reaction::try_from)
            .transpose()
    }

    #[instrument(skip(self, reaction), fields(actor = %reaction.actor_id, target = %reaction.target))]
    async fn create(&mut self, reaction: &Reaction) -> RepoResult<()> {
        let sql = format!(
            "INSERT INTO reactions (id, actor_id, {}, kind, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
            reaction_column(reaction.target.kind)
        );

        sqlx::query(&sql)
            .bind(reaction.id.into_inner())
            .bind(reaction.actor_id.into_inner())
            .bind(reaction.target.id.into_inner())
            .bind(reaction.kind.as_str())
            .bind(reaction.created_at)
            .bind(reaction.updated_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_reaction_insert_error(e, reaction.actor_id, reaction.target))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_kind(&mut self, id: Snowflake, kind: ReactionKind) -> RepoResult<Reaction> {
        let sql = format!(
            "UPDATE reactions SET kind = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {REACTION_COLUMNS}"
        );

        let model = sqlx::query_as::<_, ReactionModel>(&sql)
            .bind(id.into_inner())
            .bind(kind.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| DomainError::InternalError(format!("reaction {id} vanished mid-update")))?;

        Reaction::try_from(model)
    }

    #[instrument(skip(self))]
    async fn delete(&mut self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM reactions WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InternalError(format!(
                "reaction {id} vanished mid-delete"
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all_for_target(&mut self, target: TargetRef) -> RepoResult<u64> {
        let sql = format!(
            "DELETE FROM reactions WHERE {} = $1",
            reaction_column(target.kind)
        );

        let result = sqlx::query(&sql)
            .bind(target.id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn count_by_kind(&mut self, target: TargetRef) -> RepoResult<Counters> {
        let sql = format!(
            "SELECT COUNT(*) FILTER (WHERE kind = 'like') AS likes, \
                    COUNT(*) FILTER (WHERE kind = 'dislike') AS dislikes \
             FROM reactions WHERE {} = $1",
            reaction_column(target.kind)
        );

        let counts = sqlx::query_as::<_, CountersModel>(&sql)
            .bind(target.id.into_inner())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(counts.into())
    }
}

#[async_trait]
impl CounterMaintainer for PgEngagementUnit {
    #[instrument(skip(self))]
    async fn adjust(&mut self, target: TargetRef, delta: CounterDelta) -> RepoResult<Counters> {
        let table = target_table(target.kind);
        // Increment in place; the guard refuses to take either total below zero.
        let sql = format!(
            "UPDATE {table} SET likes = likes + $2, dislikes = dislikes + $3 \
             WHERE id = $1 AND likes + $2 >= 0 AND dislikes + $3 >= 0 \
             RETURNING likes, dislikes"
        );

        let updated = sqlx::query_as::<_, CountersModel>(&sql)
            .bind(target.id.into_inner())
            .bind(delta.likes)
            .bind(delta.dislikes)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if let Some(counters) = updated {
            return Ok(counters.into());
        }

        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"
        ))
        .bind(target.id.into_inner())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if exists {
            Err(DomainError::CounterUnderflow(target))
        } else {
            Err(target_not_found(target))
        }
    }

    #[instrument(skip(self))]
    async fn overwrite(&mut self, target: TargetRef, counters: Counters) -> RepoResult<()> {
        let sql = format!(
            "UPDATE {} SET likes = $2, dislikes = $3 WHERE id = $1",
            target_table(target.kind)
        );

        let result = sqlx::query(&sql)
            .bind(target.id.into_inner())
            .bind(counters.likes)
            .bind(counters.dislikes)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(target_not_found(target));
        }

        Ok(())
    }
}

#[async_trait]
impl EngagementUnit for PgEngagementUnit {
    #[instrument(skip(self))]
    async fn remove_target(&mut self, target: TargetRef) -> RepoResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", target_table(target.kind));

        let result = sqlx::query(&sql)
            .bind(target.id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(target_not_found(target));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)?;
        debug!("Engagement unit committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        fn assert_send<T: Send>() {}
        assert_send_sync::<PgEngagementStore>();
        assert_send_sync::<PgTargetResolver>();
        assert_send::<PgEngagementUnit>();
    }
}
