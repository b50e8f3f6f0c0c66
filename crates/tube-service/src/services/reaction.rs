//! Reaction service
//!
//! Like/dislike requests on videos and comments. The state machine lives in
//! [`ReactionEngine`](crate::engine::ReactionEngine); this layer checks the
//! actor, shapes the response and announces the new counters.

use chrono::Utc;
use tracing::{debug, instrument};

use tube_core::entities::Target;
use tube_core::events::ReactionChangedEvent;
use tube_core::{DomainEvent, ReactionKind, Snowflake, TargetRef};

use crate::dto::{LikeStatusResponse, ReactionResponse};
use crate::engine::ReactionOutcome;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::user::UserService;

pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply a like or dislike from `actor` to `target`.
    #[instrument(skip(self), fields(target = %target))]
    pub async fn react(
        &self,
        actor: Snowflake,
        target: TargetRef,
        kind: ReactionKind,
    ) -> ServiceResult<ReactionResponse> {
        UserService::new(self.ctx).require_live(actor).await?;

        let outcome = self.ctx.engine().react(actor, target, kind).await?;
        debug!(
            transition = ?outcome.transition,
            likes = outcome.counters.likes,
            dislikes = outcome.counters.dislikes,
            "Reaction applied"
        );

        self.publish_reaction_changed(actor, &outcome).await;
        Ok(ReactionResponse::from(&outcome))
    }

    #[instrument(skip(self), fields(target = %target))]
    pub async fn like_status(&self, actor: Snowflake, target: TargetRef) -> ServiceResult<LikeStatusResponse> {
        UserService::new(self.ctx).require_live(actor).await?;

        let status = self.ctx.engine().status(actor, target).await?;
        Ok(status.into())
    }

    async fn publish_reaction_changed(&self, actor: Snowflake, outcome: &ReactionOutcome) {
        let video_id = match &outcome.target {
            Target::Video(video) => video.id,
            Target::Comment(comment) => comment.video_id,
        };

        let event = DomainEvent::ReactionChanged(ReactionChangedEvent {
            target: outcome.target.target_ref(),
            video_id,
            actor_id: actor,
            status: outcome.status,
            counters: outcome.counters,
            timestamp: Utc::now(),
        });
        self.ctx.publisher().publish_domain(&event).await.ok();
    }
}
