//! Comment service
//!
//! Comments on videos. Authors edit their own comments; the author or the
//! video owner may delete one.

use chrono::Utc;
use tracing::{info, instrument};

use tube_core::entities::Comment;
use tube_core::events::{CommentEvent, TargetRemovedEvent};
use tube_core::{DomainError, DomainEvent, PageQuery, Snowflake, TargetRef};

use crate::dto::{
    paginate, CommentResponse, CreateCommentRequest, PaginatedResponse, UpdateCommentRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::video::VideoService;

pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        video_id: Snowflake,
        author_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let video = VideoService::new(self.ctx).get_video_entity(video_id).await?;

        let mut comment = Comment::new(self.ctx.generate_id(), video.id, author_id, String::new());
        comment.edit(request.content)?;
        comment.updated_at = comment.created_at;

        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, video_id = %video_id, "Comment created");

        self.publish_comment_event(&comment, false).await;
        Ok(CommentResponse::from(&comment))
    }

    #[instrument(skip(self))]
    pub async fn get_comment(&self, comment_id: Snowflake) -> ServiceResult<CommentResponse> {
        let comment = self.get_comment_entity(comment_id).await?;
        Ok(CommentResponse::from(&comment))
    }

    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        video_id: Snowflake,
        query: PageQuery,
    ) -> ServiceResult<PaginatedResponse<CommentResponse>> {
        VideoService::new(self.ctx).get_video_entity(video_id).await?;

        let comments = self.ctx.comment_repo().find_by_video(video_id, query).await?;
        Ok(paginate(comments, query, |c: &Comment| c.id))
    }

    #[instrument(skip(self, request))]
    pub async fn update_comment(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        request: UpdateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let mut comment = self.get_comment_entity(comment_id).await?;
        if !comment.is_author(user_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        comment.edit(request.content)?;
        self.ctx.comment_repo().update(&comment).await?;

        info!(comment_id = %comment_id, "Comment updated");

        self.publish_comment_event(&comment, true).await;
        Ok(CommentResponse::from(&comment))
    }

    /// Delete a comment and its reactions.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let comment = self.get_comment_entity(comment_id).await?;

        if !comment.is_author(user_id) {
            // The video owner moderates its comments.
            let video = self.ctx.video_repo().find_by_id(comment.video_id).await?;
            if !video.is_some_and(|v| v.is_owned_by(user_id)) {
                return Err(DomainError::NotCommentAuthor.into());
            }
        }

        let target = TargetRef::comment(comment.id);
        let removed = self.ctx.engine().remove_target(target, &[]).await?;

        info!(comment_id = %comment_id, reactions_removed = removed, "Comment deleted");

        let event = DomainEvent::TargetRemoved(TargetRemovedEvent {
            target,
            video_id: comment.video_id,
            reactions_removed: removed,
            timestamp: Utc::now(),
        });
        self.ctx.publisher().publish_domain(&event).await.ok();

        Ok(())
    }

    pub(crate) async fn get_comment_entity(&self, comment_id: Snowflake) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::CommentNotFound(comment_id).into())
    }

    async fn publish_comment_event(&self, comment: &Comment, updated: bool) {
        let payload = CommentEvent {
            comment_id: comment.id,
            video_id: comment.video_id,
            author_id: comment.author_id,
            timestamp: Utc::now(),
        };
        let event = if updated {
            DomainEvent::CommentUpdated(payload)
        } else {
            DomainEvent::CommentCreated(payload)
        };
        self.ctx.publisher().publish_domain(&event).await.ok();
    }
}
