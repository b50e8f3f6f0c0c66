//! Video service
//!
//! Upload metadata, browsing, owner edits and deletion. Deleting a video
//! removes its comments and every reaction attached to either.

use chrono::Utc;
use tracing::{info, instrument};

use tube_core::entities::Video;
use tube_core::events::{TargetRemovedEvent, VideoEvent};
use tube_core::{DomainError, DomainEvent, PageQuery, Snowflake, TargetRef};

use crate::dto::{paginate, CreateVideoRequest, PaginatedResponse, UpdateVideoRequest, VideoResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct VideoService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VideoService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_video(
        &self,
        owner_id: Snowflake,
        request: CreateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        let mut video = Video::new(self.ctx.generate_id(), owner_id, request.title, request.video_url);
        video.description = request.description;
        video.thumbnail_url = request.thumbnail_url;

        self.ctx.video_repo().create(&video).await?;

        info!(video_id = %video.id, owner_id = %owner_id, "Video created");

        self.publish_video_event(&video, false).await;
        Ok(VideoResponse::from(&video))
    }

    /// Fetch a video and count the view.
    #[instrument(skip(self))]
    pub async fn get_video(&self, video_id: Snowflake) -> ServiceResult<VideoResponse> {
        let mut video = self.get_video_entity(video_id).await?;
        video.views = self.ctx.video_repo().increment_views(video_id).await?;
        Ok(VideoResponse::from(&video))
    }

    #[instrument(skip(self))]
    pub async fn list_videos(&self, query: PageQuery) -> ServiceResult<PaginatedResponse<VideoResponse>> {
        let videos = self.ctx.video_repo().list(query).await?;
        Ok(paginate(videos, query, |v: &Video| v.id))
    }

    #[instrument(skip(self))]
    pub async fn list_user_videos(
        &self,
        owner_id: Snowflake,
        query: PageQuery,
    ) -> ServiceResult<PaginatedResponse<VideoResponse>> {
        if self.ctx.user_repo().find_by_id(owner_id).await?.is_none() {
            return Err(DomainError::UserNotFound(owner_id).into());
        }

        let videos = self.ctx.video_repo().find_by_owner(owner_id, query).await?;
        Ok(paginate(videos, query, |v: &Video| v.id))
    }

    #[instrument(skip(self, request))]
    pub async fn update_video(
        &self,
        video_id: Snowflake,
        user_id: Snowflake,
        request: UpdateVideoRequest,
    ) -> ServiceResult<VideoResponse> {
        let mut video = self.get_owned_video(video_id, user_id).await?;

        if let Some(title) = request.title {
            video.title = title;
        }
        if let Some(description) = request.description {
            video.description = Some(description);
        }
        if let Some(thumbnail_url) = request.thumbnail_url {
            video.thumbnail_url = Some(thumbnail_url);
        }
        video.updated_at = Utc::now();

        self.ctx.video_repo().update(&video).await?;

        info!(video_id = %video_id, "Video updated");

        self.publish_video_event(&video, true).await;
        Ok(VideoResponse::from(&video))
    }

    /// Delete a video together with its comments and all their reactions.
    #[instrument(skip(self))]
    pub async fn delete_video(&self, video_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let video = self.get_owned_video(video_id, user_id).await?;

        let comments: Vec<TargetRef> = self
            .ctx
            .comment_repo()
            .ids_by_video(video.id)
            .await?
            .into_iter()
            .map(TargetRef::comment)
            .collect();

        let target = TargetRef::video(video.id);
        let removed = self.ctx.engine().remove_target(target, &comments).await?;

        info!(
            video_id = %video_id,
            comments = comments.len(),
            reactions_removed = removed,
            "Video deleted"
        );

        let event = DomainEvent::TargetRemoved(TargetRemovedEvent {
            target,
            video_id: video.id,
            reactions_removed: removed,
            timestamp: Utc::now(),
        });
        self.ctx.publisher().publish_domain(&event).await.ok();

        Ok(())
    }

    pub(crate) async fn get_video_entity(&self, video_id: Snowflake) -> ServiceResult<Video> {
        self.ctx
            .video_repo()
            .find_by_id(video_id)
            .await?
            .ok_or_else(|| DomainError::VideoNotFound(video_id).into())
    }

    async fn get_owned_video(&self, video_id: Snowflake, user_id: Snowflake) -> ServiceResult<Video> {
        let video = self.get_video_entity(video_id).await?;
        if !video.is_owned_by(user_id) {
            return Err(DomainError::NotVideoOwner.into());
        }
        Ok(video)
    }

    async fn publish_video_event(&self, video: &Video, updated: bool) {
        let payload = VideoEvent {
            video_id: video.id,
            owner_id: video.owner_id,
            timestamp: Utc::now(),
        };
        let event = if updated {
            DomainEvent::VideoUpdated(payload)
        } else {
            DomainEvent::VideoCreated(payload)
        };
        self.ctx.publisher().publish_domain(&event).await.ok();
    }
}
