use tube_core::entities::Video;
use tube_core::value_objects::Snowflake;

use crate::models::VideoModel;

impl From<VideoModel> for Video {
    fn from(model: VideoModel) -> Self {
        Video {
            id: Snowflake::new(model.id),
            owner_id: Snowflake::new(model.owner_id),
            title: model.title,
            description: model.description,
            video_url: model.video_url,
            thumbnail_url: model.thumbnail_url,
            views: model.views,
            likes: model.likes,
            dislikes: model.dislikes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
