use tube_core::entities::Comment;
use tube_core::value_objects::Snowflake;

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            video_id: Snowflake::new(model.video_id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            likes: model.likes,
            dislikes: model.dislikes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
