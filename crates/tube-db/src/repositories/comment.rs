//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tube_core::entities::Comment;
use tube_core::traits::{CommentRepository, PageQuery, RepoResult};
use tube_core::value_objects::Snowflake;

use crate::models::CommentModel;

use super::error::{comment_not_found, map_db_error, map_foreign_key_violation, video_not_found};

pub(crate) const COMMENT_COLUMNS: &str =
    "id, video_id, author_id, content, likes, dislikes, created_at, updated_at";

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find_by_video(&self, video_id: Snowflake, query: PageQuery) -> RepoResult<Vec<Comment>> {
        let limit = query.fetch_limit();

        let results = match (query.before, query.after) {
            (Some(before), None) => {
                sqlx::query_as::<_, CommentModel>(&format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments \
                     WHERE video_id = $1 AND id < $2 ORDER BY id DESC LIMIT $3"
                ))
                .bind(video_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(after)) => {
                sqlx::query_as::<_, CommentModel>(&format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments \
                     WHERE video_id = $1 AND id > $2 ORDER BY id ASC LIMIT $3"
                ))
                .bind(video_id.into_inner())
                .bind(after.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            _ => {
                sqlx::query_as::<_, CommentModel>(&format!(
                    "SELECT {COMMENT_COLUMNS} FROM comments \
                     WHERE video_id = $1 ORDER BY id DESC LIMIT $2"
                ))
                .bind(video_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn ids_by_video(&self, video_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM comments WHERE video_id = $1")
            .bind(video_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comments (id, video_id, author_id, content, likes, dislikes,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, 0, $5, $6)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.video_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || video_not_found(comment.video_id)))?;

        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(comment.id.into_inner())
        .bind(&comment.content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(comment.id));
        }

        Ok(())
    }
}
