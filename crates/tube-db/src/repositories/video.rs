//! PostgreSQL implementation of VideoRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tube_core::entities::Video;
use tube_core::traits::{PageQuery, RepoResult, VideoRepository};
use tube_core::value_objects::Snowflake;

use crate::models::VideoModel;

use super::error::{map_db_error, video_not_found};

pub(crate) const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_url, \
     thumbnail_url, views, likes, dislikes, created_at, updated_at";

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Page through videos, optionally restricted to one owner.
    async fn page(&self, owner: Option<Snowflake>, query: PageQuery) -> RepoResult<Vec<Video>> {
        let limit = query.fetch_limit();
        let owner = owner.map(Snowflake::into_inner);

        let (cursor_clause, order) = match (query.before, query.after) {
            (Some(_), None) => ("AND id < $2", "DESC"),
            (None, Some(_)) => ("AND id > $2", "ASC"),
            // With neither or both cursors, return the newest page.
            _ => ("AND $2::BIGINT IS NULL", "DESC"),
        };
        let cursor = match (query.before, query.after) {
            (Some(c), None) | (None, Some(c)) => Some(c.into_inner()),
            _ => None,
        };

        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos \
             WHERE ($1::BIGINT IS NULL OR owner_id = $1) {cursor_clause} \
             ORDER BY id {order} LIMIT $3"
        );

        let results = sqlx::query_as::<_, VideoModel>(&sql)
            .bind(owner)
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Video::from).collect())
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Video>> {
        let result = sqlx::query_as::<_, VideoModel>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Video::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: PageQuery) -> RepoResult<Vec<Video>> {
        self.page(None, query).await
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: Snowflake, query: PageQuery) -> RepoResult<Vec<Video>> {
        self.page(Some(owner_id), query).await
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn create(&self, video: &Video) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO videos (id, owner_id, title, description, video_url, thumbnail_url,
                                views, likes, dislikes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, 0, 0, $7, $8)
            ",
        )
        .bind(video.id.into_inner())
        .bind(video.owner_id.into_inner())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, video), fields(video_id = %video.id))]
    async fn update(&self, video: &Video) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE videos
            SET title = $2, description = $3, thumbnail_url = $4, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(video.id.into_inner())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(video_not_found(video.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_views(&self, id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| video_not_found(id))
    }
}
