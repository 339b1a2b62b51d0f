use super::{map_unique_violation, PgStore};
use crate::{
    db::FavoriteVideoRepository,
    error::{AppError, AppResult},
    models::{FavoriteVideo, NewFavoriteVideo},
};

const FAVORITE_COLUMNS: &str = "id, user_id, video_id, title, description, url, thumbnail, \
     channel, duration, published_at, notes, tags, added_at";

#[async_trait::async_trait]
impl FavoriteVideoRepository for PgStore {
    async fn create(&self, favorite: NewFavoriteVideo) -> AppResult<FavoriteVideo> {
        let sql = format!(
            r#"
            INSERT INTO favorite_videos
                (user_id, video_id, title, description, url, thumbnail, channel, duration,
                 published_at, notes, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            FAVORITE_COLUMNS
        );

        // The (user_id, video_id) constraint closes the gap between the
        // service's existence check and this insert.
        sqlx::query_as::<_, FavoriteVideo>(&sql)
            .bind(favorite.user_id)
            .bind(&favorite.video_id)
            .bind(&favorite.title)
            .bind(&favorite.description)
            .bind(&favorite.url)
            .bind(&favorite.thumbnail)
            .bind(&favorite.channel)
            .bind(&favorite.duration)
            .bind(favorite.published_at)
            .bind(&favorite.notes)
            .bind(&favorite.tags)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, || AppError::DuplicateFavorite))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<FavoriteVideo>> {
        let sql = format!("SELECT {} FROM favorite_videos WHERE id = $1", FAVORITE_COLUMNS);
        let favorite = sqlx::query_as::<_, FavoriteVideo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(favorite)
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<FavoriteVideo>> {
        let sql = format!(
            "SELECT {} FROM favorite_videos WHERE user_id = $1 ORDER BY added_at DESC, id DESC",
            FAVORITE_COLUMNS
        );
        let favorites = sqlx::query_as::<_, FavoriteVideo>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(favorites)
    }

    async fn get_by_video_id(
        &self,
        user_id: i64,
        video_id: &str,
    ) -> AppResult<Option<FavoriteVideo>> {
        let sql = format!(
            "SELECT {} FROM favorite_videos WHERE user_id = $1 AND video_id = $2",
            FAVORITE_COLUMNS
        );
        let favorite = sqlx::query_as::<_, FavoriteVideo>(&sql)
            .bind(user_id)
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(favorite)
    }

    async fn update(&self, favorite: &FavoriteVideo) -> AppResult<FavoriteVideo> {
        let sql = format!(
            r#"
            UPDATE favorite_videos
            SET title = $1, description = $2, url = $3, thumbnail = $4, channel = $5,
                duration = $6, published_at = $7, notes = $8, tags = $9
            WHERE id = $10
            RETURNING {}
            "#,
            FAVORITE_COLUMNS
        );
        sqlx::query_as::<_, FavoriteVideo>(&sql)
            .bind(&favorite.title)
            .bind(&favorite.description)
            .bind(&favorite.url)
            .bind(&favorite.thumbnail)
            .bind(&favorite.channel)
            .bind(&favorite.duration)
            .bind(favorite.published_at)
            .bind(&favorite.notes)
            .bind(&favorite.tags)
            .bind(favorite.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite {} not found", favorite.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorite_videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
