use super::PgStore;
use crate::{
    db::ViewHistoryRepository,
    error::AppResult,
    models::{NewViewHistory, ViewHistory},
};

#[async_trait::async_trait]
impl ViewHistoryRepository for PgStore {
    async fn create(&self, view: NewViewHistory) -> AppResult<ViewHistory> {
        let row = sqlx::query_as::<_, ViewHistory>(
            r#"
            INSERT INTO view_history
                (user_id, video_id, title, viewed_at, view_duration_seconds, completed)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, video_id, title, viewed_at, view_duration_seconds, completed
            "#,
        )
        .bind(view.user_id)
        .bind(&view.video_id)
        .bind(&view.title)
        .bind(view.viewed_at)
        .bind(view.view_duration_seconds)
        .bind(view.completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<ViewHistory>> {
        let rows = sqlx::query_as::<_, ViewHistory>(
            r#"
            SELECT id, user_id, video_id, title, viewed_at, view_duration_seconds, completed
            FROM view_history
            WHERE user_id = $1
            ORDER BY viewed_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM view_history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
