use super::{map_unique_violation, PgStore};
use crate::{
    db::UserPreferencesRepository,
    error::{AppError, AppResult},
    models::{NewUserPreferences, UserPreferences},
};

const PREFERENCES_COLUMNS: &str =
    "id, user_id, genres, topics, languages, min_duration, max_duration, updated_at";

#[async_trait::async_trait]
impl UserPreferencesRepository for PgStore {
    async fn create(&self, preferences: NewUserPreferences) -> AppResult<UserPreferences> {
        let sql = format!(
            r#"
            INSERT INTO user_preferences
                (user_id, genres, topics, languages, min_duration, max_duration)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PREFERENCES_COLUMNS
        );
        sqlx::query_as::<_, UserPreferences>(&sql)
            .bind(preferences.user_id)
            .bind(&preferences.genres)
            .bind(&preferences.topics)
            .bind(&preferences.languages)
            .bind(preferences.min_duration)
            .bind(preferences.max_duration)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    AppError::Conflict(format!(
                        "Preferences for user {} already exist",
                        preferences.user_id
                    ))
                })
            })
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Option<UserPreferences>> {
        let sql = format!(
            "SELECT {} FROM user_preferences WHERE user_id = $1",
            PREFERENCES_COLUMNS
        );
        let preferences = sqlx::query_as::<_, UserPreferences>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(preferences)
    }

    async fn update(&self, preferences: &UserPreferences) -> AppResult<UserPreferences> {
        let sql = format!(
            r#"
            UPDATE user_preferences
            SET genres = $1, topics = $2, languages = $3, min_duration = $4,
                max_duration = $5, updated_at = $6
            WHERE id = $7
            RETURNING {}
            "#,
            PREFERENCES_COLUMNS
        );
        sqlx::query_as::<_, UserPreferences>(&sql)
            .bind(&preferences.genres)
            .bind(&preferences.topics)
            .bind(&preferences.languages)
            .bind(preferences.min_duration)
            .bind(preferences.max_duration)
            .bind(preferences.updated_at)
            .bind(preferences.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Preferences {} not found", preferences.id)))
    }
}
