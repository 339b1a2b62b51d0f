//! Storage ports. Services depend on these traits only; each backend in
//! `db::postgres` and `db::memory` implements all of them.

use crate::{
    error::AppResult,
    models::{
        FavoriteVideo, NewFavoriteVideo, NewTrendAnalysis, NewUser, NewUserPreferences,
        NewViewHistory, TrendAnalysis, User, UserPreferences, ViewHistory,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the e-mail is taken
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Case-insensitive substring match on the name
    async fn search_by_name(&self, name: &str) -> AppResult<Vec<User>>;

    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoriteVideoRepository: Send + Sync {
    /// Fails with `DuplicateFavorite` when (user_id, video_id) already exists
    async fn create(&self, favorite: NewFavoriteVideo) -> AppResult<FavoriteVideo>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<FavoriteVideo>>;

    /// Newest first
    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<FavoriteVideo>>;

    async fn get_by_video_id(
        &self,
        user_id: i64,
        video_id: &str,
    ) -> AppResult<Option<FavoriteVideo>>;

    async fn update(&self, favorite: &FavoriteVideo) -> AppResult<FavoriteVideo>;

    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ViewHistoryRepository: Send + Sync {
    async fn create(&self, view: NewViewHistory) -> AppResult<ViewHistory>;

    /// Newest first
    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<ViewHistory>>;

    async fn delete(&self, id: i64) -> AppResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserPreferencesRepository: Send + Sync {
    async fn create(&self, preferences: NewUserPreferences) -> AppResult<UserPreferences>;

    async fn get_by_user(&self, user_id: i64) -> AppResult<Option<UserPreferences>>;

    async fn update(&self, preferences: &UserPreferences) -> AppResult<UserPreferences>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrendAnalysisRepository: Send + Sync {
    async fn create(&self, analysis: NewTrendAnalysis) -> AppResult<TrendAnalysis>;

    async fn get_by_id(&self, id: i64) -> AppResult<Option<TrendAnalysis>>;

    /// Newest first
    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<TrendAnalysis>>;

    async fn update(&self, analysis: &TrendAnalysis) -> AppResult<TrendAnalysis>;

    async fn delete(&self, id: i64) -> AppResult<bool>;
}
