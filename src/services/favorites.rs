use std::sync::Arc;

use crate::{
    db::FavoriteVideoRepository,
    error::{AppError, AppResult},
    models::{FavoriteVideo, FavoriteVideoUpdate, NewFavoriteVideo, VideoSummary},
    services::providers::VideoProvider,
};

/// Manages a user's saved videos
///
/// Enforces one favorite per (user, video) and always stores the canonical
/// metadata fetched from the video directory at the time of saving.
pub struct FavoritesService {
    favorites: Arc<dyn FavoriteVideoRepository>,
    provider: Arc<dyn VideoProvider>,
}

impl FavoritesService {
    pub fn new(
        favorites: Arc<dyn FavoriteVideoRepository>,
        provider: Arc<dyn VideoProvider>,
    ) -> Self {
        Self {
            favorites,
            provider,
        }
    }

    pub async fn add_favorite(
        &self,
        user_id: i64,
        video_id: &str,
        notes: Option<String>,
        tags: Option<Vec<String>>,
    ) -> AppResult<FavoriteVideo> {
        if self
            .favorites
            .get_by_video_id(user_id, video_id)
            .await?
            .is_some()
        {
            tracing::debug!(user_id, video_id = %video_id, "Favorite already exists");
            return Err(AppError::DuplicateFavorite);
        }

        let details = self
            .provider
            .get_details(video_id)
            .await?
            .ok_or_else(|| AppError::VideoNotFound(video_id.to_string()))?;

        // A concurrent add can still slip past the check above; the store's
        // uniqueness rule turns that into DuplicateFavorite as well.
        let favorite = self
            .favorites
            .create(NewFavoriteVideo::from_details(user_id, details, notes, tags))
            .await?;

        tracing::info!(
            user_id,
            favorite_id = favorite.id,
            video_id = %favorite.video_id,
            "Favorite added"
        );

        Ok(favorite)
    }

    pub async fn list_favorites(&self, user_id: i64) -> AppResult<Vec<FavoriteVideo>> {
        self.favorites.get_by_user(user_id).await
    }

    /// Overwrites only the fields present in `update`
    pub async fn update_favorite(
        &self,
        id: i64,
        update: FavoriteVideoUpdate,
    ) -> AppResult<FavoriteVideo> {
        let mut favorite = self
            .favorites
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite {} not found", id)))?;

        update.apply(&mut favorite);
        self.favorites.update(&favorite).await
    }

    /// Returns whether a row was removed; removing twice is not an error
    pub async fn remove_favorite(&self, id: i64) -> AppResult<bool> {
        self.favorites.delete(id).await
    }

    pub async fn remove_favorite_by_video(&self, user_id: i64, video_id: &str) -> AppResult<bool> {
        match self.favorites.get_by_video_id(user_id, video_id).await? {
            Some(favorite) => self.favorites.delete(favorite.id).await,
            None => Ok(false),
        }
    }

    pub async fn search_videos(&self, query: &str, max_results: u32) -> AppResult<Vec<VideoSummary>> {
        self.provider.search(query, max_results).await
    }
}
