use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    FavoriteVideoRepository, TrendAnalysisRepository, UserPreferencesRepository, UserRepository,
    ViewHistoryRepository,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        FavoriteVideo, NewFavoriteVideo, NewTrendAnalysis, NewUser, NewUserPreferences,
        NewViewHistory, TrendAnalysis, User, UserPreferences, ViewHistory,
    },
};

/// Process-local store with the same uniqueness rules as the SQL schema
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    favorites: BTreeMap<i64, FavoriteVideo>,
    history: BTreeMap<i64, ViewHistory>,
    preferences: BTreeMap<i64, UserPreferences>,
    analyses: BTreeMap<i64, TrendAnalysis>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.inner.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        let id = tables.next_id();
        let user = User {
            id,
            name: user.name,
            email: user.email,
            created_at: Utc::now(),
            active: true,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn search_by_name(&self, name: &str) -> AppResult<Vec<User>> {
        let needle = name.to_lowercase();
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.inner.write().await;
        let removed = tables.users.remove(&id).is_some();
        if removed {
            tables.favorites.retain(|_, f| f.user_id != id);
            tables.history.retain(|_, h| h.user_id != id);
            tables.preferences.retain(|_, p| p.user_id != id);
            tables.analyses.retain(|_, a| a.user_id != id);
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl FavoriteVideoRepository for InMemoryStore {
    async fn create(&self, favorite: NewFavoriteVideo) -> AppResult<FavoriteVideo> {
        let mut tables = self.inner.write().await;
        let exists = tables
            .favorites
            .values()
            .any(|f| f.user_id == favorite.user_id && f.video_id == favorite.video_id);
        if exists {
            return Err(AppError::DuplicateFavorite);
        }

        let id = tables.next_id();
        let favorite = favorite.into_favorite(id, Utc::now());
        tables.favorites.insert(id, favorite.clone());
        Ok(favorite)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<FavoriteVideo>> {
        Ok(self.inner.read().await.favorites.get(&id).cloned())
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<FavoriteVideo>> {
        let tables = self.inner.read().await;
        let mut favorites: Vec<FavoriteVideo> = tables
            .favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
        Ok(favorites)
    }

    async fn get_by_video_id(
        &self,
        user_id: i64,
        video_id: &str,
    ) -> AppResult<Option<FavoriteVideo>> {
        let tables = self.inner.read().await;
        Ok(tables
            .favorites
            .values()
            .find(|f| f.user_id == user_id && f.video_id == video_id)
            .cloned())
    }

    async fn update(&self, favorite: &FavoriteVideo) -> AppResult<FavoriteVideo> {
        let mut tables = self.inner.write().await;
        match tables.favorites.get_mut(&favorite.id) {
            Some(stored) => {
                *stored = favorite.clone();
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound(format!(
                "Favorite {} not found",
                favorite.id
            ))),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().await.favorites.remove(&id).is_some())
    }
}

#[async_trait::async_trait]
impl ViewHistoryRepository for InMemoryStore {
    async fn create(&self, view: NewViewHistory) -> AppResult<ViewHistory> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id();
        let view = view.into_view(id);
        tables.history.insert(id, view.clone());
        Ok(view)
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<ViewHistory>> {
        let tables = self.inner.read().await;
        let mut views: Vec<ViewHistory> = tables
            .history
            .values()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        views.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at).then(b.id.cmp(&a.id)));
        Ok(views)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().await.history.remove(&id).is_some())
    }
}

#[async_trait::async_trait]
impl UserPreferencesRepository for InMemoryStore {
    async fn create(&self, preferences: NewUserPreferences) -> AppResult<UserPreferences> {
        let mut tables = self.inner.write().await;
        if tables
            .preferences
            .values()
            .any(|p| p.user_id == preferences.user_id)
        {
            return Err(AppError::Conflict(format!(
                "Preferences for user {} already exist",
                preferences.user_id
            )));
        }

        let id = tables.next_id();
        let preferences = preferences.into_preferences(id, Utc::now());
        tables.preferences.insert(id, preferences.clone());
        Ok(preferences)
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Option<UserPreferences>> {
        let tables = self.inner.read().await;
        Ok(tables
            .preferences
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn update(&self, preferences: &UserPreferences) -> AppResult<UserPreferences> {
        let mut tables = self.inner.write().await;
        match tables.preferences.get_mut(&preferences.id) {
            Some(stored) => {
                *stored = preferences.clone();
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound(format!(
                "Preferences {} not found",
                preferences.id
            ))),
        }
    }
}

#[async_trait::async_trait]
impl TrendAnalysisRepository for InMemoryStore {
    async fn create(&self, analysis: NewTrendAnalysis) -> AppResult<TrendAnalysis> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id();
        let analysis = analysis.into_analysis(id);
        tables.analyses.insert(id, analysis.clone());
        Ok(analysis)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<TrendAnalysis>> {
        Ok(self.inner.read().await.analyses.get(&id).cloned())
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<TrendAnalysis>> {
        let tables = self.inner.read().await;
        let mut analyses: Vec<TrendAnalysis> = tables
            .analyses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        analyses.sort_by(|a, b| b.analyzed_at.cmp(&a.analyzed_at).then(b.id.cmp(&a.id)));
        Ok(analyses)
    }

    async fn update(&self, analysis: &TrendAnalysis) -> AppResult<TrendAnalysis> {
        let mut tables = self.inner.write().await;
        match tables.analyses.get_mut(&analysis.id) {
            Some(stored) => {
                *stored = analysis.clone();
                Ok(stored.clone())
            }
            None => Err(AppError::NotFound(format!(
                "Analysis {} not found",
                analysis.id
            ))),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().await.analyses.remove(&id).is_some())
    }
}
