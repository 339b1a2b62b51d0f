use std::sync::Arc;

pub mod memory;
pub mod postgres;
pub mod repositories;

pub use memory::InMemoryStore;
pub use postgres::{create_pool, PgStore};
pub use repositories::{
    FavoriteVideoRepository, TrendAnalysisRepository, UserPreferencesRepository, UserRepository,
    ViewHistoryRepository,
};

/// One handle per entity repository, all backed by the same store
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub favorites: Arc<dyn FavoriteVideoRepository>,
    pub history: Arc<dyn ViewHistoryRepository>,
    pub preferences: Arc<dyn UserPreferencesRepository>,
    pub analyses: Arc<dyn TrendAnalysisRepository>,
}

impl Repositories {
    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + FavoriteVideoRepository
            + ViewHistoryRepository
            + UserPreferencesRepository
            + TrendAnalysisRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            favorites: store.clone(),
            history: store.clone(),
            preferences: store.clone(),
            analyses: store,
        }
    }

    /// Repositories backed by PostgreSQL
    pub fn postgres(store: PgStore) -> Self {
        Self::from_store(Arc::new(store))
    }

    /// Repositories backed by process memory
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}
