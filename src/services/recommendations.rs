use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    db::{UserPreferencesRepository, ViewHistoryRepository},
    error::{AppError, AppResult},
    models::{NewViewHistory, PreferencesUpdate, UserPreferences, VideoSummary, ViewHistory},
    services::providers::VideoProvider,
};

const MAX_QUERIES: usize = 5;
const SEARCHED_QUERIES: usize = 3;
const MAX_TOPIC_QUERIES: usize = 3;
const MAX_GENRE_QUERIES: usize = 2;
const MAX_HISTORY_QUERIES: usize = 2;
const MAX_KEYWORDS: usize = 5;
const RECENT_HISTORY_DAYS: i64 = 7;
const FALLBACK_QUERIES: [&str; 3] = ["music", "technology", "gaming"];
const STOP_WORDS: [&str; 14] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Most frequent title words, ignoring stop words and words of two characters or fewer
///
/// Words are lowercased and split on whitespace. Equal counts keep the order in
/// which the words were first seen.
pub fn extract_keywords<S: AsRef<str>>(titles: &[S]) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for title in titles {
        let lowered = title.as_ref().to_lowercase();
        for word in lowered.split_whitespace() {
            if word.chars().count() <= 2 || STOP_WORDS.contains(&word) {
                continue;
            }
            match index.get(word) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(word.to_string(), order.len());
                    order.push((word.to_string(), 1));
                }
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

/// Search queries for a user, in priority order
///
/// Up to 3 topics, up to 2 genres, up to 2 keywords from titles watched in the
/// last week, then fallback terms until there are 3. Never more than 5.
pub fn generate_queries(
    preferences: &UserPreferences,
    history: &[ViewHistory],
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    queries.extend(preferences.topics.iter().take(MAX_TOPIC_QUERIES).cloned());
    queries.extend(preferences.genres.iter().take(MAX_GENRE_QUERIES).cloned());

    let week_ago = now - TimeDelta::days(RECENT_HISTORY_DAYS);
    let recent_titles: Vec<&str> = history
        .iter()
        .filter(|h| h.viewed_at >= week_ago)
        .map(|h| h.title.as_str())
        .collect();
    if !recent_titles.is_empty() {
        queries.extend(
            extract_keywords(&recent_titles)
                .into_iter()
                .take(MAX_HISTORY_QUERIES),
        );
    }

    for fallback in FALLBACK_QUERIES {
        if queries.len() >= SEARCHED_QUERIES {
            break;
        }
        queries.push(fallback.to_string());
    }

    queries.truncate(MAX_QUERIES);
    queries
}

/// Concatenation order is kept; a repeated video id keeps its first position
fn dedup_by_video_id(videos: Vec<VideoSummary>, max_results: usize) -> Vec<VideoSummary> {
    let mut seen = HashSet::new();
    videos
        .into_iter()
        .filter(|v| seen.insert(v.video_id.clone()))
        .take(max_results)
        .collect()
}

/// Recommendation engine plus the view-history and preference operations that feed it
pub struct RecommendationService {
    history: Arc<dyn ViewHistoryRepository>,
    preferences: Arc<dyn UserPreferencesRepository>,
    provider: Arc<dyn VideoProvider>,
    default_region: String,
}

impl RecommendationService {
    pub fn new(
        history: Arc<dyn ViewHistoryRepository>,
        preferences: Arc<dyn UserPreferencesRepository>,
        provider: Arc<dyn VideoProvider>,
        default_region: String,
    ) -> Self {
        Self {
            history,
            preferences,
            provider,
            default_region,
        }
    }

    /// Personalized videos for a user
    ///
    /// Users without stored preferences get the regional trending list. Otherwise
    /// the first three generated queries are searched one after another, each
    /// asking for `max_results / 3` videos. A failing search contributes nothing.
    pub async fn get_recommendations(
        &self,
        user_id: i64,
        max_results: u32,
    ) -> AppResult<Vec<VideoSummary>> {
        let Some(preferences) = self.preferences.get_by_user(user_id).await? else {
            tracing::debug!(user_id, "No preferences stored, using trending videos");
            let mut trending = self
                .provider
                .get_trending(&self.default_region, None, max_results)
                .await?;
            trending.truncate(max_results as usize);
            return Ok(trending.into_iter().map(VideoSummary::from).collect());
        };

        let history = self.history.get_by_user(user_id).await?;
        let queries = generate_queries(&preferences, &history, Utc::now());
        let per_query = max_results / SEARCHED_QUERIES as u32;

        let mut candidates = Vec::new();
        for query in queries.iter().take(SEARCHED_QUERIES) {
            match self.provider.search(query, per_query).await {
                Ok(videos) => candidates.extend(videos),
                Err(e) => {
                    tracing::warn!(
                        user_id,
                        query = %query,
                        error = %e,
                        "Recommendation query failed, skipping"
                    );
                }
            }
        }

        let recommendations = dedup_by_video_id(candidates, max_results as usize);
        tracing::info!(
            user_id,
            queries = ?queries,
            results = recommendations.len(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }

    /// Appends a view event; re-watching produces another row
    pub async fn register_view(
        &self,
        user_id: i64,
        video_id: String,
        title: String,
        view_duration_seconds: i32,
        completed: bool,
    ) -> AppResult<ViewHistory> {
        self.history
            .create(NewViewHistory {
                user_id,
                video_id,
                title,
                viewed_at: Utc::now(),
                view_duration_seconds,
                completed,
            })
            .await
    }

    /// Creates preferences on first use, otherwise merges the present fields
    pub async fn update_preferences(
        &self,
        user_id: i64,
        update: PreferencesUpdate,
    ) -> AppResult<UserPreferences> {
        if let Some(preferences) = self.preferences.get_by_user(user_id).await? {
            return self.merge_preferences(preferences, update).await;
        }

        tracing::info!(user_id, "Creating preferences");
        match self.preferences.create(update.clone().into_new(user_id)).await {
            // A concurrent first update created the row in between; merge into it
            Err(AppError::Conflict(_)) => {
                tracing::debug!(user_id, "Preferences created concurrently, merging");
                let preferences = self
                    .preferences
                    .get_by_user(user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!("Preferences for user {} vanished", user_id))
                    })?;
                self.merge_preferences(preferences, update).await
            }
            result => result,
        }
    }

    async fn merge_preferences(
        &self,
        mut preferences: UserPreferences,
        update: PreferencesUpdate,
    ) -> AppResult<UserPreferences> {
        update.apply(&mut preferences, Utc::now());
        self.preferences.update(&preferences).await
    }

    pub async fn get_preferences(&self, user_id: i64) -> AppResult<Option<UserPreferences>> {
        self.preferences.get_by_user(user_id).await
    }

    /// Views recorded within the last `days_back` days, newest first
    pub async fn get_view_history(&self, user_id: i64, days_back: i64) -> AppResult<Vec<ViewHistory>> {
        let window = TimeDelta::try_days(days_back)
            .ok_or_else(|| AppError::InvalidInput(format!("days_back out of range: {}", days_back)))?;
        // Windows reaching past the representable range are clamped
        let cutoff = Utc::now().checked_sub_signed(window).unwrap_or(if days_back > 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

        let history = self.history.get_by_user(user_id).await?;
        Ok(history.into_iter().filter(|h| h.viewed_at >= cutoff).collect())
    }

    pub async fn remove_from_history(&self, id: i64) -> AppResult<bool> {
        self.history.delete(id).await
    }
}
