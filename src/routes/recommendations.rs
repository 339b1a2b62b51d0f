use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{PreferencesUpdate, UserPreferences, VideoSummary, ViewHistory},
    routes::{deleted, AppState},
};

pub const DEFAULT_RECOMMENDATIONS: u32 = 10;
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default = "default_recommendations")]
    max_results: u32,
}

fn default_recommendations() -> u32 {
    DEFAULT_RECOMMENDATIONS
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_days")]
    days_back: i64,
}

fn default_history_days() -> i64 {
    DEFAULT_HISTORY_DAYS
}

#[derive(Debug, Deserialize)]
pub struct RegisterViewRequest {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub view_duration_seconds: i32,
    #[serde(default)]
    pub completed: bool,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<VideoSummary>>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        max_results = params.max_results,
        "Generating recommendations"
    );

    let videos = state
        .recommendations
        .get_recommendations(user_id, params.max_results)
        .await?;
    Ok(Json(videos))
}

/// Responds with `null` when the user has no preferences yet
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Option<UserPreferences>>> {
    Ok(Json(state.recommendations.get_preferences(user_id).await?))
}

pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(update): Json<PreferencesUpdate>,
) -> AppResult<Json<UserPreferences>> {
    let preferences = state
        .recommendations
        .update_preferences(user_id, update)
        .await?;
    Ok(Json(preferences))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<Vec<ViewHistory>>> {
    let views = state
        .recommendations
        .get_view_history(user_id, params.days_back)
        .await?;
    Ok(Json(views))
}

pub async fn register_view(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(request): Json<RegisterViewRequest>,
) -> AppResult<(StatusCode, Json<ViewHistory>)> {
    let view = state
        .recommendations
        .register_view(
            user_id,
            request.video_id,
            request.title,
            request.view_duration_seconds,
            request.completed,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn remove_from_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    Ok(deleted(state.recommendations.remove_from_history(id).await?))
}
