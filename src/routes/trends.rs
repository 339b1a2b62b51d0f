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
    models::{Category, TrendAnalysis, VideoDetails},
    routes::{deleted, AppState},
    services::{trends::criteria_from_value, TrendQuery},
};

pub const DEFAULT_TRENDING_RESULTS: u32 = 20;

fn default_max_results() -> u32 {
    DEFAULT_TRENDING_RESULTS
}

fn default_category() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    region: Option<String>,
    category_id: Option<String>,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

#[derive(Debug, Deserialize)]
pub struct RegionQuery {
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnalysisRequest {
    #[serde(default = "default_category")]
    pub category: String,
    pub region: Option<String>,
    pub category_id: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// Live trending list, not persisted
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQuery>,
) -> AppResult<Json<Vec<VideoDetails>>> {
    let region = params.region.unwrap_or_else(|| state.default_region.clone());
    let videos = state
        .trends
        .get_trending(&region, params.category_id, params.max_results)
        .await?;
    Ok(Json(videos))
}

pub async fn categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegionQuery>,
) -> AppResult<Json<Vec<Category>>> {
    let region = params.region.unwrap_or_else(|| state.default_region.clone());
    Ok(Json(state.trends.get_categories(&region).await?))
}

/// Handler for trend snapshot creation
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
    Json(request): Json<CreateAnalysisRequest>,
) -> AppResult<(StatusCode, Json<TrendAnalysis>)> {
    let query = TrendQuery {
        category: request.category,
        region: request
            .region
            .unwrap_or_else(|| state.default_region.clone()),
        category_id: request.category_id,
        max_results: request.max_results,
    };

    tracing::info!(
        request_id = %request_id,
        user_id,
        region = %query.region,
        max_results = query.max_results,
        "Creating trend analysis"
    );

    let analysis = state.trends.create_trend_analysis(user_id, query).await?;
    Ok((StatusCode::CREATED, Json(analysis)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<TrendAnalysis>>> {
    Ok(Json(state.trends.list_user_analyses(user_id).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<TrendAnalysis>> {
    Ok(Json(state.trends.get_analysis(id).await?))
}

pub async fn update_criteria(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> AppResult<Json<TrendAnalysis>> {
    let criteria = criteria_from_value(body)?;
    Ok(Json(state.trends.update_analysis_criteria(id, criteria).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    Ok(deleted(state.trends.delete_analysis(id).await?))
}
