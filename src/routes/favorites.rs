use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{FavoriteVideo, FavoriteVideoUpdate},
    routes::{deleted, AppState},
};

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub video_id: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<FavoriteVideo>)> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        video_id = %request.video_id,
        "Adding favorite"
    );

    let favorite = state
        .favorites
        .add_favorite(user_id, &request.video_id, request.notes, request.tags)
        .await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<FavoriteVideo>>> {
    Ok(Json(state.favorites.list_favorites(user_id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<FavoriteVideoUpdate>,
) -> AppResult<Json<FavoriteVideo>> {
    Ok(Json(state.favorites.update_favorite(id, update).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    Ok(deleted(state.favorites.remove_favorite(id).await?))
}

pub async fn remove_by_video(
    State(state): State<Arc<AppState>>,
    Path((user_id, video_id)): Path<(i64, String)>,
) -> AppResult<Json<Value>> {
    let removed = state
        .favorites
        .remove_favorite_by_video(user_id, &video_id)
        .await?;
    Ok(deleted(removed))
}
