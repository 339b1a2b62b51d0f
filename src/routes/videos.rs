use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppResult, middleware::RequestId, models::VideoSummary, routes::AppState};

pub const DEFAULT_SEARCH_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

fn default_max_results() -> u32 {
    DEFAULT_SEARCH_RESULTS
}

/// Handler for video search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<VideoSummary>>> {
    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        max_results = params.max_results,
        "Searching videos"
    );

    let videos = state
        .favorites
        .search_videos(&params.q, params.max_results)
        .await?;
    Ok(Json(videos))
}
