use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Repositories,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::VideoProvider, FavoritesService, RecommendationService, TrendAnalysisService,
        UsersService,
    },
};

pub mod favorites;
pub mod recommendations;
pub mod trends;
pub mod users;
pub mod videos;

/// Shared state handed to every handler
pub struct AppState {
    pub users: UsersService,
    pub favorites: FavoritesService,
    pub trends: TrendAnalysisService,
    pub recommendations: RecommendationService,
    pub default_region: String,
}

impl AppState {
    /// Wires every service to the same store and video directory
    pub fn new(
        repositories: Repositories,
        provider: Arc<dyn VideoProvider>,
        default_region: String,
    ) -> Self {
        Self {
            users: UsersService::new(repositories.users),
            favorites: FavoritesService::new(repositories.favorites, provider.clone()),
            trends: TrendAnalysisService::new(repositories.analyses, provider.clone()),
            recommendations: RecommendationService::new(
                repositories.history,
                repositories.preferences,
                provider,
                default_region.clone(),
            ),
            default_region,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Users
        .route("/users", post(users::create).get(users::list))
        .route("/users/search", get(users::search))
        .route("/users/:id", get(users::get).delete(users::remove))
        // Video directory
        .route("/videos/search", get(videos::search))
        // Favorites
        .route(
            "/users/:user_id/favorites",
            get(favorites::list).post(favorites::add),
        )
        .route(
            "/users/:user_id/favorites/:video_id",
            delete(favorites::remove_by_video),
        )
        .route(
            "/favorites/:id",
            patch(favorites::update).delete(favorites::remove),
        )
        // Trends
        .route("/trends", get(trends::trending))
        .route("/trends/categories", get(trends::categories))
        .route(
            "/users/:user_id/trends",
            get(trends::list).post(trends::create),
        )
        .route(
            "/trends/analyses/:id",
            get(trends::get).delete(trends::remove),
        )
        .route("/trends/analyses/:id/criteria", patch(trends::update_criteria))
        // Recommendations, preferences and view history
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommend),
        )
        .route(
            "/users/:user_id/preferences",
            get(recommendations::get_preferences).put(recommendations::update_preferences),
        )
        .route(
            "/users/:user_id/history",
            get(recommendations::history).post(recommendations::register_view),
        )
        .route("/history/:id", delete(recommendations::remove_from_history))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Body returned by delete endpoints
pub(crate) fn deleted(removed: bool) -> Json<Value> {
    Json(json!({ "deleted": removed }))
}
