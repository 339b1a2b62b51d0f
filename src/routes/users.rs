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
    models::{NewUser, User},
    routes::{deleted, AppState},
};

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    name: String,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(user): Json<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    tracing::info!(request_id = %request_id, "Creating user");
    let user = state.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.list_users().await?))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameQuery>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.search_users(&params.name).await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    Ok(Json(state.users.get_user(id).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let removed = state.users.delete_user(id).await?;
    tracing::info!(request_id = %request_id, user_id = id, removed, "User delete");
    Ok(deleted(removed))
}
