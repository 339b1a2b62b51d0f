use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use castor_api::{
    create_router,
    db::Repositories,
    models::{watch_url, Category, VideoDetails, VideoSummary},
    services::providers::VideoProvider,
    AppError, AppResult, AppState,
};

/// Deterministic directory: every id except "missing" exists, search echoes the query
struct StubProvider;

fn summary(id: &str) -> VideoSummary {
    VideoSummary {
        video_id: id.to_string(),
        title: format!("Video {}", id),
        description: String::new(),
        channel_title: "Stub Channel".to_string(),
        published_at: None,
        thumbnail_url: format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id),
        url: watch_url(id),
    }
}

fn details(id: &str, views: u64) -> VideoDetails {
    VideoDetails {
        summary: summary(id),
        duration: "PT3M".to_string(),
        view_count: Some(views),
        like_count: Some(views / 10),
        comment_count: None,
        tags: vec![],
    }
}

#[async_trait::async_trait]
impl VideoProvider for StubProvider {
    async fn search(&self, query: &str, max_results: u32) -> AppResult<Vec<VideoSummary>> {
        if query == "broken" {
            return Err(AppError::ExternalApi("stub failure".to_string()));
        }
        Ok((0..max_results)
            .map(|i| summary(&format!("{}-{}", query, i)))
            .collect())
    }

    async fn get_details(&self, video_id: &str) -> AppResult<Option<VideoDetails>> {
        Ok((video_id != "missing").then(|| details(video_id, 100)))
    }

    async fn get_trending(
        &self,
        _region: &str,
        _category_id: Option<String>,
        max_results: u32,
    ) -> AppResult<Vec<VideoDetails>> {
        Ok((0..max_results)
            .map(|i| details(&format!("trend-{}", i), 1000 - i as u64))
            .collect())
    }

    async fn get_categories(&self, _region: &str) -> AppResult<Vec<Category>> {
        Ok(vec![Category {
            id: "10".to_string(),
            title: "Music".to_string(),
            assignable: true,
        }])
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn create_test_app() -> Router {
    let state = AppState::new(
        Repositories::in_memory(),
        Arc::new(StubProvider),
        "US".to_string(),
    );
    create_router(Arc::new(state))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_user(app: &Router, email: &str) -> i64 {
    let (status, user) = send(
        app,
        "POST",
        "/api/v1/users",
        Some(json!({ "name": "Test User", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    user["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "client-123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "client-123");
}

#[tokio::test]
async fn test_user_lifecycle() {
    let app = create_test_app();
    let id = create_user(&app, "ada@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(json!({ "name": "Again", "email": "ADA@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, users) = send(&app, "GET", "/api/v1/users/search?name=test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/api/v1/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, body) = send(&app, "GET", &format!("/api/v1/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_favorites_flow() {
    let app = create_test_app();
    let user_id = create_user(&app, "fav@example.com").await;
    let favorites_uri = format!("/api/v1/users/{}/favorites", user_id);

    let (status, favorite) = send(
        &app,
        "POST",
        &favorites_uri,
        Some(json!({ "video_id": "abc", "notes": "later" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(favorite["title"], "Video abc");
    assert_eq!(favorite["tags"], json!([]));

    let (status, _) = send(&app, "POST", &favorites_uri, Some(json!({ "video_id": "abc" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        &favorites_uri,
        Some(json!({ "video_id": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = favorite["id"].as_i64().unwrap();
    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/v1/favorites/{}", id),
        Some(json!({ "tags": ["rust"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "later");
    assert_eq!(updated["tags"], json!(["rust"]));

    let (status, body) = send(&app, "DELETE", &format!("{}/abc", favorites_uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (_, list) = send(&app, "GET", &favorites_uri, None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_fall_back_to_trending() {
    let app = create_test_app();
    let (status, videos) = send(&app, "GET", "/api/v1/users/1/recommendations?max_results=3", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = videos
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["video_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["trend-0", "trend-1", "trend-2"]);
}

#[tokio::test]
async fn test_recommendations_from_preferences() {
    let app = create_test_app();
    let (status, prefs) = send(
        &app,
        "PUT",
        "/api/v1/users/1/preferences",
        Some(json!({ "topics": ["cats", "broken"], "genres": ["comedy"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["topics"], json!(["cats", "broken"]));

    let (status, videos) = send(&app, "GET", "/api/v1/users/1/recommendations?max_results=6", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = videos
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["video_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["cats-0", "cats-1", "comedy-0", "comedy-1"]);
}

#[tokio::test]
async fn test_preferences_absent_then_merged() {
    let app = create_test_app();
    let (status, prefs) = send(&app, "GET", "/api/v1/users/5/preferences", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(prefs.is_null());

    send(
        &app,
        "PUT",
        "/api/v1/users/5/preferences",
        Some(json!({ "genres": ["jazz"], "min_duration": 60 })),
    )
    .await;
    let (_, prefs) = send(
        &app,
        "PUT",
        "/api/v1/users/5/preferences",
        Some(json!({ "languages": ["en"] })),
    )
    .await;
    assert_eq!(prefs["genres"], json!(["jazz"]));
    assert_eq!(prefs["languages"], json!(["en"]));
    assert_eq!(prefs["min_duration"], 60);
}

#[tokio::test]
async fn test_view_history() {
    let app = create_test_app();
    let (status, view) = send(
        &app,
        "POST",
        "/api/v1/users/2/history",
        Some(json!({ "video_id": "abc", "title": "Piano basics", "view_duration_seconds": 90 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["completed"], false);

    let (_, history) = send(&app, "GET", "/api/v1/users/2/history?days_back=7", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let id = view["id"].as_i64().unwrap();
    let (_, body) = send(&app, "DELETE", &format!("/api/v1/history/{}", id), None).await;
    assert_eq!(body["deleted"], true);

    let (_, history) = send(&app, "GET", "/api/v1/users/2/history", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_trend_analysis_flow() {
    let app = create_test_app();
    let (status, analysis) = send(
        &app,
        "POST",
        "/api/v1/users/3/trends",
        Some(json!({ "category": "music", "category_id": "10", "max_results": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(analysis["region"], "US");
    assert_eq!(analysis["results"]["total_videos"], 2);
    assert_eq!(analysis["results"]["statistics"]["total_views"], 1999);
    assert_eq!(analysis["results"]["statistics"]["top_video_views"]["title"], "Video trend-0");
    assert_eq!(analysis["criteria"]["category_id"], "10");

    let id = analysis["id"].as_i64().unwrap();
    let uri = format!("/api/v1/trends/analyses/{}", id);

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("{}/criteria", uri),
        Some(json!({ "max_results": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["criteria"]["max_results"], 50);
    assert_eq!(updated["criteria"]["region"], "US");

    let (status, _) = send(&app, "PATCH", &format!("{}/criteria", uri), Some(json!([1]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, "GET", "/api/v1/users/3/trends", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(body["deleted"], true);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_trend_analysis_has_empty_statistics() {
    let app = create_test_app();
    let (status, analysis) = send(
        &app,
        "POST",
        "/api/v1/users/3/trends",
        Some(json!({ "max_results": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(analysis["category"], "all");
    assert_eq!(analysis["results"]["statistics"], json!({}));
    assert_eq!(analysis["results"]["total_videos"], 0);
}

#[tokio::test]
async fn test_trending_and_categories() {
    let app = create_test_app();
    let (status, videos) = send(&app, "GET", "/api/v1/trends?max_results=4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(videos.as_array().unwrap().len(), 4);
    assert_eq!(videos[0]["view_count"], 1000);

    let (status, categories) = send(&app, "GET", "/api/v1/trends/categories?region=GB", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories[0]["title"], "Music");
}

#[tokio::test]
async fn test_video_search_passthrough() {
    let app = create_test_app();
    let (status, videos) = send(&app, "GET", "/api/v1/videos/search?q=jazz&max_results=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(videos[1]["video_id"], "jazz-1");

    let (status, body) = send(&app, "GET", "/api/v1/videos/search?q=broken", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "stub failure");
}

#[tokio::test]
async fn test_history_window_out_of_date_range() {
    let app = create_test_app();
    send(
        &app,
        "POST",
        "/api/v1/users/2/history",
        Some(json!({ "video_id": "abc", "title": "Piano basics" })),
    )
    .await;

    let (status, history) = send(&app, "GET", "/api/v1/users/2/history?days_back=100000000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (status, history) = send(&app, "GET", "/api/v1/users/2/history?days_back=-100000000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(history.as_array().unwrap().is_empty());
}
