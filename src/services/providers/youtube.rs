/// YouTube Data API v3 provider
///
/// API Flow:
/// 1. Search: /search?part=snippet&type=video → video ids + snippets
/// 2. Details / trending: /videos?part=snippet,statistics,contentDetails
/// 3. Categories: /videoCategories?part=snippet
///
/// List endpoints are paged at no more than 50 items; pages are followed via
/// `nextPageToken` until the requested count is collected.
use crate::{
    error::{AppError, AppResult},
    models::{
        ApiCategory, ApiListResponse, ApiSearchItem, ApiVideo, Category, VideoDetails,
        VideoSummary,
    },
    services::providers::VideoProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const MAX_PAGE_SIZE: u32 = 50;
const VIDEO_PARTS: &str = "snippet,statistics,contentDetails";

#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

/// Items requested for the next page given how many are still wanted
fn page_size(remaining: u32) -> u32 {
    remaining.min(MAX_PAGE_SIZE)
}

impl YouTubeProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issues a single GET against an API resource and decodes the list envelope
    async fn get_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> AppResult<ApiListResponse<T>> {
        let url = format!("{}/{}", self.api_url, resource);
        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                resource = %resource,
                status = %status,
                "YouTube API request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "YouTube API returned status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))
    }

    /// Follows `nextPageToken` until `max_results` items are gathered
    async fn get_paged<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: Vec<(&str, String)>,
        max_results: u32,
    ) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        while (items.len() as u32) < max_results {
            let remaining = max_results - items.len() as u32;
            let mut page_params = params.clone();
            page_params.push(("maxResults", page_size(remaining).to_string()));
            if let Some(token) = page_token.take() {
                page_params.push(("pageToken", token));
            }

            let page: ApiListResponse<T> = self.get_page(resource, &page_params).await?;
            let received = page.items.len();
            items.extend(page.items);

            match page.next_page_token {
                Some(token) if received > 0 => page_token = Some(token),
                _ => break,
            }
        }

        items.truncate(max_results as usize);
        Ok(items)
    }
}

#[async_trait::async_trait]
impl VideoProvider for YouTubeProvider {
    async fn search(&self, query: &str, max_results: u32) -> AppResult<Vec<VideoSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", query.to_string()),
        ];
        let items: Vec<ApiSearchItem> = self.get_paged("search", params, max_results).await?;
        let videos: Vec<VideoSummary> = items
            .into_iter()
            .filter_map(ApiSearchItem::into_summary)
            .collect();

        tracing::info!(
            query = %query,
            results = videos.len(),
            provider = self.name(),
            "Video search completed"
        );

        Ok(videos)
    }

    async fn get_details(&self, video_id: &str) -> AppResult<Option<VideoDetails>> {
        let params = [
            ("part", VIDEO_PARTS.to_string()),
            ("id", video_id.to_string()),
        ];
        let page: ApiListResponse<ApiVideo> = self.get_page("videos", &params).await?;
        let details = page.items.into_iter().next().map(VideoDetails::from);

        tracing::debug!(
            video_id = %video_id,
            found = details.is_some(),
            provider = self.name(),
            "Video details fetched"
        );

        Ok(details)
    }

    async fn get_trending(
        &self,
        region: &str,
        category_id: Option<String>,
        max_results: u32,
    ) -> AppResult<Vec<VideoDetails>> {
        let mut params = vec![
            ("part", VIDEO_PARTS.to_string()),
            ("chart", "mostPopular".to_string()),
            ("regionCode", region.to_string()),
        ];
        if let Some(category_id) = &category_id {
            params.push(("videoCategoryId", category_id.clone()));
        }

        let items: Vec<ApiVideo> = self.get_paged("videos", params, max_results).await?;
        let videos: Vec<VideoDetails> = items.into_iter().map(VideoDetails::from).collect();

        tracing::info!(
            region = %region,
            category_id = ?category_id,
            results = videos.len(),
            provider = self.name(),
            "Trending videos fetched"
        );

        Ok(videos)
    }

    async fn get_categories(&self, region: &str) -> AppResult<Vec<Category>> {
        let params = [
            ("part", "snippet".to_string()),
            ("regionCode", region.to_string()),
        ];
        let page: ApiListResponse<ApiCategory> = self.get_page("videoCategories", &params).await?;
        Ok(page.items.into_iter().map(Category::from).collect())
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}
