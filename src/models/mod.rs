use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod favorite_video;
pub mod trend_analysis;
pub mod user;
pub mod user_preferences;
pub mod view_history;

pub use favorite_video::{FavoriteVideo, FavoriteVideoUpdate, NewFavoriteVideo};
pub use trend_analysis::{
    Criteria, NewTrendAnalysis, TopVideoByLikes, TopVideoByViews, TrendAnalysis, TrendResults,
    TrendStatistics,
};
pub use user::{NewUser, User};
pub use user_preferences::{NewUserPreferences, PreferencesUpdate, UserPreferences};
pub use view_history::{NewViewHistory, ViewHistory};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Builds the public watch URL for a YouTube video id
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

/// A video as returned by a directory search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: String,
    pub url: String,
}

/// A video with statistics and content details, fetched fresh on every use
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoDetails {
    #[serde(flatten)]
    pub summary: VideoSummary,
    /// ISO 8601 duration, e.g. "PT4M13S"
    pub duration: String,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<VideoDetails> for VideoSummary {
    fn from(details: VideoDetails) -> Self {
        details.summary
    }
}

/// A YouTube video category available in a region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub assignable: bool,
}

// ============================================================================
// YouTube Data API v3 Types
// ============================================================================

/// Paged list envelope shared by the search, videos and categories endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: ApiThumbnails,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ApiSnippet {
    fn thumbnail_url(&self) -> String {
        self.thumbnails
            .medium
            .as_ref()
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiThumbnails {
    #[serde(default)]
    pub medium: Option<ApiThumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiThumbnail {
    pub url: String,
}

/// Item of `GET /search`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSearchItem {
    pub id: ApiSearchId,
    #[serde(default)]
    pub snippet: ApiSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchId {
    #[serde(default)]
    pub video_id: Option<String>,
}

impl ApiSearchItem {
    /// Converts a search hit, skipping hits that are not videos
    pub fn into_summary(self) -> Option<VideoSummary> {
        let video_id = self.id.video_id?;
        Some(VideoSummary {
            url: watch_url(&video_id),
            thumbnail_url: self.snippet.thumbnail_url(),
            video_id,
            title: self.snippet.title,
            description: self.snippet.description,
            channel_title: self.snippet.channel_title,
            published_at: self.snippet.published_at,
        })
    }
}

/// Item of `GET /videos`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideo {
    pub id: String,
    #[serde(default)]
    pub snippet: ApiSnippet,
    #[serde(default)]
    pub statistics: ApiStatistics,
    #[serde(default)]
    pub content_details: ApiContentDetails,
}

/// Counters arrive as decimal strings and may be hidden by the uploader
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContentDetails {
    #[serde(default)]
    pub duration: String,
}

fn parse_counter(raw: &Option<String>) -> Option<u64> {
    raw.as_deref().and_then(|s| s.parse().ok())
}

impl From<ApiVideo> for VideoDetails {
    fn from(video: ApiVideo) -> Self {
        let view_count = parse_counter(&video.statistics.view_count);
        let like_count = parse_counter(&video.statistics.like_count);
        let comment_count = parse_counter(&video.statistics.comment_count);
        let thumbnail_url = video.snippet.thumbnail_url();

        VideoDetails {
            summary: VideoSummary {
                url: watch_url(&video.id),
                video_id: video.id,
                title: video.snippet.title,
                description: video.snippet.description,
                channel_title: video.snippet.channel_title,
                published_at: video.snippet.published_at,
                thumbnail_url,
            },
            duration: video.content_details.duration,
            view_count,
            like_count,
            comment_count,
            tags: video.snippet.tags,
        }
    }
}

/// Item of `GET /videoCategories`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    pub id: String,
    pub snippet: ApiCategorySnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategorySnippet {
    pub title: String,
    #[serde(default)]
    pub assignable: bool,
}

impl From<ApiCategory> for Category {
    fn from(category: ApiCategory) -> Self {
        Category {
            id: category.id,
            title: category.snippet.title,
            assignable: category.snippet.assignable,
        }
    }
}
