/// Video directory abstraction
///
/// The services only talk to the outside video catalogue through this trait,
/// which keeps the YouTube client swappable and mockable.
use crate::{
    error::AppResult,
    models::{Category, VideoDetails, VideoSummary},
};

pub mod youtube;

pub use youtube::YouTubeProvider;

/// Trait for external video directories
///
/// Every call is a fresh round trip; implementations must not cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoProvider: Send + Sync {
    /// Search videos by free-text query
    async fn search(&self, query: &str, max_results: u32) -> AppResult<Vec<VideoSummary>>;

    /// Fetch statistics and content details for one video, `None` when unknown
    async fn get_details(&self, video_id: &str) -> AppResult<Option<VideoDetails>>;

    /// Most popular videos for a region, optionally restricted to a category
    async fn get_trending(
        &self,
        region: &str,
        category_id: Option<String>,
        max_results: u32,
    ) -> AppResult<Vec<VideoDetails>>;

    /// Video categories available in a region
    async fn get_categories(&self, region: &str) -> AppResult<Vec<Category>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
