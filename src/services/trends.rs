use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    db::TrendAnalysisRepository,
    error::{AppError, AppResult},
    models::{
        Category, Criteria, NewTrendAnalysis, TopVideoByLikes, TopVideoByViews, TrendAnalysis,
        TrendResults, TrendStatistics, VideoDetails,
    },
    services::providers::VideoProvider,
};

/// First video holding the maximum key; later ties never replace it
fn first_max_by_key<F>(videos: &[VideoDetails], key: F) -> Option<&VideoDetails>
where
    F: Fn(&VideoDetails) -> u64,
{
    videos
        .iter()
        .reduce(|best, video| if key(video) > key(best) { video } else { best })
}

fn views(video: &VideoDetails) -> u64 {
    video.view_count.unwrap_or(0)
}

fn likes(video: &VideoDetails) -> u64 {
    video.like_count.unwrap_or(0)
}

fn comments(video: &VideoDetails) -> u64 {
    video.comment_count.unwrap_or(0)
}

/// Descriptive statistics over a batch of trending videos
///
/// Missing counters count as zero, averages use floor division. Returns
/// `None` for an empty batch.
pub fn compute_statistics(videos: &[VideoDetails]) -> Option<TrendStatistics> {
    let top_by_views = first_max_by_key(videos, views)?;
    let top_by_likes = first_max_by_key(videos, likes)?;

    let count = videos.len() as u64;
    let total_views: u64 = videos.iter().map(views).sum();
    let total_likes: u64 = videos.iter().map(likes).sum();
    let total_comments: u64 = videos.iter().map(comments).sum();

    Some(TrendStatistics {
        total_views,
        total_likes,
        total_comments,
        average_views: total_views / count,
        average_likes: total_likes / count,
        average_comments: total_comments / count,
        top_video_views: TopVideoByViews {
            title: top_by_views.summary.title.clone(),
            views: views(top_by_views),
            channel: top_by_views.summary.channel_title.clone(),
        },
        top_video_likes: TopVideoByLikes {
            title: top_by_likes.summary.title.clone(),
            likes: likes(top_by_likes),
            channel: top_by_likes.summary.channel_title.clone(),
        },
    })
}

/// Parameters of a new trend analysis
#[derive(Debug, Clone)]
pub struct TrendQuery {
    pub category: String,
    pub region: String,
    pub category_id: Option<String>,
    pub max_results: u32,
}

/// Service for trending-video snapshots and their statistics
pub struct TrendAnalysisService {
    analyses: Arc<dyn TrendAnalysisRepository>,
    provider: Arc<dyn VideoProvider>,
}

impl TrendAnalysisService {
    pub fn new(analyses: Arc<dyn TrendAnalysisRepository>, provider: Arc<dyn VideoProvider>) -> Self {
        Self { analyses, provider }
    }

    /// Fetches the current trending list, aggregates it and stores the snapshot
    pub async fn create_trend_analysis(
        &self,
        user_id: i64,
        query: TrendQuery,
    ) -> AppResult<TrendAnalysis> {
        let videos = self
            .provider
            .get_trending(&query.region, query.category_id.clone(), query.max_results)
            .await?;

        let statistics = compute_statistics(&videos);
        let mut criteria = Criteria::new();
        criteria.insert("max_results".to_string(), json!(query.max_results));
        criteria.insert("region".to_string(), json!(query.region));
        if let Some(category_id) = &query.category_id {
            criteria.insert("category_id".to_string(), json!(category_id));
        }

        let analysis = NewTrendAnalysis {
            user_id,
            category: query.category,
            region: query.region,
            analyzed_at: Utc::now(),
            results: TrendResults {
                total_videos: videos.len(),
                videos,
                statistics,
            },
            criteria,
        };

        let analysis = self.analyses.create(analysis).await?;
        tracing::info!(
            analysis_id = analysis.id,
            user_id,
            total_videos = analysis.results.total_videos,
            "Trend analysis stored"
        );

        Ok(analysis)
    }

    pub async fn list_user_analyses(&self, user_id: i64) -> AppResult<Vec<TrendAnalysis>> {
        self.analyses.get_by_user(user_id).await
    }

    pub async fn get_analysis(&self, id: i64) -> AppResult<TrendAnalysis> {
        self.analyses
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Analysis {} not found", id)))
    }

    /// Shallow-merges `new_criteria` into the stored criteria map
    pub async fn update_analysis_criteria(
        &self,
        id: i64,
        new_criteria: Criteria,
    ) -> AppResult<TrendAnalysis> {
        let mut analysis = self.get_analysis(id).await?;
        for (key, value) in new_criteria {
            analysis.criteria.insert(key, value);
        }
        self.analyses.update(&analysis).await
    }

    pub async fn delete_analysis(&self, id: i64) -> AppResult<bool> {
        self.analyses.delete(id).await
    }

    pub async fn get_categories(&self, region: &str) -> AppResult<Vec<Category>> {
        self.provider.get_categories(region).await
    }

    pub async fn get_trending(
        &self,
        region: &str,
        category_id: Option<String>,
        max_results: u32,
    ) -> AppResult<Vec<VideoDetails>> {
        self.provider
            .get_trending(region, category_id, max_results)
            .await
    }
}

/// Converts a JSON object body into criteria, rejecting other JSON shapes
pub fn criteria_from_value(value: Value) -> AppResult<Criteria> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::InvalidInput(
            "Criteria must be a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::MockTrendAnalysisRepository;
    use crate::models::{watch_url, VideoSummary};
    use crate::services::providers::MockVideoProvider;
    use mockall::predicate::eq;

    fn video(id: &str, views: Option<u64>, likes: Option<u64>, comments: Option<u64>) -> VideoDetails {
        VideoDetails {
            summary: VideoSummary {
                video_id: id.to_string(),
                title: format!("Title {}", id),
                description: String::new(),
                channel_title: format!("Channel {}", id),
                published_at: None,
                thumbnail_url: String::new(),
                url: watch_url(id),
            },
            duration: "PT1M".to_string(),
            view_count: views,
            like_count: likes,
            comment_count: comments,
            tags: vec![],
        }
    }

    #[test]
    fn test_empty_batch_has_no_statistics() {
        assert_eq!(compute_statistics(&[]), None);
    }

    #[test]
    fn test_sums_and_floor_averages() {
        let videos = vec![
            video("a", Some(10), Some(3), Some(1)),
            video("b", Some(5), Some(4), None),
            video("c", None, Some(0), Some(2)),
        ];
        let stats = compute_statistics(&videos).unwrap();

        assert_eq!(stats.total_views, 15);
        assert_eq!(stats.total_likes, 7);
        assert_eq!(stats.total_comments, 3);
        assert_eq!(stats.average_views, 5);
        assert_eq!(stats.average_likes, 2);
        assert_eq!(stats.average_comments, 1);
        assert_eq!(stats.top_video_views.title, "Title a");
        assert_eq!(stats.top_video_views.views, 10);
        assert_eq!(stats.top_video_likes.title, "Title b");
        assert_eq!(stats.top_video_likes.likes, 4);
        assert_eq!(stats.top_video_likes.channel, "Channel b");
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let videos = vec![
            video("first", Some(100), Some(9), None),
            video("second", Some(100), Some(9), None),
        ];
        let stats = compute_statistics(&videos).unwrap();
        assert_eq!(stats.top_video_views.title, "Title first");
        assert_eq!(stats.top_video_likes.title, "Title first");
    }

    #[test]
    fn test_all_counters_missing() {
        let videos = vec![video("x", None, None, None)];
        let stats = compute_statistics(&videos).unwrap();
        assert_eq!(stats.total_views, 0);
        assert_eq!(stats.top_video_views.views, 0);
        assert_eq!(stats.top_video_views.title, "Title x");
    }

    #[tokio::test]
    async fn test_create_trend_analysis_stores_snapshot() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_get_trending()
            .with(eq("GB"), eq(Some("10".to_string())), eq(2))
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    video("a", Some(30), Some(1), Some(0)),
                    video("b", Some(10), Some(5), Some(2)),
                ])
            });

        let mut analyses = MockTrendAnalysisRepository::new();
        analyses
            .expect_create()
            .times(1)
            .returning(|new| Ok(new.into_analysis(1)));

        let service = TrendAnalysisService::new(Arc::new(analyses), Arc::new(provider));
        let analysis = service
            .create_trend_analysis(
                7,
                TrendQuery {
                    category: "music".to_string(),
                    region: "GB".to_string(),
                    category_id: Some("10".to_string()),
                    max_results: 2,
                },
            )
            .await
            .unwrap();

        assert_eq!(analysis.user_id, 7);
        assert_eq!(analysis.category, "music");
        assert_eq!(analysis.results.total_videos, 2);
        let stats = analysis.results.statistics.unwrap();
        assert_eq!(stats.total_views, 40);
        assert_eq!(stats.average_views, 20);
        assert_eq!(analysis.criteria["max_results"], json!(2));
        assert_eq!(analysis.criteria["region"], json!("GB"));
        assert_eq!(analysis.criteria["category_id"], json!("10"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut provider = MockVideoProvider::new();
        provider
            .expect_get_trending()
            .returning(|_, _, _| Err(AppError::ExternalApi("quota".to_string())));
        let mut analyses = MockTrendAnalysisRepository::new();
        analyses.expect_create().never();

        let service = TrendAnalysisService::new(Arc::new(analyses), Arc::new(provider));
        let result = service
            .create_trend_analysis(
                1,
                TrendQuery {
                    category: "all".to_string(),
                    region: "US".to_string(),
                    category_id: None,
                    max_results: 20,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_update_criteria_merges() {
        let mut analyses = MockTrendAnalysisRepository::new();
        analyses.expect_get_by_id().with(eq(3)).returning(|id| {
            let mut criteria = Criteria::new();
            criteria.insert("region".to_string(), json!("US"));
            criteria.insert("max_results".to_string(), json!(20));
            Ok(Some(
                NewTrendAnalysis {
                    user_id: 1,
                    category: "all".to_string(),
                    region: "US".to_string(),
                    analyzed_at: Utc::now(),
                    results: TrendResults {
                        videos: vec![],
                        statistics: None,
                        total_videos: 0,
                    },
                    criteria,
                }
                .into_analysis(id),
            ))
        });
        analyses
            .expect_update()
            .returning(|analysis| Ok(analysis.clone()));

        let service =
            TrendAnalysisService::new(Arc::new(analyses), Arc::new(MockVideoProvider::new()));
        let update = criteria_from_value(json!({"max_results": 50, "note": "weekly"})).unwrap();
        let analysis = service.update_analysis_criteria(3, update).await.unwrap();

        assert_eq!(analysis.criteria["region"], json!("US"));
        assert_eq!(analysis.criteria["max_results"], json!(50));
        assert_eq!(analysis.criteria["note"], json!("weekly"));
    }

    #[tokio::test]
    async fn test_update_criteria_missing_analysis() {
        let mut analyses = MockTrendAnalysisRepository::new();
        analyses.expect_get_by_id().returning(|_| Ok(None));
        analyses.expect_update().never();

        let service =
            TrendAnalysisService::new(Arc::new(analyses), Arc::new(MockVideoProvider::new()));
        let result = service.update_analysis_criteria(9, Criteria::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_criteria_must_be_object() {
        assert!(criteria_from_value(json!([1, 2])).is_err());
    }
}
