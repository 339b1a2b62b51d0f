use chrono::{DateTime, Utc};
use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::VideoDetails;

/// Free-form analysis parameters, shallow-merged on update
pub type Criteria = Map<String, Value>;

/// Snapshot of one trending query plus its derived statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendAnalysis {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub region: String,
    pub analyzed_at: DateTime<Utc>,
    pub results: TrendResults,
    pub criteria: Criteria,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrendAnalysis {
    pub user_id: i64,
    pub category: String,
    pub region: String,
    pub analyzed_at: DateTime<Utc>,
    pub results: TrendResults,
    pub criteria: Criteria,
}

impl NewTrendAnalysis {
    pub fn into_analysis(self, id: i64) -> TrendAnalysis {
        TrendAnalysis {
            id,
            user_id: self.user_id,
            category: self.category,
            region: self.region,
            analyzed_at: self.analyzed_at,
            results: self.results,
            criteria: self.criteria,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendResults {
    pub videos: Vec<VideoDetails>,
    /// `None` for an empty batch, rendered as `{}`
    #[serde(
        default,
        serialize_with = "serialize_statistics",
        deserialize_with = "deserialize_statistics"
    )]
    pub statistics: Option<TrendStatistics>,
    pub total_videos: usize,
}

/// Aggregate counters over a batch of trending videos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendStatistics {
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub average_views: u64,
    pub average_likes: u64,
    pub average_comments: u64,
    pub top_video_views: TopVideoByViews,
    pub top_video_likes: TopVideoByLikes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopVideoByViews {
    pub title: String,
    pub views: u64,
    pub channel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopVideoByLikes {
    pub title: String,
    pub likes: u64,
    pub channel: String,
}

fn serialize_statistics<S>(stats: &Option<TrendStatistics>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match stats {
        Some(stats) => stats.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

fn deserialize_statistics<'de, D>(deserializer: D) -> Result<Option<TrendStatistics>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats() -> TrendStatistics {
        TrendStatistics {
            total_views: 30,
            total_likes: 3,
            total_comments: 0,
            average_views: 15,
            average_likes: 1,
            average_comments: 0,
            top_video_views: TopVideoByViews {
                title: "A".into(),
                views: 20,
                channel: "ca".into(),
            },
            top_video_likes: TopVideoByLikes {
                title: "B".into(),
                likes: 2,
                channel: "cb".into(),
            },
        }
    }

    #[test]
    fn test_empty_statistics_render_as_empty_object() {
        let results = TrendResults {
            videos: vec![],
            statistics: None,
            total_videos: 0,
        };
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value["statistics"], json!({}));

        let back: TrendResults = serde_json::from_value(value).unwrap();
        assert_eq!(back.statistics, None);
    }

    #[test]
    fn test_statistics_json_shape() {
        let results = TrendResults {
            videos: vec![],
            statistics: Some(stats()),
            total_videos: 2,
        };
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value["statistics"]["average_views"], 15);
        assert_eq!(value["statistics"]["top_video_views"]["views"], 20);
        assert_eq!(value["statistics"]["top_video_likes"]["likes"], 2);

        let back: TrendResults = serde_json::from_value(value).unwrap();
        assert_eq!(back.statistics, Some(stats()));
    }
}
