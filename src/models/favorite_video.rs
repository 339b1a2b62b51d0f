use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::VideoDetails;

/// A YouTube video saved by a user. At most one per (user_id, video_id).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct FavoriteVideo {
    pub id: i64,
    pub user_id: i64,
    /// YouTube video id
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    pub channel: String,
    /// ISO 8601 duration as reported by YouTube
    pub duration: String,
    pub published_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub added_at: DateTime<Utc>,
}

/// A favorite about to be persisted; the store assigns `id` and `added_at`
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavoriteVideo {
    pub user_id: i64,
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub thumbnail: String,
    pub channel: String,
    pub duration: String,
    pub published_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl NewFavoriteVideo {
    /// Populates a favorite from the canonical directory metadata
    pub fn from_details(
        user_id: i64,
        details: VideoDetails,
        notes: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Self {
        let summary = details.summary;
        Self {
            user_id,
            video_id: summary.video_id,
            title: summary.title,
            description: summary.description,
            url: summary.url,
            thumbnail: summary.thumbnail_url,
            channel: summary.channel_title,
            duration: details.duration,
            published_at: summary.published_at,
            notes,
            tags: tags.unwrap_or_default(),
        }
    }

    /// Materializes the row once the store has assigned identity
    pub fn into_favorite(self, id: i64, added_at: DateTime<Utc>) -> FavoriteVideo {
        FavoriteVideo {
            id,
            user_id: self.user_id,
            video_id: self.video_id,
            title: self.title,
            description: self.description,
            url: self.url,
            thumbnail: self.thumbnail,
            channel: self.channel,
            duration: self.duration,
            published_at: self.published_at,
            notes: self.notes,
            tags: self.tags,
            added_at,
        }
    }
}

/// Partial update of a favorite. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FavoriteVideoUpdate {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl FavoriteVideoUpdate {
    pub fn apply(self, favorite: &mut FavoriteVideo) {
        if let Some(notes) = self.notes {
            favorite.notes = Some(notes);
        }
        if let Some(tags) = self.tags {
            favorite.tags = tags;
        }
    }
}
