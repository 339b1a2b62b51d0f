use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One view event. Re-watching a video appends another row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ViewHistory {
    pub id: i64,
    pub user_id: i64,
    pub video_id: String,
    pub title: String,
    pub viewed_at: DateTime<Utc>,
    pub view_duration_seconds: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewViewHistory {
    pub user_id: i64,
    pub video_id: String,
    pub title: String,
    pub viewed_at: DateTime<Utc>,
    pub view_duration_seconds: i32,
    pub completed: bool,
}

impl NewViewHistory {
    pub fn into_view(self, id: i64) -> ViewHistory {
        ViewHistory {
            id,
            user_id: self.user_id,
            video_id: self.video_id,
            title: self.title,
            viewed_at: self.viewed_at,
            view_duration_seconds: self.view_duration_seconds,
            completed: self.completed,
        }
    }
}
