use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content preferences driving recommendations. At most one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct UserPreferences {
    pub id: i64,
    pub user_id: i64,
    pub genres: Vec<String>,
    pub topics: Vec<String>,
    pub languages: Vec<String>,
    /// Minimum video length in seconds
    pub min_duration: Option<i32>,
    /// Maximum video length in seconds
    pub max_duration: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Preferences about to be created; the store stamps `updated_at`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUserPreferences {
    pub user_id: i64,
    pub genres: Vec<String>,
    pub topics: Vec<String>,
    pub languages: Vec<String>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
}

impl NewUserPreferences {
    pub fn into_preferences(self, id: i64, updated_at: DateTime<Utc>) -> UserPreferences {
        UserPreferences {
            id,
            user_id: self.user_id,
            genres: self.genres,
            topics: self.topics,
            languages: self.languages,
            min_duration: self.min_duration,
            max_duration: self.max_duration,
            updated_at,
        }
    }
}

/// Partial preferences update. Only fields that are present overwrite.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PreferencesUpdate {
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub min_duration: Option<i32>,
    #[serde(default)]
    pub max_duration: Option<i32>,
}

impl PreferencesUpdate {
    /// Builds first-time preferences, absent lists become empty
    pub fn into_new(self, user_id: i64) -> NewUserPreferences {
        NewUserPreferences {
            user_id,
            genres: self.genres.unwrap_or_default(),
            topics: self.topics.unwrap_or_default(),
            languages: self.languages.unwrap_or_default(),
            min_duration: self.min_duration,
            max_duration: self.max_duration,
        }
    }

    /// Merges present fields into existing preferences and bumps `updated_at`
    pub fn apply(self, preferences: &mut UserPreferences, now: DateTime<Utc>) {
        if let Some(genres) = self.genres {
            preferences.genres = genres;
        }
        if let Some(topics) = self.topics {
            preferences.topics = topics;
        }
        if let Some(languages) = self.languages {
            preferences.languages = languages;
        }
        if let Some(min) = self.min_duration {
            preferences.min_duration = Some(min);
        }
        if let Some(max) = self.max_duration {
            preferences.max_duration = Some(max);
        }
        preferences.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn existing() -> UserPreferences {
        NewUserPreferences {
            user_id: 1,
            genres: vec!["comedy".into()],
            topics: vec!["cats".into()],
            languages: vec!["en".into()],
            min_duration: Some(60),
            max_duration: None,
        }
        .into_preferences(3, Utc::now() - TimeDelta::days(1))
    }

    #[test]
    fn test_into_new_defaults_to_empty_lists() {
        let new = PreferencesUpdate {
            topics: Some(vec!["rust".into()]),
            ..Default::default()
        }
        .into_new(9);
        assert_eq!(new.user_id, 9);
        assert_eq!(new.topics, vec!["rust"]);
        assert!(new.genres.is_empty());
        assert!(new.languages.is_empty());
        assert_eq!(new.min_duration, None);
    }

    #[test]
    fn test_apply_only_overwrites_present_fields() {
        let mut prefs = existing();
        let now = Utc::now();
        PreferencesUpdate {
            genres: Some(vec!["drama".into()]),
            max_duration: Some(600),
            ..Default::default()
        }
        .apply(&mut prefs, now);

        assert_eq!(prefs.genres, vec!["drama"]);
        assert_eq!(prefs.topics, vec!["cats"]);
        assert_eq!(prefs.languages, vec!["en"]);
        assert_eq!(prefs.min_duration, Some(60));
        assert_eq!(prefs.max_duration, Some(600));
        assert_eq!(prefs.updated_at, now);
    }

    #[test]
    fn test_apply_with_empty_list_clears() {
        let mut prefs = existing();
        PreferencesUpdate {
            topics: Some(vec![]),
            ..Default::default()
        }
        .apply(&mut prefs, Utc::now());
        assert!(prefs.topics.is_empty());
        assert_eq!(prefs.genres, vec!["comedy"]);
    }
}
