use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feed ranking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    Latest,
    Signal,
    Balanced,
}

impl FeedMode {
    pub fn from_str(s: &str) -> Option<FeedMode> {
        match s {
            "latest" => Some(FeedMode::Latest),
            "signal" => Some(FeedMode::Signal),
            "balanced" => Some(FeedMode::Balanced),
            _ => None,
        }
    }
}

/// One story row as served by the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRecord {
    pub id: i64,
    pub story_id: String,
    pub title: String,
    pub url: String,
    pub source_id: String,
    pub source_group: String,
    pub region: Option<String>,
    pub event_type: Option<String>,
    pub trust_tier: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub primary_priority: i64,
    pub sources_count: i64,
}

impl FeedRecord {
    /// Millisecond timestamp used in ordering keys and cursors.
    pub fn ts_millis(&self) -> Option<i64> {
        self.published_at.map(|ts| ts.timestamp_millis())
    }
}

/// Filters applied by the store before ranking.
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    pub source_group: Option<String>,
    pub region: Option<String>,
    pub event_type: Option<String>,
    pub trust_tier: Option<String>,
    pub source_id: Option<String>,
    pub title_contains: Option<String>,
    pub published_from: Option<DateTime<Utc>>,
    pub published_until: Option<DateTime<Utc>>,
    pub since: Option<DateTime<Utc>>,
}

/// One page of feed results plus the continuation token, if any.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    pub items: Vec<FeedRecord>,
    pub next_cursor: Option<String>,
}
