pub mod core;
pub mod item;
pub mod schema;
pub mod story;

pub use core::Database;
pub use item::{NewItem, StoredItem};
pub use story::StoryRow;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamps are stored as RFC3339 TEXT in UTC so that lexicographic and
/// chronological order agree.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_ts(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
