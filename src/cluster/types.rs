use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// An identity-key strategy. Strategies are tried in configured order, and
/// every applicable key is registered as a cluster alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    CanonicalUrl,
    NormalizedUrlHostPath,
    TitleFingerprintV1,
    NormalizedTitleV1,
    HostPublishedDayV1,
}

impl KeyStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStrategy::CanonicalUrl => "canonical_url",
            KeyStrategy::NormalizedUrlHostPath => "normalized_url_host_path",
            KeyStrategy::TitleFingerprintV1 => "title_fingerprint_v1",
            KeyStrategy::NormalizedTitleV1 => "normalized_title_v1",
            KeyStrategy::HostPublishedDayV1 => "host_published_day_v1",
        }
    }

    pub fn from_str(s: &str) -> Option<KeyStrategy> {
        match s {
            "canonical_url" => Some(KeyStrategy::CanonicalUrl),
            "normalized_url_host_path" => Some(KeyStrategy::NormalizedUrlHostPath),
            "title_fingerprint_v1" => Some(KeyStrategy::TitleFingerprintV1),
            "normalized_title_v1" => Some(KeyStrategy::NormalizedTitleV1),
            "host_published_day_v1" => Some(KeyStrategy::HostPublishedDayV1),
            _ => None,
        }
    }

    pub fn default_order() -> Vec<KeyStrategy> {
        vec![
            KeyStrategy::CanonicalUrl,
            KeyStrategy::NormalizedUrlHostPath,
            KeyStrategy::TitleFingerprintV1,
            KeyStrategy::NormalizedTitleV1,
            KeyStrategy::HostPublishedDayV1,
        ]
    }
}

/// One criterion in the primary-selection order. Ties fall through to the
/// next criterion; the final tie-break is always ascending title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimarySelect {
    SourcePriority,
    EvidenceGrade,
    PublishedAtLatest,
    PublishedAtEarliest,
    FirstSeenEarliest,
}

impl PrimarySelect {
    pub fn from_str(s: &str) -> Option<PrimarySelect> {
        match s {
            "source_priority" => Some(PrimarySelect::SourcePriority),
            "evidence_grade" => Some(PrimarySelect::EvidenceGrade),
            "published_at_latest" => Some(PrimarySelect::PublishedAtLatest),
            "published_at_earliest" => Some(PrimarySelect::PublishedAtEarliest),
            "first_seen_earliest" => Some(PrimarySelect::FirstSeenEarliest),
            _ => None,
        }
    }

    pub fn default_order() -> Vec<PrimarySelect> {
        vec![
            PrimarySelect::SourcePriority,
            PrimarySelect::EvidenceGrade,
            PrimarySelect::PublishedAtLatest,
            PrimarySelect::FirstSeenEarliest,
        ]
    }
}

/// Clusterer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub enabled: bool,
    pub window_hours: i64,
    pub key_strategies: Vec<KeyStrategy>,
    pub primary_select: Vec<PrimarySelect>,
    pub max_other_sources: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            enabled: true,
            window_hours: 72,
            key_strategies: KeyStrategy::default_order(),
            primary_select: PrimarySelect::default_order(),
            max_other_sources: 5,
        }
    }
}

impl ClusterConfig {
    /// Builds a config from a JSON value, tolerating missing keys and wrong
    /// shapes field by field. Unknown strategy or criterion names are
    /// skipped with a warning; a list that ends up empty falls back to the
    /// default order.
    pub fn from_value(value: &Value) -> ClusterConfig {
        let defaults = ClusterConfig::default();
        let key_strategies = match value.get("key_strategies") {
            Some(Value::Array(items)) => {
                let parsed: Vec<KeyStrategy> = items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(|s| {
                        let strategy = KeyStrategy::from_str(s);
                        if strategy.is_none() {
                            warn!("skipping unknown key strategy: {}", s);
                        }
                        strategy
                    })
                    .collect();
                if parsed.is_empty() {
                    defaults.key_strategies.clone()
                } else {
                    parsed
                }
            }
            _ => defaults.key_strategies.clone(),
        };
        let primary_select = match value.get("primary_select") {
            Some(Value::Array(items)) => {
                let parsed: Vec<PrimarySelect> = items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(|s| {
                        let criterion = PrimarySelect::from_str(s);
                        if criterion.is_none() {
                            warn!("skipping unknown primary-select criterion: {}", s);
                        }
                        criterion
                    })
                    .collect();
                if parsed.is_empty() {
                    defaults.primary_select.clone()
                } else {
                    parsed
                }
            }
            _ => defaults.primary_select.clone(),
        };
        ClusterConfig {
            enabled: value
                .get("enabled")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.enabled),
            window_hours: value
                .get("window_hours")
                .and_then(Value::as_i64)
                .filter(|w| *w > 0)
                .unwrap_or(defaults.window_hours),
            key_strategies,
            primary_select,
            max_other_sources: value
                .get("max_other_sources")
                .and_then(Value::as_u64)
                .map(|m| m as usize)
                .unwrap_or(defaults.max_other_sources),
        }
    }
}

/// A candidate item entering the clusterer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterItem {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub canonical_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub first_seen_at: Option<DateTime<Utc>>,
    pub source_key: String,
    pub source_priority: Option<i64>,
    pub evidence_grade: Option<i64>,
}

/// A compact reference to a non-primary cluster member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherSource {
    pub source_key: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source_priority: i64,
}

/// The representative item chosen to render for a story, with its attached
/// duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryPrimary {
    pub story_id: String,
    pub item: ClusterItem,
    pub is_primary: bool,
    pub cluster_size: usize,
    pub key_strategy: Option<KeyStrategy>,
    pub dedupe_reason: String,
    pub other_sources: Vec<OtherSource>,
}

/// Batch-level accounting for one cluster run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterExplain {
    pub enabled: bool,
    pub window_hours: i64,
    pub items_in: usize,
    pub clusters: usize,
    pub singletons: usize,
    pub window_rejections: usize,
}
