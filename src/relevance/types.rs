use serde::{Deserialize, Serialize};

/// Top-level routing bucket for a classified item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Core,
    Frontier,
    Drop,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Core => "core",
            Track::Frontier => "frontier",
            Track::Drop => "drop",
        }
    }

    pub fn from_str(s: &str) -> Option<Track> {
        match s {
            "core" => Some(Track::Core),
            "frontier" => Some(Track::Frontier),
            "drop" => Some(Track::Drop),
            _ => None,
        }
    }
}

pub const REASON_CORE_ANCHOR: &str = "core_anchor_hit";
pub const REASON_FRONTIER_ANCHOR: &str = "frontier_anchor_hit";
pub const REASON_NAVIGATION: &str = "navigation_or_static_page";
pub const REASON_STRONG_NEGATIVE: &str = "strong_negative_without_diagnostic_anchor";
pub const REASON_SCORE_NON_POSITIVE: &str = "raw_score_non_positive";
pub const REASON_NO_ANCHOR: &str = "no_diagnostic_anchor";
pub const REASON_PRESS_WIRE: &str = "press_wire_without_diagnostic_keyword";
pub const REASON_NEWSROOM_DROP: &str = "newsroom_drop_keyword";
pub const REASON_NEWSROOM_NO_KEEP: &str = "newsroom_no_keep_keyword";
pub const REASON_PREPRINT_THRESHOLD: &str = "preprint_below_keyword_threshold";

/// Source metadata accompanying the text under classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMeta {
    pub title: String,
    pub url: String,
    pub source_group: String,
    pub event_type: String,
    pub source_id: String,
}

/// Audit trail of a classification decision. Persisted as JSON alongside the
/// item so rule changes can be tuned against what actually fired.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyExplain {
    pub anchors_hit: Vec<String>,
    pub negatives_hit: Vec<String>,
    pub rule_hits: Vec<String>,
    pub final_reason: String,
    pub raw_score: i32,
}

/// The outcome of classifying one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub track: Track,
    pub level: u8,
    pub explain: ClassifyExplain,
}
