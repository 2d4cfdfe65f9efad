//! Ordering primitives for the three feed modes.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use super::types::FeedRecord;

/// Per-group quotas for balanced mode, applied in this order. Groups pull
/// from within-group latest order; the remainder is appended in latest order.
pub const BALANCED_QUOTAS: &[(&str, usize)] = &[
    ("regulatory", 10),
    ("procurement", 6),
    ("company", 6),
    ("evidence", 6),
    ("media", 10),
];

/// Strict descending `(published_at, id)` with nulls last.
pub fn latest_cmp(a: &FeedRecord, b: &FeedRecord) -> Ordering {
    cmp_latest_key(a.ts_millis(), a.id, b.ts_millis(), b.id)
}

/// Compares two `(ts, id)` ordering keys under latest-mode order: timestamp
/// descending, missing timestamps after all present ones, id descending.
pub fn cmp_latest_key(
    a_ts: Option<i64>,
    a_id: i64,
    b_ts: Option<i64>,
    b_id: i64,
) -> Ordering {
    let ts_ord = match (a_ts, b_ts) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    ts_ord.then(b_id.cmp(&a_id))
}

pub fn trust_weight(tier: Option<&str>) -> f64 {
    match tier {
        Some("A") => 3.0,
        Some("B") => 2.0,
        Some("C") => 1.0,
        _ => 0.0,
    }
}

/// Composite signal score: source trust, primary priority, coverage breadth,
/// and a small recency bonus.
pub fn signal_score(record: &FeedRecord, now: DateTime<Utc>) -> f64 {
    let priority = record.primary_priority.min(100) as f64 / 100.0;
    let breadth = (1.0 + record.sources_count as f64).ln();
    let recency = match record.published_at {
        Some(published) => {
            let age = now - published;
            if age <= Duration::hours(24) {
                0.5
            } else if age <= Duration::days(7) {
                0.2
            } else {
                0.0
            }
        }
        None => 0.0,
    };
    trust_weight(record.trust_tier.as_deref()) + priority + breadth + recency
}

/// Materializes the balanced-mode sequence from records already in latest
/// order: per-group quota heads first, then everything unpicked.
pub fn balanced_sequence(records: Vec<FeedRecord>) -> Vec<FeedRecord> {
    let mut picked = vec![false; records.len()];
    let mut order: Vec<usize> = Vec::with_capacity(records.len());

    for (group, quota) in BALANCED_QUOTAS {
        let mut taken = 0;
        for (idx, record) in records.iter().enumerate() {
            if taken == *quota {
                break;
            }
            if !picked[idx] && record.source_group == *group {
                picked[idx] = true;
                order.push(idx);
                taken += 1;
            }
        }
    }
    for (idx, taken) in picked.iter().enumerate() {
        if !taken {
            order.push(idx);
        }
    }

    let mut slots: Vec<Option<FeedRecord>> = records.into_iter().map(Some).collect();
    order
        .into_iter()
        .map(|idx| slots[idx].take().expect("balanced order visits each index once"))
        .collect()
}
