//! Feed pagination.
//!
//! `paginate` is the pure core: it orders a bounded candidate set for the
//! requested mode, applies the cursor, and cuts one page. `query` is the
//! store-backed entry the API uses — the store applies the filters in SQL
//! and supplies candidates in latest order, capped.

use std::cmp::Ordering;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::db::Database;
use crate::TARGET_FEED;

use super::cursor::{self, Cursor};
use super::rank;
use super::types::{FeedFilter, FeedMode, FeedPage, FeedRecord};

/// Upper bound on the candidate set materialized per request. Balanced mode
/// rebuilds the whole sequence every page, so this is the scalability
/// ceiling; at feed scale (thousands of rows) that trade favors editorial
/// variety over snapshot-stable pagination.
pub const FEED_CANDIDATE_CAP: usize = 10_000;

/// Runs a feed query against the store.
pub async fn query(
    db: &Database,
    filter: &FeedFilter,
    mode: FeedMode,
    cursor_token: Option<&str>,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<FeedPage> {
    let candidates = db.fetch_story_candidates(filter, FEED_CANDIDATE_CAP).await?;
    debug!(
        target: TARGET_FEED,
        "feed query: {} candidates, mode {:?}, limit {}",
        candidates.len(),
        mode,
        limit
    );
    let cursor = cursor_token.and_then(cursor::decode);
    Ok(paginate(candidates, mode, cursor, limit, now))
}

/// Orders `candidates` for `mode`, resumes from `cursor` when it matches the
/// mode, and returns one page. A missing or foreign-mode cursor restarts
/// from page one.
pub fn paginate(
    candidates: Vec<FeedRecord>,
    mode: FeedMode,
    cursor: Option<Cursor>,
    limit: usize,
    now: DateTime<Utc>,
) -> FeedPage {
    match mode {
        FeedMode::Latest => paginate_latest(candidates, cursor, limit),
        FeedMode::Signal => paginate_signal(candidates, cursor, limit, now),
        FeedMode::Balanced => paginate_balanced(candidates, cursor, limit),
    }
}

fn paginate_latest(
    mut candidates: Vec<FeedRecord>,
    cursor: Option<Cursor>,
    limit: usize,
) -> FeedPage {
    candidates.sort_by(rank::latest_cmp);

    if let Some(Cursor::Latest { ts, id }) = cursor {
        // Keep only rows strictly after the cursor position.
        candidates.retain(|record| {
            rank::cmp_latest_key(record.ts_millis(), record.id, ts, id) == Ordering::Greater
        });
    }

    let has_more = candidates.len() > limit;
    candidates.truncate(limit);
    let next_cursor = if has_more {
        candidates.last().map(|last| {
            cursor::encode(&Cursor::Latest {
                ts: last.ts_millis(),
                id: last.id,
            })
        })
    } else {
        None
    };
    FeedPage {
        items: candidates,
        next_cursor,
    }
}

fn paginate_signal(
    candidates: Vec<FeedRecord>,
    cursor: Option<Cursor>,
    limit: usize,
    now: DateTime<Utc>,
) -> FeedPage {
    let mut scored: Vec<(f64, FeedRecord)> = candidates
        .into_iter()
        .map(|record| (rank::signal_score(&record, now), record))
        .collect();
    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| rank::latest_cmp(a, b))
    });

    if let Some(Cursor::Signal { score, ts, id }) = cursor {
        scored.retain(|(record_score, record)| {
            match score.total_cmp(record_score) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => {
                    rank::cmp_latest_key(record.ts_millis(), record.id, ts, id)
                        == Ordering::Greater
                }
            }
        });
    }

    let has_more = scored.len() > limit;
    scored.truncate(limit);
    let next_cursor = if has_more {
        scored.last().map(|(score, last)| {
            cursor::encode(&Cursor::Signal {
                score: *score,
                ts: last.ts_millis(),
                id: last.id,
            })
        })
    } else {
        None
    };
    FeedPage {
        items: scored.into_iter().map(|(_, record)| record).collect(),
        next_cursor,
    }
}

fn paginate_balanced(
    mut candidates: Vec<FeedRecord>,
    cursor: Option<Cursor>,
    limit: usize,
) -> FeedPage {
    candidates.sort_by(rank::latest_cmp);
    let sequence = rank::balanced_sequence(candidates);

    let offset = match cursor {
        Some(Cursor::Balanced { offset }) => offset.min(sequence.len()),
        _ => 0,
    };
    let end = (offset + limit).min(sequence.len());
    let next_cursor = if end < sequence.len() {
        Some(cursor::encode(&Cursor::Balanced { offset: end }))
    } else {
        None
    };
    FeedPage {
        items: sequence[offset..end].to_vec(),
        next_cursor,
    }
}
