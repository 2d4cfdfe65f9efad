//! Batch story clustering.
//!
//! Items are processed in input order against an explicit alias-key →
//! cluster-index map. A new cluster registers every candidate key it has in
//! one batch, so later items can join through any strategy's alias. Joins
//! are constrained by the member timestamp span: a key match outside the
//! window is rejected and the next candidate is tried.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::TARGET_PIPELINE;

use super::keys;
use super::types::*;
use super::DEFAULT_SOURCE_PRIORITY;

struct Bucket {
    story_id: String,
    strategy: Option<KeyStrategy>,
    members: Vec<usize>,
    min_ts: Option<DateTime<Utc>>,
    max_ts: Option<DateTime<Utc>>,
}

/// Clusters a batch of candidate items into stories and selects a primary
/// for each. Pure and deterministic for a fixed input order.
pub fn cluster(
    items: &[ClusterItem],
    config: &ClusterConfig,
    priorities: &HashMap<String, i64>,
) -> (Vec<StoryPrimary>, ClusterExplain) {
    let mut explain = ClusterExplain {
        enabled: config.enabled,
        window_hours: config.window_hours,
        items_in: items.len(),
        clusters: 0,
        singletons: 0,
        window_rejections: 0,
    };

    if !config.enabled {
        let passthrough = items
            .iter()
            .map(|item| StoryPrimary {
                story_id: keys::singleton_story_id(item),
                item: item.clone(),
                is_primary: true,
                cluster_size: 1,
                key_strategy: None,
                dedupe_reason: "clustering_disabled".to_string(),
                other_sources: Vec::new(),
            })
            .collect();
        explain.clusters = items.len();
        return (passthrough, explain);
    }

    let window = Duration::hours(config.window_hours);
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut registry: HashMap<String, usize> = HashMap::new();

    for (idx, item) in items.iter().enumerate() {
        // All applicable (strategy, key-hash) candidates, in strategy order.
        let candidates: Vec<(KeyStrategy, String)> = config
            .key_strategies
            .iter()
            .filter_map(|s| keys::key_for(item, *s).map(|value| (*s, keys::hash_key(&value))))
            .collect();
        let ts = item.published_at.or(item.first_seen_at);

        let mut target: Option<usize> = None;
        for (strategy, key_hash) in &candidates {
            let reg_key = keys::registry_key(*strategy, key_hash);
            if let Some(&bucket_idx) = registry.get(&reg_key) {
                if within_window(&buckets[bucket_idx], ts, window) {
                    target = Some(bucket_idx);
                    break;
                }
                explain.window_rejections += 1;
            }
        }

        let bucket_idx = match target {
            Some(bucket_idx) => {
                let bucket = &mut buckets[bucket_idx];
                bucket.members.push(idx);
                fold_ts(bucket, ts);
                bucket_idx
            }
            None => {
                let bucket = match candidates.first() {
                    Some((strategy, key_hash)) => Bucket {
                        story_id: keys::story_id(*strategy, key_hash),
                        strategy: Some(*strategy),
                        members: vec![idx],
                        min_ts: ts,
                        max_ts: ts,
                    },
                    None => {
                        explain.singletons += 1;
                        Bucket {
                            story_id: keys::singleton_story_id(item),
                            strategy: None,
                            members: vec![idx],
                            min_ts: ts,
                            max_ts: ts,
                        }
                    }
                };
                buckets.push(bucket);
                buckets.len() - 1
            }
        };

        // Register every candidate key as an alias. First registration wins,
        // so an alias never silently moves between clusters mid-batch.
        for (strategy, key_hash) in &candidates {
            registry
                .entry(keys::registry_key(*strategy, key_hash))
                .or_insert(bucket_idx);
        }
    }

    explain.clusters = buckets.len();
    debug!(
        target: TARGET_PIPELINE,
        "clustered {} items into {} stories ({} singletons, {} window rejections)",
        items.len(),
        buckets.len(),
        explain.singletons,
        explain.window_rejections
    );

    let stories = buckets
        .iter()
        .map(|bucket| build_story(bucket, items, config, priorities))
        .collect();
    (stories, explain)
}

fn build_story(
    bucket: &Bucket,
    items: &[ClusterItem],
    config: &ClusterConfig,
    priorities: &HashMap<String, i64>,
) -> StoryPrimary {
    let mut members = bucket.members.clone();
    members.sort_by(|&a, &b| compare_members(&items[a], &items[b], config, priorities));

    let primary = &items[members[0]];
    let mut others: Vec<&ClusterItem> = members[1..].iter().map(|&i| &items[i]).collect();
    others.sort_by(|a, b| {
        effective_priority(b, priorities).cmp(&effective_priority(a, priorities))
    });

    let dedupe_reason = match bucket.strategy {
        Some(strategy) => format!("{} within {}h", strategy.as_str(), config.window_hours),
        None => "no_identity_key".to_string(),
    };

    StoryPrimary {
        story_id: bucket.story_id.clone(),
        item: primary.clone(),
        is_primary: true,
        cluster_size: bucket.members.len(),
        key_strategy: bucket.strategy,
        dedupe_reason,
        other_sources: others
            .into_iter()
            .take(config.max_other_sources)
            .map(|member| OtherSource {
                source_key: member.source_key.clone(),
                title: member.title.clone(),
                url: member.url.clone(),
                published_at: member.published_at,
                source_priority: effective_priority(member, priorities),
            })
            .collect(),
    }
}

/// Applies the configured primary-selection criteria in sequence, ties
/// falling through; the final tie-break is ascending title.
fn compare_members(
    a: &ClusterItem,
    b: &ClusterItem,
    config: &ClusterConfig,
    priorities: &HashMap<String, i64>,
) -> Ordering {
    for criterion in &config.primary_select {
        let ord = match criterion {
            PrimarySelect::SourcePriority => {
                effective_priority(b, priorities).cmp(&effective_priority(a, priorities))
            }
            PrimarySelect::EvidenceGrade => {
                b.evidence_grade.unwrap_or(0).cmp(&a.evidence_grade.unwrap_or(0))
            }
            PrimarySelect::PublishedAtLatest => cmp_ts_desc(a.published_at, b.published_at),
            PrimarySelect::PublishedAtEarliest => cmp_ts_asc(a.published_at, b.published_at),
            PrimarySelect::FirstSeenEarliest => cmp_ts_asc(a.first_seen_at, b.first_seen_at),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.title.cmp(&b.title)
}

/// Explicit per-item value, else source-key lookup, else the generic default.
fn effective_priority(item: &ClusterItem, priorities: &HashMap<String, i64>) -> i64 {
    item.source_priority
        .or_else(|| priorities.get(&item.source_key).copied())
        .unwrap_or(DEFAULT_SOURCE_PRIORITY)
}

/// Checks that admitting a member at `ts` keeps the cluster span within the
/// window. Members without a resolvable timestamp never extend the span.
fn within_window(bucket: &Bucket, ts: Option<DateTime<Utc>>, window: Duration) -> bool {
    let ts = match ts {
        Some(ts) => ts,
        None => return true,
    };
    let (min_ts, max_ts) = match (bucket.min_ts, bucket.max_ts) {
        (Some(min_ts), Some(max_ts)) => (min_ts, max_ts),
        _ => return true,
    };
    max_ts.max(ts) - min_ts.min(ts) <= window
}

fn fold_ts(bucket: &mut Bucket, ts: Option<DateTime<Utc>>) {
    if let Some(ts) = ts {
        bucket.min_ts = Some(bucket.min_ts.map_or(ts, |m| m.min(ts)));
        bucket.max_ts = Some(bucket.max_ts.map_or(ts, |m| m.max(ts)));
    }
}

fn cmp_ts_desc(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_ts_asc(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
