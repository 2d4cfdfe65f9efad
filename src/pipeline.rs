//! Batch jobs tying the pipeline stages together.
//!
//! `rebuild` is the single-writer job the clusterer contract assumes: it
//! classifies the current item window, clusters the keepers, and atomically
//! replaces the feed's read model. Concurrent rebuilds over the same window
//! must be serialized by the scheduler that invokes this.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::cluster::{self, ClusterItem, StoryPrimary};
use crate::config::AppConfig;
use crate::db::{Database, NewItem, StoredItem, StoryRow};
use crate::relevance::{classify, SourceMeta, Track};
use crate::TARGET_PIPELINE;

#[derive(Debug, Clone, Serialize)]
pub struct RebuildStats {
    pub items_seen: usize,
    pub kept: usize,
    pub dropped: usize,
    pub stories: usize,
}

/// Loads raw items from a JSON file (an array of item objects) and upserts
/// them into the store. Stands in for the out-of-scope source fetchers.
pub async fn ingest_file(db: &Database, path: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let items: Vec<NewItem> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut added = 0;
    for item in &items {
        match db.add_item(item).await {
            Ok(_) => added += 1,
            Err(err) => {
                warn!(target: TARGET_PIPELINE, "Skipping item {}: {}", item.url, err)
            }
        }
    }
    info!(
        target: TARGET_PIPELINE,
        "Ingested {}/{} items from {}",
        added,
        items.len(),
        path.display()
    );
    Ok(added)
}

/// Classifies the item window, clusters the keepers, and replaces the story
/// read model.
pub async fn rebuild(db: &Database, config: &AppConfig, now: DateTime<Utc>) -> Result<RebuildStats> {
    let since = now - Duration::hours(config.cluster.window_hours);
    let items = db.fetch_items_since(since).await?;

    let mut candidates: Vec<ClusterItem> = Vec::new();
    let mut by_id: HashMap<i64, StoredItem> = HashMap::new();
    let mut dropped = 0;

    for item in &items {
        let meta = SourceMeta {
            title: item.title.clone(),
            url: item.url.clone(),
            source_group: item.source_group.clone(),
            event_type: item.event_type.clone().unwrap_or_default(),
            source_id: item.source_id.clone(),
        };
        let text = item.summary.as_deref().unwrap_or(&item.title);
        let classification = classify(text, &meta, &config.rules);
        db.attach_classification(item.id, &classification).await?;

        if classification.track == Track::Drop {
            dropped += 1;
            continue;
        }
        candidates.push(ClusterItem {
            id: item.id,
            title: item.title.clone(),
            url: item.url.clone(),
            canonical_url: item.canonical_url.clone(),
            published_at: item.published_at,
            first_seen_at: item.first_seen_at,
            source_key: item.source_id.clone(),
            source_priority: item.priority,
            evidence_grade: item.evidence_grade,
        });
        by_id.insert(item.id, item.clone());
    }

    let (stories, explain) =
        cluster::cluster(&candidates, &config.cluster, &config.source_priorities);
    let rows: Vec<StoryRow> = stories
        .iter()
        .map(|story| story_row(story, &by_id, &config.source_priorities))
        .collect();
    db.replace_stories(&rows).await?;

    info!(
        target: TARGET_PIPELINE,
        "Rebuild complete: {} items in, {} kept, {} dropped, {} stories ({} window rejections)",
        items.len(),
        candidates.len(),
        dropped,
        rows.len(),
        explain.window_rejections
    );
    Ok(RebuildStats {
        items_seen: items.len(),
        kept: candidates.len(),
        dropped,
        stories: rows.len(),
    })
}

fn story_row(
    story: &StoryPrimary,
    by_id: &HashMap<i64, StoredItem>,
    priorities: &HashMap<String, i64>,
) -> StoryRow {
    let stored = by_id.get(&story.item.id);
    let primary_priority = story
        .item
        .source_priority
        .or_else(|| priorities.get(&story.item.source_key).copied())
        .unwrap_or(cluster::DEFAULT_SOURCE_PRIORITY);
    StoryRow {
        id: story.item.id,
        story_id: story.story_id.clone(),
        title: story.item.title.clone(),
        url: story.item.url.clone(),
        source_id: story.item.source_key.clone(),
        source_group: stored.map(|s| s.source_group.clone()).unwrap_or_default(),
        region: stored.and_then(|s| s.region.clone()),
        event_type: stored.and_then(|s| s.event_type.clone()),
        trust_tier: stored.and_then(|s| s.trust_tier.clone()),
        published_at: story.item.published_at,
        primary_priority,
        sources_count: story.cluster_size as i64,
        dedupe_reason: story.dedupe_reason.clone(),
        other_sources_json: serde_json::to_string(&story.other_sources)
            .unwrap_or_else(|_| "[]".to_string()),
    }
}
