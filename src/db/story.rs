use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::{debug, info};

use super::core::Database;
use super::{format_ts, parse_ts};
use crate::feed::{FeedFilter, FeedRecord};
use crate::TARGET_DB;

/// One row of the feed's read model: a cluster primary plus its attached
/// duplicate detail, flattened for serving.
#[derive(Debug, Clone)]
pub struct StoryRow {
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
    pub dedupe_reason: String,
    pub other_sources_json: String,
}

impl Database {
    /// Replaces the feed's read model with the output of a rebuild run.
    /// Runs in one transaction; rebuilds are externally serialized
    /// (single active job), so there is no concurrent writer to race.
    pub async fn replace_stories(&self, rows: &[StoryRow]) -> Result<(), sqlx::Error> {
        let built_at = format_ts(Utc::now());
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM stories").execute(&mut *tx).await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO stories
                    (id, story_id, title, url, source_id, source_group, region,
                     event_type, trust_tier, published_at, primary_priority,
                     sources_count, dedupe_reason, other_sources, built_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
                "#,
            )
            .bind(row.id)
            .bind(&row.story_id)
            .bind(&row.title)
            .bind(&row.url)
            .bind(&row.source_id)
            .bind(&row.source_group)
            .bind(&row.region)
            .bind(&row.event_type)
            .bind(&row.trust_tier)
            .bind(row.published_at.map(format_ts))
            .bind(row.primary_priority)
            .bind(row.sources_count)
            .bind(&row.dedupe_reason)
            .bind(&row.other_sources_json)
            .bind(&built_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(target: TARGET_DB, "Replaced stories table with {} rows", rows.len());
        Ok(())
    }

    /// Fetches the bounded candidate set for a feed query, filters applied
    /// in SQL, ordered newest first. Ranking and cursors are applied above
    /// this layer.
    pub async fn fetch_story_candidates(
        &self,
        filter: &FeedFilter,
        cap: usize,
    ) -> Result<Vec<FeedRecord>, sqlx::Error> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, story_id, title, url, source_id, source_group, region, \
             event_type, trust_tier, published_at, primary_priority, sources_count \
             FROM stories WHERE 1=1",
        );
        if let Some(group) = &filter.source_group {
            builder.push(" AND source_group = ").push_bind(group.clone());
        }
        if let Some(region) = &filter.region {
            builder.push(" AND region = ").push_bind(region.clone());
        }
        if let Some(event_type) = &filter.event_type {
            builder.push(" AND event_type = ").push_bind(event_type.clone());
        }
        if let Some(trust_tier) = &filter.trust_tier {
            builder.push(" AND trust_tier = ").push_bind(trust_tier.clone());
        }
        if let Some(source_id) = &filter.source_id {
            builder.push(" AND source_id = ").push_bind(source_id.clone());
        }
        if let Some(title) = &filter.title_contains {
            builder
                .push(" AND lower(title) LIKE ")
                .push_bind(format!("%{}%", title.to_lowercase()));
        }
        if let Some(from) = filter.published_from {
            builder.push(" AND published_at >= ").push_bind(format_ts(from));
        }
        if let Some(until) = filter.published_until {
            builder.push(" AND published_at <= ").push_bind(format_ts(until));
        }
        if let Some(since) = filter.since {
            builder.push(" AND published_at > ").push_bind(format_ts(since));
        }
        builder
            .push(" ORDER BY published_at DESC, id DESC LIMIT ")
            .push_bind(cap as i64);

        let rows = builder.build().fetch_all(self.pool()).await?;
        debug!(target: TARGET_DB, "Story candidate fetch returned {} rows", rows.len());

        let records = rows
            .iter()
            .map(|row| FeedRecord {
                id: row.get("id"),
                story_id: row.get("story_id"),
                title: row.get("title"),
                url: row.get("url"),
                source_id: row.get("source_id"),
                source_group: row.get("source_group"),
                region: row.get("region"),
                event_type: row.get("event_type"),
                trust_tier: row.get("trust_tier"),
                published_at: parse_ts(row.get("published_at")),
                primary_priority: row.get("primary_priority"),
                sources_count: row.get("sources_count"),
            })
            .collect();

        Ok(records)
    }
}
