use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::Row;
use tracing::{debug, error, instrument};
use url::Url;
use urlnorm::UrlNormalizer;

use super::core::Database;
use super::{format_ts, parse_ts};
use crate::relevance::Classification;
use crate::TARGET_DB;

/// An incoming raw item, as handed over by a source fetcher.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub source_id: String,
    #[serde(default)]
    pub source_group: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trust_tier: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub evidence_grade: Option<i64>,
}

/// A raw item as stored, with any attached classification.
#[derive(Debug, Clone)]
pub struct StoredItem {
    pub id: i64,
    pub source_id: String,
    pub source_group: String,
    pub title: String,
    pub url: String,
    pub canonical_url: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub first_seen_at: Option<DateTime<Utc>>,
    pub trust_tier: Option<String>,
    pub event_type: Option<String>,
    pub region: Option<String>,
    pub priority: Option<i64>,
    pub evidence_grade: Option<i64>,
    pub track: Option<String>,
    pub level: Option<i64>,
}

impl Database {
    /// Adds or refreshes a raw item, keyed on its normalized URL. Re-fetches
    /// of the same article update the mutable columns but keep the original
    /// `first_seen_at`.
    ///
    /// # Returns
    /// * `Ok(id)` - The row id of the inserted or updated item
    /// * `Err` - If the URL is invalid or the insert fails
    #[instrument(target = "db_query", level = "debug", skip(self, item))]
    pub async fn add_item(&self, item: &NewItem) -> Result<i64, sqlx::Error> {
        let parsed_url = match Url::parse(&item.url) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(target: TARGET_DB, "Attempted to add an item with an invalid URL ({}): {}", item.url, e);
                return Err(sqlx::Error::Protocol("Invalid URL provided".into()));
            }
        };
        let normalizer = UrlNormalizer::default();
        let normalized_url = normalizer.compute_normalization_string(&parsed_url);
        let first_seen_at = format_ts(Utc::now());
        debug!(target: TARGET_DB, "Adding/updating item: {}", item.url);

        let (id,) = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO items
                (source_id, source_group, title, url, canonical_url, normalized_url,
                 summary, published_at, first_seen_at, trust_tier, event_type, region,
                 priority, evidence_grade)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(normalized_url) DO UPDATE SET
                source_id = excluded.source_id,
                source_group = excluded.source_group,
                title = excluded.title,
                url = excluded.url,
                canonical_url = excluded.canonical_url,
                summary = excluded.summary,
                published_at = excluded.published_at,
                trust_tier = excluded.trust_tier,
                event_type = excluded.event_type,
                region = excluded.region,
                priority = excluded.priority,
                evidence_grade = excluded.evidence_grade
            RETURNING id
            "#,
        )
        .bind(&item.source_id)
        .bind(&item.source_group)
        .bind(&item.title)
        .bind(&item.url)
        .bind(&item.canonical_url)
        .bind(&normalized_url)
        .bind(&item.summary)
        .bind(item.published_at.map(format_ts))
        .bind(&first_seen_at)
        .bind(&item.trust_tier)
        .bind(&item.event_type)
        .bind(&item.region)
        .bind(item.priority)
        .bind(item.evidence_grade)
        .fetch_one(self.pool())
        .await?;

        Ok(id)
    }

    /// Attaches a classification outcome to an item. The explain is stored
    /// as JSON so rule tuning can query what fired.
    pub async fn attach_classification(
        &self,
        item_id: i64,
        classification: &Classification,
    ) -> Result<(), sqlx::Error> {
        let explain = serde_json::to_string(&classification.explain)
            .unwrap_or_else(|_| "{}".to_string());
        sqlx::query(
            r#"
            UPDATE items
            SET track = ?1, level = ?2, explain = ?3, classified_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(classification.track.as_str())
        .bind(classification.level as i64)
        .bind(&explain)
        .bind(format_ts(Utc::now()))
        .bind(item_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Fetches the items whose effective timestamp falls inside the rebuild
    /// window, oldest first so clustering sees a stable input order.
    pub async fn fetch_items_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<StoredItem>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_id, source_group, title, url, canonical_url, summary,
                   published_at, first_seen_at, trust_tier, event_type, region,
                   priority, evidence_grade, track, level
            FROM items
            WHERE COALESCE(published_at, first_seen_at) >= ?1
            ORDER BY COALESCE(published_at, first_seen_at) ASC, id ASC
            "#,
        )
        .bind(format_ts(since))
        .fetch_all(self.pool())
        .await?;

        let items = rows
            .iter()
            .map(|row| StoredItem {
                id: row.get("id"),
                source_id: row.get("source_id"),
                source_group: row.get("source_group"),
                title: row.get("title"),
                url: row.get("url"),
                canonical_url: row.get("canonical_url"),
                summary: row.get("summary"),
                published_at: parse_ts(row.get("published_at")),
                first_seen_at: parse_ts(row.get("first_seen_at")),
                trust_tier: row.get("trust_tier"),
                event_type: row.get("event_type"),
                region: row.get("region"),
                priority: row.get("priority"),
                evidence_grade: row.get("evidence_grade"),
                track: row.get("track"),
                level: row.get("level"),
            })
            .collect();

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(url: &str, title: &str) -> NewItem {
        NewItem {
            source_id: "reuters".to_string(),
            source_group: "media".to_string(),
            title: title.to_string(),
            url: url.to_string(),
            canonical_url: None,
            summary: None,
            published_at: Some(Utc::now()),
            trust_tier: Some("A".to_string()),
            event_type: None,
            region: None,
            priority: None,
            evidence_grade: None,
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_on_normalized_url() {
        let db = Database::new(":memory:").await.unwrap();
        let first = db
            .add_item(&sample_item("https://example.com/story/1", "first title"))
            .await
            .unwrap();
        let second = db
            .add_item(&sample_item("https://example.com/story/1", "updated title"))
            .await
            .unwrap();
        assert_eq!(first, second);

        let items = db
            .fetch_items_since(Utc::now() - chrono::Duration::days(1))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "updated title");
    }

    #[tokio::test]
    async fn invalid_urls_are_rejected() {
        let db = Database::new(":memory:").await.unwrap();
        let result = db.add_item(&sample_item("not a url", "title")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn classification_attaches_and_survives_fetch() {
        let db = Database::new(":memory:").await.unwrap();
        let id = db
            .add_item(&sample_item("https://example.com/story/2", "assay news"))
            .await
            .unwrap();

        let classification = crate::relevance::classify(
            "FDA approves new IVD diagnostic assay",
            &crate::relevance::SourceMeta::default(),
            &crate::relevance::RuleConfig::default(),
        );
        db.attach_classification(id, &classification).await.unwrap();

        let items = db
            .fetch_items_since(Utc::now() - chrono::Duration::days(1))
            .await
            .unwrap();
        assert_eq!(items[0].track.as_deref(), Some("core"));
        assert!(items[0].level.unwrap() >= 3);
    }
}
