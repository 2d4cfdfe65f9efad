use tracing::debug;

use super::core::Database;
use crate::TARGET_DB;

impl Database {
    pub(crate) async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_id TEXT NOT NULL,
                source_group TEXT NOT NULL DEFAULT '',
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                canonical_url TEXT,
                normalized_url TEXT NOT NULL UNIQUE,
                summary TEXT,
                published_at TEXT,
                first_seen_at TEXT NOT NULL,
                trust_tier TEXT,
                event_type TEXT,
                region TEXT,
                priority INTEGER,
                evidence_grade INTEGER,
                track TEXT,
                level INTEGER,
                explain TEXT,
                classified_at TEXT
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_items_published_at
            ON items (published_at)
            "#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stories (
                id INTEGER PRIMARY KEY,
                story_id TEXT NOT NULL,
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                source_id TEXT NOT NULL,
                source_group TEXT NOT NULL DEFAULT '',
                region TEXT,
                event_type TEXT,
                trust_tier TEXT,
                published_at TEXT,
                primary_priority INTEGER NOT NULL DEFAULT 0,
                sources_count INTEGER NOT NULL DEFAULT 1,
                dedupe_reason TEXT NOT NULL DEFAULT '',
                other_sources TEXT NOT NULL DEFAULT '[]',
                built_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_stories_published_at
            ON stories (published_at DESC, id DESC)
            "#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_stories_story_id
            ON stories (story_id)
            "#,
        )
        .execute(self.pool())
        .await?;

        debug!(target: TARGET_DB, "Schema initialized");
        Ok(())
    }
}
