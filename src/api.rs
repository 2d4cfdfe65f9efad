//! The feed-serving HTTP surface.
//!
//! A thin adapter over [`crate::feed::query`]: query parameters map onto the
//! feed filter, the cursor passes through opaquely, and store failures are
//! the only hard errors surfaced to callers.

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::db::Database;
use crate::feed::{self, FeedFilter, FeedMode, FeedPage};

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub mode: Option<String>,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
    pub group: Option<String>,
    pub region: Option<String>,
    pub event_type: Option<String>,
    pub trust_tier: Option<String>,
    pub source_id: Option<String>,
    pub q: Option<String>,
    pub published_from: Option<String>,
    pub published_until: Option<String>,
    pub since: Option<String>,
}

/// Main serving loop for the feed API.
pub async fn serve(db: Database, port: u16) -> Result<()> {
    let app = Router::new()
        .route("/feed", get(feed_handler))
        .route("/status", get(status_check))
        .with_state(db);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Feed API listening on http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn status_check() -> &'static str {
    "OK"
}

async fn feed_handler(
    State(db): State<Database>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedPage>, StatusCode> {
    let mode = match params.mode.as_deref() {
        None => FeedMode::Latest,
        Some(raw) => match FeedMode::from_str(raw) {
            Some(mode) => mode,
            None => {
                warn!("Unknown feed mode requested: {}", raw);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
    };
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let filter = FeedFilter {
        source_group: params.group,
        region: params.region,
        event_type: params.event_type,
        trust_tier: params.trust_tier,
        source_id: params.source_id,
        title_contains: params.q,
        published_from: parse_param_ts(params.published_from.as_deref()),
        published_until: parse_param_ts(params.published_until.as_deref()),
        since: parse_param_ts(params.since.as_deref()),
    };

    match feed::query(
        &db,
        &filter,
        mode,
        params.cursor.as_deref(),
        limit,
        Utc::now(),
    )
    .await
    {
        Ok(page) => Ok(Json(page)),
        Err(err) => {
            warn!("Feed query failed: {:#?}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Unparseable timestamp filters are ignored rather than rejected, matching
/// the cursor policy: feed consumers get a wider result set, not an error.
fn parse_param_ts(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(_) => {
            warn!("Ignoring unparseable timestamp filter: {}", raw);
            None
        }
    }
}
