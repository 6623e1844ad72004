//! Revision and change-log table models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for one `revisions` row
#[derive(Debug, Clone, FromRow)]
pub struct RevisionModel {
    pub id: i64,
    pub page_id: i64,
    pub timestamp: DateTime<Utc>,
    pub actor_id: i64,
    pub comment: String,
}

/// Database model for one `change_log` row
#[derive(Debug, Clone, FromRow)]
pub struct LogEventModel {
    pub id: i64,
    pub kind: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub actor_id: i64,
    pub namespace: i32,
    pub title: String,
    pub page_id: Option<i64>,
    pub params: String,
    pub comment: String,
}
