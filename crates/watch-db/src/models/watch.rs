//! Watch table models and aggregate row shapes

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for one `watches` row
#[derive(Debug, Clone, FromRow)]
pub struct WatchModel {
    pub user_id: i64,
    pub namespace: i32,
    pub title: String,
    pub notification_timestamp: Option<DateTime<Utc>>,
}

impl WatchModel {
    /// Check if the watcher has unreviewed changes
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.notification_timestamp.is_some()
    }
}

/// One pending watch projected for review-queue building
#[derive(Debug, Clone, FromRow)]
pub struct PendingWatchRowModel {
    pub page_id: Option<i64>,
    pub namespace: i32,
    pub title: String,
    pub notification_timestamp: DateTime<Utc>,
    pub num_other_reviewers: i64,
}

/// Per-user pending aggregates from the grouped engagement pass
#[derive(Debug, Clone, FromRow)]
pub struct EngagementInputsModel {
    pub user_id: i64,
    pub pending_count: i64,
    pub avg_pending_age_days: Option<f64>,
}

/// Per-user watch statistics row
#[derive(Debug, Clone, FromRow)]
pub struct UserWatchStatsModel {
    pub user_id: i64,
    pub num_watches: i64,
    pub num_pending: i64,
    pub max_pending_minutes: i64,
    pub avg_pending_minutes: f64,
}

/// Per-page watch statistics row
#[derive(Debug, Clone, FromRow)]
pub struct PageWatchStatsModel {
    pub namespace: i32,
    pub title: String,
    pub num_watches: i64,
    pub num_reviewed: i64,
    pub percent_pending: f64,
    pub max_pending_minutes: i64,
    pub avg_pending_minutes: f64,
}
