//! PostgreSQL implementation of StatsStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use watch_core::entities::{PageWatchStats, UserWatchStats};
use watch_core::traits::{StatsStore, StoreResult};

use crate::pool::StorePools;

use super::error::map_db_error;

/// PostgreSQL implementation of StatsStore
///
/// Snapshots append to history tables; nothing is ever updated in place.
#[derive(Clone)]
pub struct PgStatsStore {
    pools: StorePools,
}

impl PgStatsStore {
    /// Create a new PgStatsStore
    pub fn new(pools: StorePools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl StatsStore for PgStatsStore {
    #[instrument(skip(self, stats))]
    async fn record_user_snapshots(&self, stats: &[UserWatchStats]) -> StoreResult<()> {
        if stats.is_empty() {
            return Ok(());
        }

        let recorded_at = Utc::now();
        let user_ids: Vec<i64> = stats.iter().map(|s| s.user_id.into_inner()).collect();
        let num_watches: Vec<i64> = stats.iter().map(|s| s.num_watches).collect();
        let num_pending: Vec<i64> = stats.iter().map(|s| s.num_pending).collect();
        let max_minutes: Vec<i64> = stats.iter().map(|s| s.max_pending_minutes).collect();
        let avg_minutes: Vec<f64> = stats.iter().map(|s| s.avg_pending_minutes).collect();

        sqlx::query(
            r#"
            INSERT INTO user_watch_snapshots
                (user_id, num_watches, num_pending, max_pending_minutes,
                 avg_pending_minutes, recorded_at)
            SELECT user_id, num_watches, num_pending, max_pending_minutes,
                   avg_pending_minutes, $6
            FROM UNNEST($1::BIGINT[], $2::BIGINT[], $3::BIGINT[], $4::BIGINT[], $5::FLOAT8[])
                AS t(user_id, num_watches, num_pending, max_pending_minutes, avg_pending_minutes)
            "#,
        )
        .bind(&user_ids)
        .bind(&num_watches)
        .bind(&num_pending)
        .bind(&max_minutes)
        .bind(&avg_minutes)
        .bind(recorded_at)
        .execute(self.pools.writer())
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, stats))]
    async fn record_page_snapshots(&self, stats: &[PageWatchStats]) -> StoreResult<()> {
        if stats.is_empty() {
            return Ok(());
        }

        let recorded_at: DateTime<Utc> = Utc::now();
        let namespaces: Vec<i32> = stats.iter().map(|s| s.page.namespace.into_inner()).collect();
        let titles: Vec<String> = stats.iter().map(|s| s.page.title.clone()).collect();
        let num_watches: Vec<i64> = stats.iter().map(|s| s.num_watches).collect();
        let num_reviewed: Vec<i64> = stats.iter().map(|s| s.num_reviewed).collect();
        let percent_pending: Vec<f64> = stats.iter().map(|s| s.percent_pending).collect();
        let max_minutes: Vec<i64> = stats.iter().map(|s| s.max_pending_minutes).collect();
        let avg_minutes: Vec<f64> = stats.iter().map(|s| s.avg_pending_minutes).collect();

        sqlx::query(
            r#"
            INSERT INTO page_watch_snapshots
                (namespace, title, num_watches, num_reviewed, percent_pending,
                 max_pending_minutes, avg_pending_minutes, recorded_at)
            SELECT namespace, title, num_watches, num_reviewed, percent_pending,
                   max_pending_minutes, avg_pending_minutes, $8
            FROM UNNEST($1::INT[], $2::TEXT[], $3::BIGINT[], $4::BIGINT[],
                        $5::FLOAT8[], $6::BIGINT[], $7::FLOAT8[])
                AS t(namespace, title, num_watches, num_reviewed, percent_pending,
                     max_pending_minutes, avg_pending_minutes)
            "#,
        )
        .bind(&namespaces)
        .bind(&titles)
        .bind(&num_watches)
        .bind(&num_reviewed)
        .bind(&percent_pending)
        .bind(&max_minutes)
        .bind(&avg_minutes)
        .bind(recorded_at)
        .execute(self.pools.writer())
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgStatsStore>();
    }
}
