//! PostgreSQL implementation of WatchStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use watch_core::entities::{
    ClearCriteria, EngagementInputs, PageWatchStats, PendingWatchRow, UserWatchStats, WatchRecord,
};
use watch_core::traits::{StoreResult, WatchStore, WatchedPage};
use watch_core::value_objects::{Namespace, PageId, PageIdentity, UserId};

use crate::models::{
    EngagementInputsModel, PageWatchStatsModel, PendingWatchRowModel, UserWatchStatsModel,
    WatchModel,
};
use crate::pool::StorePools;

use super::error::map_db_error;

/// PostgreSQL implementation of WatchStore
#[derive(Clone)]
pub struct PgWatchStore {
    pools: StorePools,
}

impl PgWatchStore {
    /// Create a new PgWatchStore
    pub fn new(pools: StorePools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl WatchStore for PgWatchStore {
    #[instrument(skip(self))]
    async fn find_watch(
        &self,
        user_id: UserId,
        page: &PageIdentity,
    ) -> StoreResult<Option<WatchRecord>> {
        let result = sqlx::query_as::<_, WatchModel>(
            r#"
            SELECT user_id, namespace, title, notification_timestamp
            FROM watches
            WHERE user_id = $1 AND namespace = $2 AND title = $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(page.namespace.into_inner())
        .bind(&page.title)
        .fetch_optional(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(result.map(WatchRecord::from))
    }

    #[instrument(skip(self))]
    async fn watchers_of(&self, page: &PageIdentity) -> StoreResult<Vec<WatchRecord>> {
        let results = sqlx::query_as::<_, WatchModel>(
            r#"
            SELECT user_id, namespace, title, notification_timestamp
            FROM watches
            WHERE namespace = $1 AND title = $2
            "#,
        )
        .bind(page.namespace.into_inner())
        .bind(&page.title)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(WatchRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn watchers_of_latest(&self, page: &PageIdentity) -> StoreResult<Vec<WatchRecord>> {
        let results = sqlx::query_as::<_, WatchModel>(
            r#"
            SELECT user_id, namespace, title, notification_timestamp
            FROM watches
            WHERE namespace = $1 AND title = $2
            "#,
        )
        .bind(page.namespace.into_inner())
        .bind(&page.title)
        .fetch_all(self.pools.writer())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(WatchRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn reviewed_watcher_count(&self, page: &PageIdentity) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM watches
            WHERE namespace = $1 AND title = $2 AND notification_timestamp IS NULL
            "#,
        )
        .bind(page.namespace.into_inner())
        .bind(&page.title)
        .fetch_one(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn pending_watch_rows(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<PendingWatchRow>> {
        let results = sqlx::query_as::<_, PendingWatchRowModel>(
            r#"
            SELECT
                p.id AS page_id,
                w.namespace,
                w.title,
                w.notification_timestamp,
                (SELECT COUNT(*) FROM watches r
                 WHERE r.namespace = w.namespace
                   AND r.title = w.title
                   AND r.notification_timestamp IS NULL) AS num_other_reviewers
            FROM watches w
            LEFT JOIN pages p ON p.namespace = w.namespace AND p.title = w.title
            WHERE w.user_id = $1 AND w.notification_timestamp IS NOT NULL
            ORDER BY num_other_reviewers ASC, w.notification_timestamp ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PendingWatchRow::from).collect())
    }

    #[instrument(skip(self))]
    async fn pending_stats_by_user(&self) -> StoreResult<Vec<EngagementInputs>> {
        let results = sqlx::query_as::<_, EngagementInputsModel>(
            r#"
            SELECT
                user_id,
                COUNT(notification_timestamp) AS pending_count,
                AVG(EXTRACT(EPOCH FROM (NOW() - notification_timestamp)) / 86400.0)::FLOAT8
                    AS avg_pending_age_days
            FROM watches
            GROUP BY user_id
            "#,
        )
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(EngagementInputs::from).collect())
    }

    #[instrument(skip(self))]
    async fn user_watch_stats(&self, user_id: UserId) -> StoreResult<UserWatchStats> {
        let result = sqlx::query_as::<_, UserWatchStatsModel>(
            r#"
            SELECT
                user_id,
                COUNT(*) AS num_watches,
                COUNT(notification_timestamp) AS num_pending,
                COALESCE(MAX(EXTRACT(EPOCH FROM (NOW() - notification_timestamp)) / 60.0), 0)::BIGINT
                    AS max_pending_minutes,
                COALESCE(AVG(EXTRACT(EPOCH FROM (NOW() - notification_timestamp)) / 60.0), 0)::FLOAT8
                    AS avg_pending_minutes
            FROM watches
            WHERE user_id = $1
            GROUP BY user_id
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_optional(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        // A user with no watch rows has well-defined empty stats.
        Ok(result.map_or_else(|| UserWatchStats::empty(user_id), UserWatchStats::from))
    }

    #[instrument(skip(self))]
    async fn user_watch_stats_all(&self) -> StoreResult<Vec<UserWatchStats>> {
        let results = sqlx::query_as::<_, UserWatchStatsModel>(
            r#"
            SELECT
                user_id,
                COUNT(*) AS num_watches,
                COUNT(notification_timestamp) AS num_pending,
                COALESCE(MAX(EXTRACT(EPOCH FROM (NOW() - notification_timestamp)) / 60.0), 0)::BIGINT
                    AS max_pending_minutes,
                COALESCE(AVG(EXTRACT(EPOCH FROM (NOW() - notification_timestamp)) / 60.0), 0)::FLOAT8
                    AS avg_pending_minutes
            FROM watches
            GROUP BY user_id
            "#,
        )
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(UserWatchStats::from).collect())
    }

    #[instrument(skip(self))]
    async fn page_watch_stats_all(&self) -> StoreResult<Vec<PageWatchStats>> {
        let results = sqlx::query_as::<_, PageWatchStatsModel>(
            r#"
            SELECT
                namespace,
                title,
                COUNT(*) AS num_watches,
                COUNT(*) FILTER (WHERE notification_timestamp IS NULL) AS num_reviewed,
                (COUNT(notification_timestamp) * 100.0 / COUNT(*))::FLOAT8 AS percent_pending,
                COALESCE(MAX(EXTRACT(EPOCH FROM (NOW() - notification_timestamp)) / 60.0), 0)::BIGINT
                    AS max_pending_minutes,
                COALESCE(AVG(EXTRACT(EPOCH FROM (NOW() - notification_timestamp)) / 60.0), 0)::FLOAT8
                    AS avg_pending_minutes
            FROM watches
            GROUP BY namespace, title
            "#,
        )
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PageWatchStats::from).collect())
    }

    #[instrument(skip(self))]
    async fn user_watchlist(
        &self,
        user_id: UserId,
        namespace: Namespace,
    ) -> StoreResult<Vec<WatchedPage>> {
        let rows: Vec<(i64, i32, String)> = sqlx::query_as(
            r#"
            SELECT p.id, p.namespace, p.title
            FROM watches w
            JOIN pages p ON p.namespace = w.namespace AND p.title = w.title
            WHERE w.user_id = $1 AND p.namespace = $2
            "#,
        )
        .bind(user_id.into_inner())
        .bind(namespace.into_inner())
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, ns, title)| WatchedPage {
                page_id: PageId::new(id),
                identity: PageIdentity::new(Namespace::new(ns), title),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn top_watchers(&self, limit: i64) -> StoreResult<Vec<(UserId, i64)>> {
        // Redirects and the anonymous/maintenance pseudo-user don't count.
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT w.user_id, COUNT(*) AS num_watches
            FROM watches w
            JOIN pages p ON p.namespace = w.namespace AND p.title = w.title
            WHERE p.is_redirect = FALSE AND w.user_id <> 0
            GROUP BY w.user_id
            ORDER BY num_watches DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, count)| (UserId::new(user_id), count))
            .collect())
    }

    #[instrument(skip(self, records))]
    async fn upsert_watches(&self, records: &[WatchRecord]) -> StoreResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let user_ids: Vec<i64> = records.iter().map(|r| r.user_id.into_inner()).collect();
        let namespaces: Vec<i32> = records
            .iter()
            .map(|r| r.page.namespace.into_inner())
            .collect();
        let titles: Vec<String> = records.iter().map(|r| r.page.title.clone()).collect();
        let timestamps: Vec<Option<DateTime<Utc>>> =
            records.iter().map(|r| r.notification_timestamp).collect();

        // One multi-row statement: the whole batch lands atomically.
        sqlx::query(
            r#"
            INSERT INTO watches (user_id, namespace, title, notification_timestamp)
            SELECT * FROM UNNEST($1::BIGINT[], $2::INT[], $3::TEXT[], $4::TIMESTAMPTZ[])
            ON CONFLICT (user_id, namespace, title)
            DO UPDATE SET notification_timestamp = EXCLUDED.notification_timestamp
            "#,
        )
        .bind(&user_ids)
        .bind(&namespaces)
        .bind(&titles)
        .bind(&timestamps)
        .execute(self.pools.writer())
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_notification(
        &self,
        user_id: UserId,
        page: &PageIdentity,
        timestamp: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE watches
            SET notification_timestamp = $4
            WHERE user_id = $1 AND namespace = $2 AND title = $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(page.namespace.into_inner())
        .bind(&page.title)
        .bind(timestamp)
        .execute(self.pools.writer())
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_notification(&self, user_id: UserId, page: &PageIdentity) -> StoreResult<()> {
        self.set_notification(user_id, page, None).await
    }

    #[instrument(skip(self))]
    async fn find_clearable(&self, criteria: &ClearCriteria) -> StoreResult<Vec<WatchRecord>> {
        let results = sqlx::query_as::<_, WatchModel>(
            r#"
            SELECT DISTINCT w.user_id, w.namespace, w.title, w.notification_timestamp
            FROM watches w
            WHERE w.notification_timestamp IS NOT NULL
              AND w.notification_timestamp > $1
              AND w.notification_timestamp < $2
              AND ($3::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM pages p
                    JOIN category_links c ON c.page_id = p.id
                    WHERE p.namespace = w.namespace AND p.title = w.title
                      AND c.category = $3))
              AND ($4::TEXT IS NULL OR w.title LIKE $4 || '%')
            "#,
        )
        .bind(criteria.start)
        .bind(criteria.end)
        .bind(criteria.category.as_deref())
        .bind(criteria.title_prefix.as_deref())
        .fetch_all(self.pools.writer())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(WatchRecord::from).collect())
    }

    #[instrument(skip(self))]
    async fn clear_in_range(&self, criteria: &ClearCriteria) -> StoreResult<u64> {
        // Single statement on the primary: all matching rows clear, or none.
        let result = sqlx::query(
            r#"
            UPDATE watches w
            SET notification_timestamp = NULL
            WHERE w.notification_timestamp IS NOT NULL
              AND w.notification_timestamp > $1
              AND w.notification_timestamp < $2
              AND ($3::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM pages p
                    JOIN category_links c ON c.page_id = p.id
                    WHERE p.namespace = w.namespace AND p.title = w.title
                      AND c.category = $3))
              AND ($4::TEXT IS NULL OR w.title LIKE $4 || '%')
            "#,
        )
        .bind(criteria.start)
        .bind(criteria.end)
        .bind(criteria.category.as_deref())
        .bind(criteria.title_prefix.as_deref())
        .execute(self.pools.writer())
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
