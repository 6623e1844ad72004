//! PostgreSQL implementation of PageStore

use async_trait::async_trait;
use tracing::instrument;

use watch_core::entities::Page;
use watch_core::traits::{PageStore, PageWatchViewStats, StoreResult};
use watch_core::value_objects::{Namespace, PageId, PageIdentity};

use crate::models::{PageModel, PageWatchViewStatsModel};
use crate::pool::StorePools;

use super::error::map_db_error;

/// PostgreSQL implementation of PageStore
#[derive(Clone)]
pub struct PgPageStore {
    pools: StorePools,
}

impl PgPageStore {
    /// Create a new PgPageStore
    pub fn new(pools: StorePools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    #[instrument(skip(self))]
    async fn find_by_identity(&self, identity: &PageIdentity) -> StoreResult<Option<Page>> {
        let result = sqlx::query_as::<_, PageModel>(
            r#"
            SELECT id, namespace, title, is_redirect, view_count
            FROM pages
            WHERE namespace = $1 AND title = $2
            "#,
        )
        .bind(identity.namespace.into_inner())
        .bind(&identity.title)
        .fetch_optional(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Page::from))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PageId) -> StoreResult<Option<Page>> {
        let result = sqlx::query_as::<_, PageModel>(
            r#"
            SELECT id, namespace, title, is_redirect, view_count
            FROM pages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Page::from))
    }

    #[instrument(skip(self))]
    async fn page_ids_in(&self, namespace: Namespace) -> StoreResult<Vec<PageId>> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM pages WHERE namespace = $1
            "#,
        )
        .bind(namespace.into_inner())
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id,)| PageId::new(id)).collect())
    }

    #[instrument(skip(self, page_ids))]
    async fn watch_view_stats(&self, page_ids: &[PageId]) -> StoreResult<Vec<PageWatchViewStats>> {
        if page_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = page_ids.iter().map(|id| id.into_inner()).collect();

        // Pages without a view counter row report 1 view, never 0.
        let results = sqlx::query_as::<_, PageWatchViewStatsModel>(
            r#"
            SELECT
                p.id AS page_id,
                (SELECT COUNT(*) FROM watches w
                 WHERE w.namespace = p.namespace AND w.title = p.title) AS num_watches,
                GREATEST(p.view_count, 1) AS num_views
            FROM pages p
            WHERE p.id = ANY($1)
            ORDER BY num_watches ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PageWatchViewStats::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_watchable(&self, identity: &PageIdentity) -> StoreResult<bool> {
        // Virtual namespaces (negative) have no watch rows.
        Ok(identity.namespace.into_inner() >= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPageStore>();
    }
}
