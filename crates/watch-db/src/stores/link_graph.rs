//! PostgreSQL implementation of LinkGraphStore

use async_trait::async_trait;
use tracing::instrument;

use watch_core::traits::{LinkGraphStore, StoreResult};
use watch_core::value_objects::PageId;

use crate::models::LinkRowModel;
use crate::pool::StorePools;

use super::error::map_db_error;

/// PostgreSQL implementation of LinkGraphStore
#[derive(Clone)]
pub struct PgLinkGraphStore {
    pools: StorePools,
}

impl PgLinkGraphStore {
    /// Create a new PgLinkGraphStore
    pub fn new(pools: StorePools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl LinkGraphStore for PgLinkGraphStore {
    #[instrument(skip(self, page_ids))]
    async fn links_touching(&self, page_ids: &[PageId]) -> StoreResult<Vec<(PageId, PageId)>> {
        if page_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = page_ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, LinkRowModel>(
            r#"
            SELECT from_page, to_page
            FROM page_links
            WHERE from_page = ANY($1) OR to_page = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results
            .into_iter()
            .map(|row| (PageId::new(row.from_page), PageId::new(row.to_page)))
            .collect())
    }
}
