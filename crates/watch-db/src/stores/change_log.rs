//! PostgreSQL implementation of ChangeLogStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;

use watch_core::entities::{LogEvent, Revision, DELETION_LOG_KINDS, EXCLUDED_LOG_KINDS};
use watch_core::traits::{ChangeLogStore, StoreResult};
use watch_core::value_objects::{PageId, PageIdentity};

use crate::models::{LogEventModel, RevisionModel};
use crate::pool::StorePools;

use super::error::map_db_error;

/// PostgreSQL implementation of ChangeLogStore
#[derive(Clone)]
pub struct PgChangeLogStore {
    pools: StorePools,
}

impl PgChangeLogStore {
    /// Create a new PgChangeLogStore
    pub fn new(pools: StorePools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl ChangeLogStore for PgChangeLogStore {
    #[instrument(skip(self))]
    async fn revisions_since(
        &self,
        page_id: PageId,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<Revision>> {
        let results = sqlx::query_as::<_, RevisionModel>(
            r#"
            SELECT id, page_id, timestamp, actor_id, comment
            FROM revisions
            WHERE page_id = $1 AND timestamp >= $2
            ORDER BY timestamp ASC
            "#,
        )
        .bind(page_id.into_inner())
        .bind(since)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Revision::from).collect())
    }

    #[instrument(skip(self))]
    async fn log_events_since(
        &self,
        page_id: PageId,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<LogEvent>> {
        let excluded: Vec<String> = EXCLUDED_LOG_KINDS.iter().map(|k| (*k).to_owned()).collect();

        let results = sqlx::query_as::<_, LogEventModel>(
            r#"
            SELECT id, kind, action, timestamp, actor_id, namespace, title,
                   page_id, params, comment
            FROM change_log
            WHERE page_id = $1 AND timestamp >= $2 AND kind <> ALL($3)
            ORDER BY timestamp ASC
            "#,
        )
        .bind(page_id.into_inner())
        .bind(since)
        .bind(&excluded)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(LogEvent::from).collect())
    }

    #[instrument(skip(self))]
    async fn deletion_log(
        &self,
        identity: &PageIdentity,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<LogEvent>> {
        let kinds: Vec<String> = DELETION_LOG_KINDS.iter().map(|k| (*k).to_owned()).collect();

        let results = sqlx::query_as::<_, LogEventModel>(
            r#"
            SELECT id, kind, action, timestamp, actor_id, namespace, title,
                   page_id, params, comment
            FROM change_log
            WHERE namespace = $1 AND title = $2 AND timestamp >= $3 AND kind = ANY($4)
            ORDER BY timestamp ASC
            "#,
        )
        .bind(identity.namespace.into_inner())
        .bind(&identity.title)
        .bind(since)
        .bind(&kinds)
        .fetch_all(self.pools.reader())
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(LogEvent::from).collect())
    }
}
