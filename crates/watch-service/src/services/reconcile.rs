//! Page-move reconciliation service
//!
//! Carries watch state forward when a page is renamed.

use tracing::{info, instrument};

use watch_core::entities::WatchRecord;
use watch_core::value_objects::PageIdentity;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::maintenance::WatchStateRecorder;

/// Page-move reconciliation service
pub struct PageMoveReconciler<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PageMoveReconciler<'a> {
    /// Create a new PageMoveReconciler
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Carry every watch on `old` forward to `new`, copying each
    /// notification timestamp verbatim. A moved page must neither mark
    /// everyone as reviewed nor lose pending state.
    ///
    /// The whole batch is one idempotent upsert keyed on the new identity:
    /// applying the same move twice leaves the watch set unchanged, and the
    /// reconciled rows become visible together or not at all. The moved page
    /// gets a page-change snapshot once the copy has landed. Returns the
    /// number of watches carried forward.
    ///
    /// Watchers are read from the primary; a watch set moments before the
    /// move may not have reached the replica yet.
    #[instrument(skip(self))]
    pub async fn reconcile_move(
        &self,
        old: &PageIdentity,
        new: &PageIdentity,
    ) -> ServiceResult<usize> {
        let watchers = self.ctx.watch_store().watchers_of_latest(old).await?;

        let records: Vec<WatchRecord> = watchers
            .into_iter()
            .map(|w| WatchRecord {
                user_id: w.user_id,
                page: new.clone(),
                notification_timestamp: w.notification_timestamp,
            })
            .collect();

        self.ctx.watch_store().upsert_watches(&records).await?;
        WatchStateRecorder::new(self.ctx).record_page_change(new).await?;

        info!(old = %old, new = %new, watchers = records.len(), "Watches reconciled after move");
        Ok(records.len())
    }

    /// Reconcile a move that left a redirect behind. The redirect is a new
    /// page in its own right, so it gets its own page-change snapshot,
    /// independent of the watch copy.
    #[instrument(skip(self))]
    pub async fn reconcile_move_with_redirect(
        &self,
        old: &PageIdentity,
        new: &PageIdentity,
    ) -> ServiceResult<usize> {
        let carried = self.reconcile_move(old, new).await?;
        WatchStateRecorder::new(self.ctx).record_page_change(old).await?;
        Ok(carried)
    }
}
