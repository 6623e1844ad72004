//! Pending-review resolution service
//!
//! Builds the ordered review queue for a user, reconciling each entry
//! against deletions, moves, and the optional approval workflow.

use tracing::{instrument, warn};

use watch_core::entities::{DeletionInfo, PendingReviewEntry, PendingWatchRow};
use watch_core::value_objects::{PageIdentity, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Pending-review resolution service
pub struct PendingReviewResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PendingReviewResolver<'a> {
    /// Create a new PendingReviewResolver
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build the review queue for a user.
    ///
    /// Ordinary entries come back least-reviewed first, oldest-pending within
    /// ties. Approval work items from the collaborator are prepended ahead of
    /// all of them, regardless of their own recency.
    #[instrument(skip(self))]
    pub async fn pending_reviews(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<PendingReviewEntry>> {
        let mut entries = self.ctx.approval_provider().pending_approvals(user_id).await?;

        let rows = self
            .ctx
            .watch_store()
            .pending_watch_rows(user_id, limit, offset)
            .await?;

        for row in rows {
            entries.push(self.build_entry(row).await?);
        }

        Ok(entries)
    }

    /// Whether the user's review queue is old enough to warrant visual
    /// emphasis, judged by the age of their oldest pending change.
    #[instrument(skip(self))]
    pub async fn needs_emphasis(&self, user_id: UserId) -> ServiceResult<bool> {
        let stats = self.ctx.watch_store().user_watch_stats(user_id).await?;
        Ok(stats.max_pending_days() >= self.ctx.pending().emphasize_days)
    }

    /// Build the single pending entry for one watched page, backing the
    /// in-page review banner. `None` when the user has nothing pending there.
    #[instrument(skip(self))]
    pub async fn pending_review_for(
        &self,
        user_id: UserId,
        page: &PageIdentity,
    ) -> ServiceResult<Option<PendingReviewEntry>> {
        let Some(record) = self.ctx.watch_store().find_watch(user_id, page).await? else {
            return Ok(None);
        };
        let Some(pending_since) = record.notification_timestamp else {
            return Ok(None);
        };

        let page_id = self
            .ctx
            .page_store()
            .find_by_identity(page)
            .await?
            .map(|p| p.id);
        let num_other_reviewers = self.ctx.watch_store().reviewed_watcher_count(page).await?;

        let row = PendingWatchRow {
            page: page.clone(),
            page_id,
            notification_timestamp: pending_since,
            num_other_reviewers,
        };

        Ok(Some(self.build_entry(row).await?))
    }

    /// Resolve one pending row into its entry. Exactly one branch applies:
    /// the change window for a page that still exists, or the deletion-log
    /// reconstruction for one that does not.
    async fn build_entry(&self, row: PendingWatchRow) -> ServiceResult<PendingReviewEntry> {
        let since = row.notification_timestamp;

        if let Some(page_id) = row.page_id {
            let new_revisions = self
                .ctx
                .change_log_store()
                .revisions_since(page_id, since)
                .await?;
            let log_events = self
                .ctx
                .change_log_store()
                .log_events_since(page_id, since)
                .await?;

            return Ok(PendingReviewEntry {
                page: row.page,
                page_id: Some(page_id),
                notification_timestamp: Some(since),
                num_other_reviewers: row.num_other_reviewers,
                new_revisions,
                log_events,
                deletion_info: None,
                requires_approval: false,
            });
        }

        // Nothing resolvable at the watched identity: reconstruct what
        // happened from the deletion/move log instead of erroring out.
        let deletion_log = self
            .ctx
            .change_log_store()
            .deletion_log(&row.page, since)
            .await?;

        if deletion_log.is_empty() {
            warn!(page = %row.page, "Pending watch on a missing page with no deletion log");
        }

        Ok(PendingReviewEntry {
            page: row.page.clone(),
            page_id: None,
            notification_timestamp: Some(since),
            num_other_reviewers: row.num_other_reviewers,
            new_revisions: Vec::new(),
            log_events: Vec::new(),
            deletion_info: Some(DeletionInfo {
                deleted_page: row.page,
                deletion_log,
            }),
            requires_approval: false,
        })
    }
}
