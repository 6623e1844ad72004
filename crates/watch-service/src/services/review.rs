//! Review tracking service
//!
//! Determines a user's review status for a page and manages the
//! request-scoped review snapshot.

use tracing::{info, instrument};

use watch_core::entities::ReviewStatus;
use watch_core::value_objects::{PageIdentity, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Review state captured once at the start of a page view.
///
/// Platform mechanics may clear the pending flag asynchronously between the
/// initial read and any later point in the same request, so the snapshot is
/// taken once and never re-verified. "Being reviewed" is derived from the
/// initial status only; within one request a page already shown as pending
/// stays "being reviewed" even after the viewer marks it seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSnapshot {
    pub user_id: UserId,
    pub page: PageIdentity,
    /// Whether the view is a revision diff rather than the current page
    pub is_diff: bool,
    status: ReviewStatus,
}

impl ReviewSnapshot {
    /// The review status as of the start of the view
    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    /// Whether this view counts as the user reviewing the page
    pub fn is_being_reviewed(&self) -> bool {
        self.status.is_pending()
    }
}

/// Review tracking service
pub struct ReviewTracker<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReviewTracker<'a> {
    /// Create a new ReviewTracker
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Compute a user's review status for a page
    #[instrument(skip(self))]
    pub async fn status(&self, user_id: UserId, page: &PageIdentity) -> ServiceResult<ReviewStatus> {
        let record = self.ctx.watch_store().find_watch(user_id, page).await?;
        Ok(record.map_or(ReviewStatus::NotWatching, |r| r.review_status()))
    }

    /// Start a page view, capturing the review snapshot for the request.
    ///
    /// Returns `None` when the page cannot be watched at all, in which case
    /// the caller skips review handling for the whole view.
    #[instrument(skip(self))]
    pub async fn begin_view(
        &self,
        user_id: UserId,
        page: &PageIdentity,
        is_diff: bool,
    ) -> ServiceResult<Option<ReviewSnapshot>> {
        if !self.ctx.page_store().is_watchable(page).await? {
            return Ok(None);
        }

        let status = self.status(user_id, page).await?;
        Ok(Some(ReviewSnapshot {
            user_id,
            page: page.clone(),
            is_diff,
            status,
        }))
    }

    /// Mark the page as reviewed, clearing the pending flag on the primary
    /// store
    #[instrument(skip(self, snapshot))]
    pub async fn mark_reviewed(&self, snapshot: &ReviewSnapshot) -> ServiceResult<()> {
        self.ctx
            .watch_store()
            .clear_notification(snapshot.user_id, &snapshot.page)
            .await?;

        info!(user_id = %snapshot.user_id, page = %snapshot.page, "Review recorded");
        Ok(())
    }

    /// Restore the pending state captured in the snapshot, undoing a review
    #[instrument(skip(self, snapshot))]
    pub async fn unreview(&self, snapshot: &ReviewSnapshot) -> ServiceResult<()> {
        self.ctx
            .watch_store()
            .set_notification(
                snapshot.user_id,
                &snapshot.page,
                snapshot.status.pending_since(),
            )
            .await?;

        info!(user_id = %snapshot.user_id, page = %snapshot.page, "Review undone");
        Ok(())
    }
}
