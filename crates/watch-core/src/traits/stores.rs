//! Store traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs from the host platform's storage;
//! the infrastructure layer provides the implementation. Reads are expected
//! to hit a replica where one exists; mutating operations must go to the
//! primary so a write is never followed by a stale dependent read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    ClearCriteria, EngagementInputs, LogEvent, Page, PageWatchStats, PendingReviewEntry,
    PendingWatchRow, Revision, UserWatchStats, WatchRecord,
};
use crate::error::DomainError;
use crate::value_objects::{Namespace, PageId, PageIdentity, UserId};

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;

/// One page on a user's watchlist that currently exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedPage {
    pub page_id: PageId,
    pub identity: PageIdentity,
}

/// Watch and view counts for one suggestion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWatchViewStats {
    pub page_id: PageId,
    pub num_watches: i64,
    /// View-counter value; pages with no counter row report 1
    pub num_views: i64,
}

// ============================================================================
// Watch Store
// ============================================================================

#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Find the watch record for one user and page
    async fn find_watch(&self, user_id: UserId, page: &PageIdentity)
        -> StoreResult<Option<WatchRecord>>;

    /// All watch records for a page
    async fn watchers_of(&self, page: &PageIdentity) -> StoreResult<Vec<WatchRecord>>;

    /// All watch records for a page, read from the primary. Move
    /// reconciliation must see watches written moments before the move,
    /// which a lagging replica can still be missing.
    async fn watchers_of_latest(&self, page: &PageIdentity) -> StoreResult<Vec<WatchRecord>>;

    /// Count of watchers of a page who have reviewed the latest change
    async fn reviewed_watcher_count(&self, page: &PageIdentity) -> StoreResult<i64>;

    /// A user's pending watches, ordered ascending by other-reviewer count
    /// then ascending by notification timestamp, with pagination
    async fn pending_watch_rows(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<PendingWatchRow>>;

    /// Pending-watch aggregates for every user, in one grouped pass
    async fn pending_stats_by_user(&self) -> StoreResult<Vec<EngagementInputs>>;

    /// Watch statistics for one user
    async fn user_watch_stats(&self, user_id: UserId) -> StoreResult<UserWatchStats>;

    /// Watch statistics for every user, in one grouped pass
    async fn user_watch_stats_all(&self) -> StoreResult<Vec<UserWatchStats>>;

    /// Watch statistics for every watched page, in one grouped pass
    async fn page_watch_stats_all(&self) -> StoreResult<Vec<PageWatchStats>>;

    /// Pages a user watches that exist in the given namespace
    async fn user_watchlist(
        &self,
        user_id: UserId,
        namespace: Namespace,
    ) -> StoreResult<Vec<WatchedPage>>;

    /// Users ranked by number of watched non-redirect pages, descending
    async fn top_watchers(&self, limit: i64) -> StoreResult<Vec<(UserId, i64)>>;

    /// Upsert a batch of watch records keyed on `(user, namespace, title)`.
    /// The whole batch must become visible atomically, or not at all.
    async fn upsert_watches(&self, records: &[WatchRecord]) -> StoreResult<()>;

    /// Set or restore one watch's notification timestamp
    async fn set_notification(
        &self,
        user_id: UserId,
        page: &PageIdentity,
        timestamp: Option<DateTime<Utc>>,
    ) -> StoreResult<()>;

    /// Mark one watch as reviewed
    async fn clear_notification(&self, user_id: UserId, page: &PageIdentity) -> StoreResult<()>;

    /// Pending watches that a bulk clear with these criteria would touch.
    /// Read-only; used for previews and impact reporting.
    async fn find_clearable(&self, criteria: &ClearCriteria) -> StoreResult<Vec<WatchRecord>>;

    /// Clear every pending watch matching the criteria in a single statement,
    /// returning the number of rows cleared. No partial application.
    async fn clear_in_range(&self, criteria: &ClearCriteria) -> StoreResult<u64>;
}

// ============================================================================
// Page Store
// ============================================================================

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Find a page by `(namespace, title)`
    async fn find_by_identity(&self, identity: &PageIdentity) -> StoreResult<Option<Page>>;

    /// Find a page by row ID
    async fn find_by_id(&self, id: PageId) -> StoreResult<Option<Page>>;

    /// Row IDs of every page in a namespace
    async fn page_ids_in(&self, namespace: Namespace) -> StoreResult<Vec<PageId>>;

    /// Watch and view counts for a set of pages, ordered ascending by
    /// watch count. Pages without a view counter report 1 view.
    async fn watch_view_stats(&self, page_ids: &[PageId]) -> StoreResult<Vec<PageWatchViewStats>>;

    /// Whether host policy allows watching this identity at all
    async fn is_watchable(&self, identity: &PageIdentity) -> StoreResult<bool>;
}

// ============================================================================
// Change Log Store
// ============================================================================

#[async_trait]
pub trait ChangeLogStore: Send + Sync {
    /// Revisions of a page at or after the given time, oldest first
    async fn revisions_since(
        &self,
        page_id: PageId,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<Revision>>;

    /// Log events for a page at or after the given time, oldest first,
    /// excluding administrative kinds ([`crate::entities::EXCLUDED_LOG_KINDS`])
    async fn log_events_since(
        &self,
        page_id: PageId,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<LogEvent>>;

    /// Deletion/move log for an identity at or after the given time, oldest
    /// first, restricted to [`crate::entities::DELETION_LOG_KINDS`]
    async fn deletion_log(
        &self,
        identity: &PageIdentity,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<LogEvent>>;
}

// ============================================================================
// Link Graph Store
// ============================================================================

#[async_trait]
pub trait LinkGraphStore: Send + Sync {
    /// Every `(from, to)` page-link row whose source or target is in the set
    async fn links_touching(&self, page_ids: &[PageId]) -> StoreResult<Vec<(PageId, PageId)>>;
}

// ============================================================================
// Stats Store
// ============================================================================

/// Append-only snapshot tables behind the lazy state-recording pass
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn record_user_snapshots(&self, stats: &[UserWatchStats]) -> StoreResult<()>;

    async fn record_page_snapshots(&self, stats: &[PageWatchStats]) -> StoreResult<()>;
}

// ============================================================================
// Approval Provider (optional collaborator)
// ============================================================================

/// Capability interface for an external approval-workflow system.
///
/// Absence is represented by [`NoApprovals`], injected at construction time.
/// The core never probes for the collaborator at runtime.
#[async_trait]
pub trait ApprovalProvider: Send + Sync {
    /// Pages the user can approve that await approval
    async fn pending_approvals(&self, user_id: UserId) -> StoreResult<Vec<PendingReviewEntry>>;
}

/// No-op approval provider used when no approval workflow is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoApprovals;

#[async_trait]
impl ApprovalProvider for NoApprovals {
    async fn pending_approvals(&self, _user_id: UserId) -> StoreResult<Vec<PendingReviewEntry>> {
        Ok(Vec::new())
    }
}
