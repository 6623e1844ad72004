//! Watch entities - watch records, review status, and pending-row projections

use chrono::{DateTime, Utc};

use crate::value_objects::{PageIdentity, UserId};

/// A user's subscription to a page.
///
/// `notification_timestamp` carries the review state: `None` means the user
/// has seen the latest known change, `Some(ts)` means changes have been
/// pending since `ts`. `(user_id, namespace, title)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRecord {
    pub user_id: UserId,
    pub page: PageIdentity,
    pub notification_timestamp: Option<DateTime<Utc>>,
}

impl WatchRecord {
    /// Create a watch with no pending changes
    pub fn reviewed(user_id: UserId, page: PageIdentity) -> Self {
        Self {
            user_id,
            page,
            notification_timestamp: None,
        }
    }

    /// Create a watch with changes pending since `since`
    pub fn pending(user_id: UserId, page: PageIdentity, since: DateTime<Utc>) -> Self {
        Self {
            user_id,
            page,
            notification_timestamp: Some(since),
        }
    }

    /// Check whether the watcher has unreviewed changes
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.notification_timestamp.is_some()
    }

    /// Derive the review status this record represents
    pub fn review_status(&self) -> ReviewStatus {
        match self.notification_timestamp {
            Some(ts) => ReviewStatus::Pending(ts),
            None => ReviewStatus::Reviewed,
        }
    }
}

/// A user's review state for one page. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    /// No watch record exists for this user and page
    NotWatching,
    /// Watching, and the latest known change has been seen
    Reviewed,
    /// Watching, with changes unseen since the given time
    Pending(DateTime<Utc>),
}

impl ReviewStatus {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The pending-since timestamp, if any
    pub fn pending_since(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Pending(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// One pending watch as projected by the store for review-queue building.
///
/// Rows come back ordered ascending by `num_other_reviewers` then ascending
/// by `notification_timestamp`, so the least-reviewed, oldest-pending pages
/// surface first. `page_id` is `None` when no page currently exists at the
/// watched identity (deleted, or moved without leaving a redirect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWatchRow {
    pub page: PageIdentity,
    pub page_id: Option<crate::value_objects::PageId>,
    pub notification_timestamp: DateTime<Utc>,
    /// Count of *other* watchers of this page with a null timestamp
    pub num_other_reviewers: i64,
}

/// Filter for the bulk pending-review clear.
///
/// The window is `start < notification_timestamp < end`. At least one of
/// `category` / `title_prefix` must be set; validation happens in the
/// service layer before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearCriteria {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Restrict to pages in this category
    pub category: Option<String>,
    /// Restrict to pages whose DB-key title starts with this prefix
    pub title_prefix: Option<String>,
}

impl ClearCriteria {
    pub fn has_page_filter(&self) -> bool {
        self.category.is_some() || self.title_prefix.is_some()
    }
}
