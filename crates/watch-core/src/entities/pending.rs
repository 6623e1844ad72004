//! Pending-review entries - one page with unreviewed changes for a user

use chrono::{DateTime, Utc};

use crate::entities::{LogEvent, Revision};
use crate::value_objects::{PageId, PageIdentity};

/// Why a watched page no longer exists at its watched identity, reconstructed
/// from the deletion/move log at or after the pending timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionInfo {
    pub deleted_page: PageIdentity,
    pub deletion_log: Vec<LogEvent>,
}

/// One page with pending changes for a user. Built per query, never stored.
///
/// Exactly one of two branches is populated: for a page that still exists,
/// `new_revisions` and `log_events` hold the change window since the pending
/// timestamp; for a page gone from its watched identity, `deletion_info`
/// carries the reconstruction instead and both lists stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReviewEntry {
    pub page: PageIdentity,
    pub page_id: Option<PageId>,
    /// `None` only for approval-workflow entries, which carry no watch state
    pub notification_timestamp: Option<DateTime<Utc>>,
    /// Count of other watchers who have reviewed the latest change
    pub num_other_reviewers: i64,
    pub new_revisions: Vec<Revision>,
    pub log_events: Vec<LogEvent>,
    pub deletion_info: Option<DeletionInfo>,
    /// Entry injected by the approval-workflow collaborator
    pub requires_approval: bool,
}

impl PendingReviewEntry {
    /// Entry for an externally-tracked approval work item. These carry no
    /// watch state of their own and sort ahead of ordinary pending entries.
    pub fn approval(page: PageIdentity, page_id: Option<PageId>) -> Self {
        Self {
            page,
            page_id,
            notification_timestamp: None,
            num_other_reviewers: 0,
            new_revisions: Vec::new(),
            log_events: Vec::new(),
            deletion_info: None,
            requires_approval: true,
        }
    }

    /// Check whether this entry is on the deletion branch
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deletion_info.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Namespace;

    #[test]
    fn test_approval_entry_shape() {
        let entry =
            PendingReviewEntry::approval(PageIdentity::new(Namespace::MAIN, "Spec_Sheet"), None);
        assert!(entry.requires_approval);
        assert!(!entry.is_deleted());
        assert!(entry.notification_timestamp.is_none());
        assert!(entry.new_revisions.is_empty());
        assert_eq!(entry.num_other_reviewers, 0);
    }
}
