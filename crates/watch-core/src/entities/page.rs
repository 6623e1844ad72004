//! Page and revision entities

use chrono::{DateTime, Utc};

use crate::value_objects::{PageId, PageIdentity, UserId};

/// A page that currently exists in the wiki
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub identity: PageIdentity,
    pub is_redirect: bool,
    /// Total page views, as tracked by the host's hit counter. Pages with no
    /// counter row are treated as having a single view.
    pub view_count: i64,
}

impl Page {
    /// Check whether this page can be offered as a watch suggestion:
    /// main-namespace, non-redirect pages only.
    pub fn is_suggestible(&self) -> bool {
        self.identity.namespace.is_main() && !self.is_redirect
    }
}

/// One revision of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: i64,
    pub page_id: PageId,
    pub timestamp: DateTime<Utc>,
    pub actor: UserId,
    pub comment: String,
}
