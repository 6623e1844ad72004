//! # watch-core
//!
//! Domain layer containing entities, value objects, store traits, and domain errors.
//! This crate has zero dependencies on infrastructure (database, host platform, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ClearCriteria, DeletionInfo, EngagementInputs, LogEvent, Page, PageScoreBadges,
    PageWatchStats, PendingReviewEntry, PendingWatchRow, ReviewStatus, Revision, UserWatchStats,
    WatchRecord, WatchSuggestionCandidate, compute_engagement_score, parse_move_target,
    rank_by_watch_need, DELETION_LOG_KINDS, EXCLUDED_LOG_KINDS,
};
pub use error::DomainError;
pub use traits::{
    ApprovalProvider, ChangeLogStore, LinkGraphStore, NoApprovals, PageStore, PageWatchViewStats,
    StatsStore, StoreResult, WatchStore, WatchedPage,
};
pub use value_objects::{ColorBand, ColorScale, Namespace, PageId, PageIdentity, UserId};
