//! Domain entities - core business objects

mod log;
mod page;
mod pending;
mod score;
mod suggestion;
mod watch;

pub use log::{parse_move_target, LogEvent, DELETION_LOG_KINDS, EXCLUDED_LOG_KINDS};
pub use page::{Page, Revision};
pub use pending::{DeletionInfo, PendingReviewEntry};
pub use score::{
    compute_engagement_score, EngagementInputs, PageScoreBadges, PageWatchStats, UserWatchStats,
};
pub use suggestion::{rank_by_watch_need, WatchSuggestionCandidate};
pub use watch::{ClearCriteria, PendingWatchRow, ReviewStatus, WatchRecord};
