//! Watch and statistics model <-> entity mappers

use chrono::Utc;

use watch_core::entities::{
    EngagementInputs, PageWatchStats, PendingWatchRow, UserWatchStats, WatchRecord,
};
use watch_core::value_objects::{Namespace, PageId, PageIdentity, UserId};

use crate::models::{
    EngagementInputsModel, PageWatchStatsModel, PendingWatchRowModel, UserWatchStatsModel,
    WatchModel,
};

/// Convert WatchModel to WatchRecord entity
impl From<WatchModel> for WatchRecord {
    fn from(model: WatchModel) -> Self {
        WatchRecord {
            user_id: UserId::new(model.user_id),
            page: PageIdentity::new(Namespace::new(model.namespace), model.title),
            notification_timestamp: model.notification_timestamp,
        }
    }
}

/// Convert PendingWatchRowModel to PendingWatchRow entity
impl From<PendingWatchRowModel> for PendingWatchRow {
    fn from(model: PendingWatchRowModel) -> Self {
        PendingWatchRow {
            page: PageIdentity::new(Namespace::new(model.namespace), model.title),
            page_id: model.page_id.map(PageId::new),
            notification_timestamp: model.notification_timestamp,
            num_other_reviewers: model.num_other_reviewers,
        }
    }
}

/// Convert EngagementInputsModel to EngagementInputs entity
impl From<EngagementInputsModel> for EngagementInputs {
    fn from(model: EngagementInputsModel) -> Self {
        EngagementInputs {
            user_id: UserId::new(model.user_id),
            pending_count: model.pending_count,
            avg_pending_age_days: model.avg_pending_age_days,
        }
    }
}

/// Convert UserWatchStatsModel to UserWatchStats entity
impl From<UserWatchStatsModel> for UserWatchStats {
    fn from(model: UserWatchStatsModel) -> Self {
        UserWatchStats {
            user_id: UserId::new(model.user_id),
            num_watches: model.num_watches,
            num_pending: model.num_pending,
            max_pending_minutes: model.max_pending_minutes,
            avg_pending_minutes: model.avg_pending_minutes,
        }
    }
}

/// Convert PageWatchStatsModel to PageWatchStats entity
impl From<PageWatchStatsModel> for PageWatchStats {
    fn from(model: PageWatchStatsModel) -> Self {
        PageWatchStats {
            page: PageIdentity::new(Namespace::new(model.namespace), model.title),
            num_watches: model.num_watches,
            num_reviewed: model.num_reviewed,
            percent_pending: model.percent_pending,
            max_pending_minutes: model.max_pending_minutes,
            avg_pending_minutes: model.avg_pending_minutes,
            recorded_at: Utc::now(),
        }
    }
}
