//! Database models with SQLx `FromRow` derives

mod log;
mod page;
mod watch;

pub use log::{LogEventModel, RevisionModel};
pub use page::{LinkRowModel, PageModel, PageWatchViewStatsModel};
pub use watch::{
    EngagementInputsModel, PageWatchStatsModel, PendingWatchRowModel, UserWatchStatsModel,
    WatchModel,
};
