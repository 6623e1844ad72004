//! Store traits (ports) - interfaces the core requires from its host

mod stores;

pub use stores::{
    ApprovalProvider, ChangeLogStore, LinkGraphStore, NoApprovals, PageStore, PageWatchViewStats,
    StatsStore, StoreResult, WatchStore, WatchedPage,
};
