//! PostgreSQL store implementations

mod change_log;
mod error;
mod link_graph;
mod page;
mod stats;
mod watch;

pub use change_log::PgChangeLogStore;
pub use link_graph::PgLinkGraphStore;
pub use page::PgPageStore;
pub use stats::PgStatsStore;
pub use watch::PgWatchStore;
