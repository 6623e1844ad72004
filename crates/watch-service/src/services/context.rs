//! Service context - dependency container for services
//!
//! Holds the store trait objects, the approval collaborator, configuration,
//! and the shared stats-refresh marker.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use watch_common::{PendingConfig, ScoringConfig};
use watch_core::traits::{
    ApprovalProvider, ChangeLogStore, LinkGraphStore, NoApprovals, PageStore, StatsStore,
    WatchStore,
};
use watch_db::pool::StorePools;
use watch_db::{PgChangeLogStore, PgLinkGraphStore, PgPageStore, PgStatsStore, PgWatchStore};

/// Service context containing all dependencies
///
/// This is the main dependency container passed to all services. It provides
/// access to:
/// - The store trait objects (watch, page, change log, link graph, stats)
/// - The approval-workflow collaborator (a no-op when none is installed)
/// - Scoring and pending-review configuration
/// - The shared stats-refresh marker
#[derive(Clone)]
pub struct ServiceContext {
    watch_store: Arc<dyn WatchStore>,
    page_store: Arc<dyn PageStore>,
    change_log_store: Arc<dyn ChangeLogStore>,
    link_graph_store: Arc<dyn LinkGraphStore>,
    stats_store: Arc<dyn StatsStore>,
    approval_provider: Arc<dyn ApprovalProvider>,

    scoring: ScoringConfig,
    pending: PendingConfig,

    /// Time of the last full watch-state snapshot pass. Shared across clones
    /// so overlapping requests see one marker; last-writer-wins.
    refresh_marker: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        watch_store: Arc<dyn WatchStore>,
        page_store: Arc<dyn PageStore>,
        change_log_store: Arc<dyn ChangeLogStore>,
        link_graph_store: Arc<dyn LinkGraphStore>,
        stats_store: Arc<dyn StatsStore>,
        approval_provider: Arc<dyn ApprovalProvider>,
        scoring: ScoringConfig,
        pending: PendingConfig,
    ) -> Self {
        Self {
            watch_store,
            page_store,
            change_log_store,
            link_graph_store,
            stats_store,
            approval_provider,
            scoring,
            pending,
            refresh_marker: Arc::new(Mutex::new(None)),
        }
    }

    /// Build a context backed by the PostgreSQL stores, with no approval
    /// collaborator installed
    pub fn from_pools(pools: StorePools, scoring: ScoringConfig, pending: PendingConfig) -> Self {
        Self::new(
            Arc::new(PgWatchStore::new(pools.clone())),
            Arc::new(PgPageStore::new(pools.clone())),
            Arc::new(PgChangeLogStore::new(pools.clone())),
            Arc::new(PgLinkGraphStore::new(pools.clone())),
            Arc::new(PgStatsStore::new(pools)),
            Arc::new(NoApprovals),
            scoring,
            pending,
        )
    }

    // === Stores ===

    /// Get the watch store
    pub fn watch_store(&self) -> &dyn WatchStore {
        self.watch_store.as_ref()
    }

    /// Get the page store
    pub fn page_store(&self) -> &dyn PageStore {
        self.page_store.as_ref()
    }

    /// Get the change log store
    pub fn change_log_store(&self) -> &dyn ChangeLogStore {
        self.change_log_store.as_ref()
    }

    /// Get the link graph store
    pub fn link_graph_store(&self) -> &dyn LinkGraphStore {
        self.link_graph_store.as_ref()
    }

    /// Get the stats store
    pub fn stats_store(&self) -> &dyn StatsStore {
        self.stats_store.as_ref()
    }

    /// Get the approval-workflow collaborator
    pub fn approval_provider(&self) -> &dyn ApprovalProvider {
        self.approval_provider.as_ref()
    }

    // === Configuration ===

    /// Get the badge-coloring configuration
    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Get the pending-review configuration
    pub fn pending(&self) -> &PendingConfig {
        &self.pending
    }

    /// Get the shared stats-refresh marker
    pub(crate) fn refresh_marker(&self) -> &Mutex<Option<DateTime<Utc>>> {
        &self.refresh_marker
    }
}
