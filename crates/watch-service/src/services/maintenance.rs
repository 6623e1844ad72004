//! Watch-state maintenance services
//!
//! Snapshot recording for the tracking tables and the administrative bulk
//! clear of pending reviews.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use tracing::{info, instrument};

use watch_core::entities::{ClearCriteria, PageWatchStats};
use watch_core::error::DomainError;
use watch_core::value_objects::{PageIdentity, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Outcome of a bulk pending-review clear (or its preview)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Watch rows cleared; zero for a preview
    pub rows_cleared: u64,
    /// Distinct pages whose pending watches match the criteria
    pub pages: Vec<PageIdentity>,
    /// Distinct users with a matching pending watch
    pub users: Vec<UserId>,
}

/// Watch-state snapshot recorder.
///
/// Appends the current per-user and per-page watch statistics to the
/// tracking tables. The full pass runs lazily, at most once per configured
/// window; overlapping requests race on the shared marker and the last
/// writer wins, which is acceptable since the pass is idempotent.
pub struct WatchStateRecorder<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WatchStateRecorder<'a> {
    /// Create a new WatchStateRecorder
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Snapshot all user and page watch statistics, unless a pass already
    /// ran inside the configured window. Returns whether a pass ran.
    #[instrument(skip(self))]
    pub async fn record_all(&self) -> ServiceResult<bool> {
        let window = Duration::minutes(self.ctx.pending().refresh_window_minutes);
        let now = Utc::now();

        {
            let mut marker = self.ctx.refresh_marker().lock();
            if let Some(last) = *marker {
                if now - last < window {
                    return Ok(false);
                }
            }
            *marker = Some(now);
        }

        let user_stats = self.ctx.watch_store().user_watch_stats_all().await?;
        let page_stats = self.ctx.watch_store().page_watch_stats_all().await?;

        self.ctx.stats_store().record_user_snapshots(&user_stats).await?;
        self.ctx.stats_store().record_page_snapshots(&page_stats).await?;

        info!(
            users = user_stats.len(),
            pages = page_stats.len(),
            "Watch-state snapshot pass completed"
        );
        Ok(true)
    }

    /// Snapshot one page's watch statistics after a change of state
    #[instrument(skip(self))]
    pub async fn record_page_change(&self, page: &PageIdentity) -> ServiceResult<()> {
        let watchers = self.ctx.watch_store().watchers_of(page).await?;
        let now = Utc::now();

        let num_watches = watchers.len() as i64;
        let num_reviewed = watchers.iter().filter(|w| !w.is_pending()).count() as i64;
        let pending_minutes: Vec<i64> = watchers
            .iter()
            .filter_map(|w| w.notification_timestamp)
            .map(|ts| (now - ts).num_minutes().max(0))
            .collect();

        let percent_pending = if num_watches == 0 {
            0.0
        } else {
            (num_watches - num_reviewed) as f64 * 100.0 / num_watches as f64
        };
        let max_pending_minutes = pending_minutes.iter().copied().max().unwrap_or(0);
        let avg_pending_minutes = if pending_minutes.is_empty() {
            0.0
        } else {
            pending_minutes.iter().sum::<i64>() as f64 / pending_minutes.len() as f64
        };

        let stats = PageWatchStats {
            page: page.clone(),
            num_watches,
            num_reviewed,
            percent_pending,
            max_pending_minutes,
            avg_pending_minutes,
            recorded_at: now,
        };

        self.ctx.stats_store().record_page_snapshots(&[stats]).await?;
        Ok(())
    }

    /// Snapshot the reviewer's and the page's watch statistics after a review
    #[instrument(skip(self))]
    pub async fn record_review(&self, user_id: UserId, page: &PageIdentity) -> ServiceResult<()> {
        let stats = self.ctx.watch_store().user_watch_stats(user_id).await?;
        self.ctx.stats_store().record_user_snapshots(&[stats]).await?;
        self.record_page_change(page).await
    }
}

/// Administrative bulk clear of pending reviews
pub struct PendingReviewsCleaner<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PendingReviewsCleaner<'a> {
    /// Create a new PendingReviewsCleaner
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Report what a clear with these criteria would touch, without writing
    #[instrument(skip(self))]
    pub async fn preview(&self, criteria: &ClearCriteria) -> ServiceResult<ClearOutcome> {
        Self::validate(criteria)?;
        let mut outcome = self.impact(criteria).await?;
        outcome.rows_cleared = 0;
        Ok(outcome)
    }

    /// Clear every pending review matching the criteria.
    ///
    /// Validation happens before any write; the clear itself is a single
    /// statement on the primary store, so it lands completely or not at all.
    #[instrument(skip(self))]
    pub async fn clear(&self, criteria: &ClearCriteria) -> ServiceResult<ClearOutcome> {
        Self::validate(criteria)?;

        let mut outcome = self.impact(criteria).await?;
        outcome.rows_cleared = self.ctx.watch_store().clear_in_range(criteria).await?;

        info!(
            rows = outcome.rows_cleared,
            pages = outcome.pages.len(),
            users = outcome.users.len(),
            "Bulk pending-review clear applied"
        );
        Ok(outcome)
    }

    fn validate(criteria: &ClearCriteria) -> ServiceResult<()> {
        if criteria.start >= criteria.end {
            return Err(DomainError::InvalidDateRange {
                start: criteria.start,
                end: criteria.end,
            }
            .into());
        }
        if !criteria.has_page_filter() {
            return Err(DomainError::MissingClearFilter.into());
        }
        Ok(())
    }

    /// Distinct pages and users a clear with these criteria touches
    async fn impact(&self, criteria: &ClearCriteria) -> ServiceResult<ClearOutcome> {
        let matches = self.ctx.watch_store().find_clearable(criteria).await?;

        let mut pages = Vec::new();
        let mut seen_pages = HashSet::new();
        let mut users = Vec::new();
        let mut seen_users = HashSet::new();

        for record in matches {
            if seen_pages.insert(record.page.clone()) {
                pages.push(record.page);
            }
            if seen_users.insert(record.user_id) {
                users.push(record.user_id);
            }
        }

        Ok(ClearOutcome {
            rows_cleared: 0,
            pages,
            users,
        })
    }
}
