//! Service tests against an in-memory store fixture
//!
//! The fixture implements every store trait over plain vectors, so the full
//! service stack runs without a database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use watch_common::{PendingConfig, ScoringConfig};
use watch_core::entities::{
    ClearCriteria, EngagementInputs, LogEvent, Page, PageWatchStats, PendingReviewEntry,
    PendingWatchRow, ReviewStatus, Revision, UserWatchStats, WatchRecord, DELETION_LOG_KINDS,
    EXCLUDED_LOG_KINDS,
};
use watch_core::traits::{
    ApprovalProvider, ChangeLogStore, LinkGraphStore, NoApprovals, PageStore, PageWatchViewStats,
    StatsStore, StoreResult, WatchStore, WatchedPage,
};
use watch_core::value_objects::{ColorBand, ColorScale, Namespace, PageId, PageIdentity, UserId};
use watch_service::{
    PageMoveReconciler, PageScoreCalculator, PageScoreContext, PendingReviewResolver,
    PendingReviewsCleaner, ReviewTracker, ServiceContext, WatchStateRecorder, WatchSuggester,
};

// ============================================================================
// In-memory store fixture
// ============================================================================

#[derive(Default)]
struct MemoryStore {
    watches: Mutex<Vec<WatchRecord>>,
    /// Watches visible only to primary reads, as on a lagging replica
    unreplicated_watches: Mutex<Vec<WatchRecord>>,
    pages: Mutex<Vec<Page>>,
    revisions: Mutex<Vec<Revision>>,
    log: Mutex<Vec<LogEvent>>,
    links: Mutex<Vec<(PageId, PageId)>>,
    categories: Mutex<Vec<(PageIdentity, String)>>,
    user_snapshots: Mutex<Vec<UserWatchStats>>,
    page_snapshots: Mutex<Vec<PageWatchStats>>,
}

impl MemoryStore {
    fn add_page(&self, id: i64, identity: PageIdentity, is_redirect: bool, view_count: i64) {
        self.pages.lock().push(Page {
            id: PageId::new(id),
            identity,
            is_redirect,
            view_count,
        });
    }

    fn add_watch(&self, user: i64, page: PageIdentity, pending: Option<DateTime<Utc>>) {
        self.watches.lock().push(WatchRecord {
            user_id: UserId::new(user),
            page,
            notification_timestamp: pending,
        });
    }

    fn add_unreplicated_watch(&self, user: i64, page: PageIdentity, pending: Option<DateTime<Utc>>) {
        self.unreplicated_watches.lock().push(WatchRecord {
            user_id: UserId::new(user),
            page,
            notification_timestamp: pending,
        });
    }

    fn add_revision(&self, id: i64, page_id: i64, ts: DateTime<Utc>) {
        self.revisions.lock().push(Revision {
            id,
            page_id: PageId::new(page_id),
            timestamp: ts,
            actor: UserId::new(99),
            comment: String::new(),
        });
    }

    fn add_log(&self, kind: &str, page: PageIdentity, ts: DateTime<Utc>, params: &str) {
        let id = self.log.lock().len() as i64 + 1;
        self.log.lock().push(LogEvent {
            id,
            kind: kind.to_string(),
            action: kind.to_string(),
            timestamp: ts,
            actor: UserId::new(99),
            page,
            page_id: None,
            params: params.to_string(),
            comment: String::new(),
        });
    }

    fn page_id_of(&self, identity: &PageIdentity) -> Option<PageId> {
        self.pages
            .lock()
            .iter()
            .find(|p| &p.identity == identity)
            .map(|p| p.id)
    }

    fn stats_for(&self, user_id: UserId, now: DateTime<Utc>) -> UserWatchStats {
        let watches = self.watches.lock();
        let mine: Vec<&WatchRecord> = watches.iter().filter(|w| w.user_id == user_id).collect();
        let pending: Vec<i64> = mine
            .iter()
            .filter_map(|w| w.notification_timestamp)
            .map(|ts| (now - ts).num_minutes().max(0))
            .collect();

        UserWatchStats {
            user_id,
            num_watches: mine.len() as i64,
            num_pending: pending.len() as i64,
            max_pending_minutes: pending.iter().copied().max().unwrap_or(0),
            avg_pending_minutes: if pending.is_empty() {
                0.0
            } else {
                pending.iter().sum::<i64>() as f64 / pending.len() as f64
            },
        }
    }

    fn matches_clear(&self, w: &WatchRecord, criteria: &ClearCriteria) -> bool {
        let Some(ts) = w.notification_timestamp else {
            return false;
        };
        if ts <= criteria.start || ts >= criteria.end {
            return false;
        }
        if let Some(prefix) = &criteria.title_prefix {
            if !w.page.title.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(category) = &criteria.category {
            let in_category = self
                .categories
                .lock()
                .iter()
                .any(|(page, cat)| page == &w.page && cat == category);
            if !in_category {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl WatchStore for MemoryStore {
    async fn find_watch(
        &self,
        user_id: UserId,
        page: &PageIdentity,
    ) -> StoreResult<Option<WatchRecord>> {
        Ok(self
            .watches
            .lock()
            .iter()
            .find(|w| w.user_id == user_id && &w.page == page)
            .cloned())
    }

    async fn watchers_of(&self, page: &PageIdentity) -> StoreResult<Vec<WatchRecord>> {
        Ok(self
            .watches
            .lock()
            .iter()
            .filter(|w| &w.page == page)
            .cloned()
            .collect())
    }

    async fn watchers_of_latest(&self, page: &PageIdentity) -> StoreResult<Vec<WatchRecord>> {
        let mut all = self.watchers_of(page).await?;
        all.extend(
            self.unreplicated_watches
                .lock()
                .iter()
                .filter(|w| &w.page == page)
                .cloned(),
        );
        Ok(all)
    }

    async fn reviewed_watcher_count(&self, page: &PageIdentity) -> StoreResult<i64> {
        Ok(self
            .watches
            .lock()
            .iter()
            .filter(|w| &w.page == page && !w.is_pending())
            .count() as i64)
    }

    async fn pending_watch_rows(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<PendingWatchRow>> {
        let watches = self.watches.lock();
        let mut rows: Vec<PendingWatchRow> = watches
            .iter()
            .filter(|w| w.user_id == user_id && w.is_pending())
            .map(|w| PendingWatchRow {
                page: w.page.clone(),
                page_id: self.page_id_of(&w.page),
                notification_timestamp: w.notification_timestamp.unwrap(),
                num_other_reviewers: watches
                    .iter()
                    .filter(|o| o.page == w.page && o.user_id != user_id && !o.is_pending())
                    .count() as i64,
            })
            .collect();

        rows.sort_by(|a, b| {
            a.num_other_reviewers
                .cmp(&b.num_other_reviewers)
                .then_with(|| a.notification_timestamp.cmp(&b.notification_timestamp))
        });

        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn pending_stats_by_user(&self) -> StoreResult<Vec<EngagementInputs>> {
        let now = Utc::now();
        let watches = self.watches.lock();
        let mut by_user: HashMap<UserId, Vec<f64>> = HashMap::new();
        for w in watches.iter() {
            let ages = by_user.entry(w.user_id).or_default();
            if let Some(ts) = w.notification_timestamp {
                ages.push((now - ts).num_seconds() as f64 / 86_400.0);
            }
        }

        Ok(by_user
            .into_iter()
            .map(|(user_id, ages)| EngagementInputs {
                user_id,
                pending_count: ages.len() as i64,
                avg_pending_age_days: if ages.is_empty() {
                    None
                } else {
                    Some(ages.iter().sum::<f64>() / ages.len() as f64)
                },
            })
            .collect())
    }

    async fn user_watch_stats(&self, user_id: UserId) -> StoreResult<UserWatchStats> {
        Ok(self.stats_for(user_id, Utc::now()))
    }

    async fn user_watch_stats_all(&self) -> StoreResult<Vec<UserWatchStats>> {
        let users: Vec<UserId> = {
            let watches = self.watches.lock();
            let mut users: Vec<UserId> = watches.iter().map(|w| w.user_id).collect();
            users.sort_unstable();
            users.dedup();
            users
        };
        let now = Utc::now();
        Ok(users.into_iter().map(|u| self.stats_for(u, now)).collect())
    }

    async fn page_watch_stats_all(&self) -> StoreResult<Vec<PageWatchStats>> {
        let now = Utc::now();
        let watches = self.watches.lock();
        let mut pages: Vec<PageIdentity> = watches.iter().map(|w| w.page.clone()).collect();
        pages.sort_by(|a, b| (a.namespace, &a.title).cmp(&(b.namespace, &b.title)));
        pages.dedup();

        Ok(pages
            .into_iter()
            .map(|page| {
                let mine: Vec<&WatchRecord> =
                    watches.iter().filter(|w| w.page == page).collect();
                let pending: Vec<i64> = mine
                    .iter()
                    .filter_map(|w| w.notification_timestamp)
                    .map(|ts| (now - ts).num_minutes().max(0))
                    .collect();
                let num_watches = mine.len() as i64;
                PageWatchStats {
                    page,
                    num_watches,
                    num_reviewed: num_watches - pending.len() as i64,
                    percent_pending: pending.len() as f64 * 100.0 / num_watches as f64,
                    max_pending_minutes: pending.iter().copied().max().unwrap_or(0),
                    avg_pending_minutes: if pending.is_empty() {
                        0.0
                    } else {
                        pending.iter().sum::<i64>() as f64 / pending.len() as f64
                    },
                    recorded_at: now,
                }
            })
            .collect())
    }

    async fn user_watchlist(
        &self,
        user_id: UserId,
        namespace: Namespace,
    ) -> StoreResult<Vec<WatchedPage>> {
        let watches = self.watches.lock();
        let pages = self.pages.lock();
        Ok(watches
            .iter()
            .filter(|w| w.user_id == user_id && w.page.namespace == namespace)
            .filter_map(|w| {
                pages
                    .iter()
                    .find(|p| p.identity == w.page)
                    .map(|p| WatchedPage {
                        page_id: p.id,
                        identity: p.identity.clone(),
                    })
            })
            .collect())
    }

    async fn top_watchers(&self, limit: i64) -> StoreResult<Vec<(UserId, i64)>> {
        let watches = self.watches.lock();
        let pages = self.pages.lock();
        let mut counts: HashMap<UserId, i64> = HashMap::new();
        for w in watches.iter() {
            if w.user_id == UserId::new(0) {
                continue;
            }
            let real_page = pages
                .iter()
                .any(|p| p.identity == w.page && !p.is_redirect);
            if real_page {
                *counts.entry(w.user_id).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<(UserId, i64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit as usize);
        Ok(ranked)
    }

    async fn upsert_watches(&self, records: &[WatchRecord]) -> StoreResult<()> {
        let mut watches = self.watches.lock();
        for record in records {
            match watches
                .iter_mut()
                .find(|w| w.user_id == record.user_id && w.page == record.page)
            {
                Some(existing) => existing.notification_timestamp = record.notification_timestamp,
                None => watches.push(record.clone()),
            }
        }
        Ok(())
    }

    async fn set_notification(
        &self,
        user_id: UserId,
        page: &PageIdentity,
        timestamp: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        if let Some(w) = self
            .watches
            .lock()
            .iter_mut()
            .find(|w| w.user_id == user_id && &w.page == page)
        {
            w.notification_timestamp = timestamp;
        }
        Ok(())
    }

    async fn clear_notification(&self, user_id: UserId, page: &PageIdentity) -> StoreResult<()> {
        self.set_notification(user_id, page, None).await
    }

    async fn find_clearable(&self, criteria: &ClearCriteria) -> StoreResult<Vec<WatchRecord>> {
        Ok(self
            .watches
            .lock()
            .iter()
            .filter(|w| self.matches_clear(w, criteria))
            .cloned()
            .collect())
    }

    async fn clear_in_range(&self, criteria: &ClearCriteria) -> StoreResult<u64> {
        let matching: Vec<(UserId, PageIdentity)> = self
            .watches
            .lock()
            .iter()
            .filter(|w| self.matches_clear(w, criteria))
            .map(|w| (w.user_id, w.page.clone()))
            .collect();
        let mut watches = self.watches.lock();
        for (user_id, page) in &matching {
            if let Some(w) = watches
                .iter_mut()
                .find(|w| &w.user_id == user_id && &w.page == page)
            {
                w.notification_timestamp = None;
            }
        }
        Ok(matching.len() as u64)
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn find_by_identity(&self, identity: &PageIdentity) -> StoreResult<Option<Page>> {
        Ok(self
            .pages
            .lock()
            .iter()
            .find(|p| &p.identity == identity)
            .cloned())
    }

    async fn find_by_id(&self, id: PageId) -> StoreResult<Option<Page>> {
        Ok(self.pages.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn page_ids_in(&self, namespace: Namespace) -> StoreResult<Vec<PageId>> {
        Ok(self
            .pages
            .lock()
            .iter()
            .filter(|p| p.identity.namespace == namespace)
            .map(|p| p.id)
            .collect())
    }

    async fn watch_view_stats(&self, page_ids: &[PageId]) -> StoreResult<Vec<PageWatchViewStats>> {
        let pages = self.pages.lock();
        let watches = self.watches.lock();
        let mut stats: Vec<PageWatchViewStats> = page_ids
            .iter()
            .filter_map(|id| pages.iter().find(|p| p.id == *id))
            .map(|p| PageWatchViewStats {
                page_id: p.id,
                num_watches: watches.iter().filter(|w| w.page == p.identity).count() as i64,
                num_views: p.view_count.max(1),
            })
            .collect();
        stats.sort_by_key(|s| s.num_watches);
        Ok(stats)
    }

    async fn is_watchable(&self, identity: &PageIdentity) -> StoreResult<bool> {
        Ok(identity.namespace.into_inner() >= 0)
    }
}

#[async_trait]
impl ChangeLogStore for MemoryStore {
    async fn revisions_since(
        &self,
        page_id: PageId,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<Revision>> {
        let mut revisions: Vec<Revision> = self
            .revisions
            .lock()
            .iter()
            .filter(|r| r.page_id == page_id && r.timestamp >= since)
            .cloned()
            .collect();
        revisions.sort_by_key(|r| r.timestamp);
        Ok(revisions)
    }

    async fn log_events_since(
        &self,
        page_id: PageId,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<LogEvent>> {
        let mut events: Vec<LogEvent> = self
            .log
            .lock()
            .iter()
            .filter(|e| {
                e.page_id == Some(page_id)
                    && e.timestamp >= since
                    && !EXCLUDED_LOG_KINDS.contains(&e.kind.as_str())
            })
            .cloned()
            .collect();
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }

    async fn deletion_log(
        &self,
        identity: &PageIdentity,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<LogEvent>> {
        let mut events: Vec<LogEvent> = self
            .log
            .lock()
            .iter()
            .filter(|e| {
                &e.page == identity
                    && e.timestamp >= since
                    && DELETION_LOG_KINDS.contains(&e.kind.as_str())
            })
            .cloned()
            .collect();
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}

#[async_trait]
impl LinkGraphStore for MemoryStore {
    async fn links_touching(&self, page_ids: &[PageId]) -> StoreResult<Vec<(PageId, PageId)>> {
        Ok(self
            .links
            .lock()
            .iter()
            .filter(|(from, to)| page_ids.contains(from) || page_ids.contains(to))
            .copied()
            .collect())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn record_user_snapshots(&self, stats: &[UserWatchStats]) -> StoreResult<()> {
        self.user_snapshots.lock().extend_from_slice(stats);
        Ok(())
    }

    async fn record_page_snapshots(&self, stats: &[PageWatchStats]) -> StoreResult<()> {
        self.page_snapshots.lock().extend_from_slice(stats);
        Ok(())
    }
}

/// Approval collaborator returning a fixed work list
struct FixedApprovals(Vec<PendingReviewEntry>);

#[async_trait]
impl ApprovalProvider for FixedApprovals {
    async fn pending_approvals(&self, _user_id: UserId) -> StoreResult<Vec<PendingReviewEntry>> {
        Ok(self.0.clone())
    }
}

// ============================================================================
// Context helpers
// ============================================================================

fn context(store: &Arc<MemoryStore>) -> ServiceContext {
    context_with(store, Arc::new(NoApprovals), PendingConfig::default())
}

fn context_with(
    store: &Arc<MemoryStore>,
    approvals: Arc<dyn ApprovalProvider>,
    pending: PendingConfig,
) -> ServiceContext {
    ServiceContext::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        approvals,
        ScoringConfig::default(),
        pending,
    )
}

fn user(id: i64) -> UserId {
    UserId::new(id)
}

// ============================================================================
// Review tracking
// ============================================================================

#[tokio::test]
async fn review_status_three_states() {
    let store = Arc::new(MemoryStore::default());
    let since = Utc::now() - Duration::hours(2);
    store.add_watch(1, PageIdentity::main("Reviewed"), None);
    store.add_watch(1, PageIdentity::main("Pending"), Some(since));
    let ctx = context(&store);
    let tracker = ReviewTracker::new(&ctx);

    let status = tracker.status(user(1), &PageIdentity::main("Reviewed")).await.unwrap();
    assert_eq!(status, ReviewStatus::Reviewed);

    let status = tracker.status(user(1), &PageIdentity::main("Pending")).await.unwrap();
    assert_eq!(status, ReviewStatus::Pending(since));

    let status = tracker.status(user(1), &PageIdentity::main("Unknown")).await.unwrap();
    assert_eq!(status, ReviewStatus::NotWatching);
}

#[tokio::test]
async fn begin_view_skips_unwatchable_pages() {
    let store = Arc::new(MemoryStore::default());
    let ctx = context(&store);
    let tracker = ReviewTracker::new(&ctx);

    let special = PageIdentity::new(Namespace::new(-1), "Recent_changes");
    assert!(tracker.begin_view(user(1), &special, false).await.unwrap().is_none());

    let normal = PageIdentity::main("Article");
    assert!(tracker.begin_view(user(1), &normal, false).await.unwrap().is_some());
}

#[tokio::test]
async fn snapshot_keeps_initial_status_after_review() {
    let store = Arc::new(MemoryStore::default());
    let page = PageIdentity::main("Article");
    let since = Utc::now() - Duration::days(1);
    store.add_watch(1, page.clone(), Some(since));
    let ctx = context(&store);
    let tracker = ReviewTracker::new(&ctx);

    let snapshot = tracker
        .begin_view(user(1), &page, false)
        .await
        .unwrap()
        .unwrap();
    assert!(snapshot.is_being_reviewed());

    tracker.mark_reviewed(&snapshot).await.unwrap();
    let status = tracker.status(user(1), &page).await.unwrap();
    assert_eq!(status, ReviewStatus::Reviewed);

    // The request-scoped snapshot never re-reads; the view stays a review.
    assert!(snapshot.is_being_reviewed());

    tracker.unreview(&snapshot).await.unwrap();
    let status = tracker.status(user(1), &page).await.unwrap();
    assert_eq!(status, ReviewStatus::Pending(since));
}

// ============================================================================
// Engagement scoring
// ============================================================================

#[tokio::test]
async fn engagement_score_defaults_to_one() {
    let store = Arc::new(MemoryStore::default());
    store.add_watch(1, PageIdentity::main("Seen"), None);
    let ctx = context(&store);
    let scorer = watch_service::EngagementScorer::new(&ctx);

    // All watches reviewed: maximum score, never NaN
    let scores = scorer.scores_for_all_users().await.unwrap();
    assert_eq!(scores.get(&user(1)), Some(&1.0));

    // No watch rows at all
    let score = scorer.score_for(user(42)).await.unwrap();
    assert_eq!(score, 1.0);
}

#[tokio::test]
async fn engagement_score_decays_with_pending_load() {
    let store = Arc::new(MemoryStore::default());
    let now = Utc::now();
    for i in 0..5 {
        store.add_watch(
            1,
            PageIdentity::main(format!("Page_{i}")),
            Some(now - Duration::days(3)),
        );
    }
    store.add_watch(2, PageIdentity::main("Page_0"), Some(now - Duration::days(3)));
    let ctx = context(&store);
    let scorer = watch_service::EngagementScorer::new(&ctx);

    let scores = scorer.scores_for_all_users().await.unwrap();
    let heavy = scores[&user(1)];
    let light = scores[&user(2)];
    assert!(heavy < light, "more pending load must score lower");
    assert!(heavy > 0.0 && light <= 1.0);
}

// ============================================================================
// Page score badges
// ============================================================================

#[tokio::test]
async fn page_badges_sum_watcher_engagement() {
    let store = Arc::new(MemoryStore::default());
    let page = PageIdentity::main("Scored");
    store.add_watch(1, page.clone(), None);
    store.add_watch(2, page.clone(), None);
    store.add_watch(3, page.clone(), Some(Utc::now() - Duration::days(2)));
    let ctx = context(&store);
    let calc = PageScoreCalculator::new(&ctx);

    let badges = calc
        .badges(&page, &PageScoreContext::visible())
        .await
        .unwrap()
        .unwrap();

    // Two fully-engaged watchers plus one slightly decayed
    assert!(badges.scrutiny > 2.9 && badges.scrutiny <= 3.0);
    assert_eq!(badges.reviews, 2);
}

#[tokio::test]
async fn page_badges_honor_suppression() {
    let store = Arc::new(MemoryStore::default());
    let page = PageIdentity::main("Opted_out");
    store.add_watch(1, page.clone(), None);
    let ctx = context(&store);
    let calc = PageScoreCalculator::new(&ctx);

    let badges = calc
        .badges(&page, &PageScoreContext::suppressed())
        .await
        .unwrap();
    assert!(badges.is_none());
}

#[tokio::test]
async fn badge_colors_scan_thresholds_descending() {
    let store = Arc::new(MemoryStore::default());
    let ctx = ServiceContext::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(NoApprovals),
        ScoringConfig {
            scrutiny_colors: ColorScale::new(vec![
                ColorBand::new(90.0, "good"),
                ColorBand::new(50.0, "warn"),
                ColorBand::new(0.0, "danger"),
            ]),
            review_colors: ColorScale::new(vec![]),
        },
        PendingConfig::default(),
    );
    let calc = PageScoreCalculator::new(&ctx);

    assert_eq!(calc.scrutiny_color(91.0), "good");
    assert_eq!(calc.scrutiny_color(50.0), "warn");
    assert_eq!(calc.scrutiny_color(49.0), "danger");
    assert_eq!(calc.scrutiny_color(-3.0), "danger");
    // Empty table always falls back to the most severe color
    assert_eq!(calc.review_color(100), "danger");
}

// ============================================================================
// Pending review resolution
// ============================================================================

#[tokio::test]
async fn resolver_returns_revision_window_ascending() {
    let store = Arc::new(MemoryStore::default());
    let page = PageIdentity::main("Procedure");
    let t = Utc::now() - Duration::days(2);
    store.add_page(10, page.clone(), false, 5);
    store.add_watch(1, page.clone(), Some(t));
    store.add_watch(2, page.clone(), None);
    store.add_watch(3, page.clone(), None);
    store.add_revision(101, 10, t + Duration::hours(1));
    store.add_revision(102, 10, t + Duration::hours(2));
    store.add_revision(90, 10, t - Duration::hours(5));
    let ctx = context(&store);
    let resolver = PendingReviewResolver::new(&ctx);

    let entries = resolver.pending_reviews(user(1), 10, 0).await.unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];

    let ids: Vec<i64> = entry.new_revisions.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![101, 102], "revisions before the window are excluded");
    assert_eq!(entry.num_other_reviewers, 2);
    assert!(entry.deletion_info.is_none());
    assert!(!entry.requires_approval);
}

#[tokio::test]
async fn resolver_orders_least_reviewed_then_oldest() {
    let store = Arc::new(MemoryStore::default());
    let lonely = PageIdentity::main("Lonely");
    let shared = PageIdentity::main("Shared");
    let now = Utc::now();
    store.add_page(1, lonely.clone(), false, 1);
    store.add_page(2, shared.clone(), false, 1);
    store.add_watch(1, lonely.clone(), Some(now - Duration::days(1)));
    store.add_watch(1, shared.clone(), Some(now - Duration::days(10)));
    store.add_watch(2, shared.clone(), None);
    let ctx = context(&store);
    let resolver = PendingReviewResolver::new(&ctx);

    let entries = resolver.pending_reviews(user(1), 10, 0).await.unwrap();
    let titles: Vec<&str> = entries.iter().map(|e| e.page.title.as_str()).collect();
    assert_eq!(titles, vec!["Lonely", "Shared"]);
}

#[tokio::test]
async fn resolver_builds_deletion_branch_for_missing_pages() {
    let store = Arc::new(MemoryStore::default());
    let gone = PageIdentity::main("Deleted_page");
    let t = Utc::now() - Duration::days(3);
    store.add_watch(1, gone.clone(), Some(t));
    store.add_log("delete", gone.clone(), t + Duration::hours(1), "");
    store.add_log("patrol", gone.clone(), t + Duration::hours(2), "");
    let ctx = context(&store);
    let resolver = PendingReviewResolver::new(&ctx);

    let entries = resolver.pending_reviews(user(1), 10, 0).await.unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];

    assert!(entry.is_deleted());
    assert!(entry.new_revisions.is_empty());
    assert!(entry.log_events.is_empty());
    let info = entry.deletion_info.as_ref().unwrap();
    assert_eq!(info.deleted_page, gone);
    assert_eq!(info.deletion_log.len(), 1, "only delete/move kinds qualify");
    assert_eq!(info.deletion_log[0].kind, "delete");
}

#[tokio::test]
async fn resolver_prepends_approval_entries() {
    let store = Arc::new(MemoryStore::default());
    let page = PageIdentity::main("Watched");
    store.add_page(1, page.clone(), false, 1);
    store.add_watch(1, page.clone(), Some(Utc::now() - Duration::days(9)));
    let approval = PendingReviewEntry::approval(PageIdentity::main("Needs_approval"), None);
    let ctx = context_with(
        &store,
        Arc::new(FixedApprovals(vec![approval])),
        PendingConfig::default(),
    );
    let resolver = PendingReviewResolver::new(&ctx);

    let entries = resolver.pending_reviews(user(1), 10, 0).await.unwrap();
    assert_eq!(entries.len(), 2);
    // The approval item leads despite the much older pending watch.
    assert!(entries[0].requires_approval);
    assert_eq!(entries[0].page.title, "Needs_approval");
    assert_eq!(entries[1].page.title, "Watched");
}

#[tokio::test]
async fn single_page_pending_review() {
    let store = Arc::new(MemoryStore::default());
    let page = PageIdentity::main("Banner");
    let t = Utc::now() - Duration::hours(6);
    store.add_page(4, page.clone(), false, 1);
    store.add_watch(1, page.clone(), Some(t));
    store.add_revision(301, 4, t + Duration::hours(1));
    let ctx = context(&store);
    let resolver = PendingReviewResolver::new(&ctx);

    let entry = resolver.pending_review_for(user(1), &page).await.unwrap().unwrap();
    assert_eq!(entry.notification_timestamp, Some(t));
    assert_eq!(entry.new_revisions.len(), 1);

    // Reviewed watch yields no banner entry
    store.add_watch(2, page.clone(), None);
    assert!(resolver.pending_review_for(user(2), &page).await.unwrap().is_none());
    // Neither does not watching at all
    assert!(resolver.pending_review_for(user(3), &page).await.unwrap().is_none());
}

#[tokio::test]
async fn emphasis_tracks_oldest_pending_age() {
    let store = Arc::new(MemoryStore::default());
    let now = Utc::now();
    store.add_watch(1, PageIdentity::main("Fresh"), Some(now - Duration::days(1)));
    store.add_watch(2, PageIdentity::main("Stale"), Some(now - Duration::days(30)));
    let ctx = context(&store);
    let resolver = PendingReviewResolver::new(&ctx);

    // Default threshold is seven days
    assert!(!resolver.needs_emphasis(user(1)).await.unwrap());
    assert!(resolver.needs_emphasis(user(2)).await.unwrap());
    assert!(!resolver.needs_emphasis(user(3)).await.unwrap());
}

// ============================================================================
// Watch suggestions
// ============================================================================

#[tokio::test]
async fn suggestions_rank_least_watched_then_need() {
    let store = Arc::new(MemoryStore::default());
    let watched = PageIdentity::main("Hub");
    store.add_page(1, watched.clone(), false, 1);
    store.add_watch(1, watched.clone(), None);

    // Candidates linked from the hub, shaped so watch counts and view counts
    // pull in different directions.
    store.add_page(2, PageIdentity::main("Busy"), false, 3); // need 1*9, 2 watchers
    store.add_page(3, PageIdentity::main("Quiet"), false, 1); // need 1*1, 1 watcher
    store.add_page(4, PageIdentity::main("Hot"), false, 9); // need 1*81, 1 watcher
    for candidate in [2, 3, 4] {
        store.links.lock().push((PageId::new(1), PageId::new(candidate)));
    }
    store.add_watch(5, PageIdentity::main("Busy"), None);
    store.add_watch(6, PageIdentity::main("Busy"), None);
    store.add_watch(5, PageIdentity::main("Quiet"), None);
    store.add_watch(5, PageIdentity::main("Hot"), None);

    let ctx = context(&store);
    let suggester = WatchSuggester::new(&ctx);

    let suggestions = suggester.suggestions(user(1)).await.unwrap();
    let titles: Vec<&str> = suggestions.iter().map(|p| p.identity.title.as_str()).collect();
    assert_eq!(titles, vec!["Hot", "Quiet", "Busy"]);
}

#[tokio::test]
async fn suggestions_skip_redirects_and_respect_limit() {
    let store = Arc::new(MemoryStore::default());
    store.add_page(1, PageIdentity::main("A"), false, 10);
    store.add_page(2, PageIdentity::main("B"), false, 5);
    store.add_page(3, PageIdentity::main("Shortcut"), true, 100);
    store.add_page(4, PageIdentity::new(Namespace::CATEGORY, "Topics"), false, 50);

    // Empty watchlist: uniform fallback over the main namespace
    let ctx = context_with(
        &store,
        Arc::new(NoApprovals),
        PendingConfig {
            suggestion_limit: 1,
            ..PendingConfig::default()
        },
    );
    let suggester = WatchSuggester::new(&ctx);

    let suggestions = suggester.suggestions(user(1)).await.unwrap();
    assert_eq!(suggestions.len(), 1);
    // The redirect outranks everything on views but is never suggested.
    assert_eq!(suggestions[0].identity.title, "A");
}

#[tokio::test]
async fn top_watchers_excludes_redirects() {
    let store = Arc::new(MemoryStore::default());
    store.add_page(1, PageIdentity::main("Real"), false, 1);
    store.add_page(2, PageIdentity::main("Shortcut"), true, 1);
    store.add_watch(1, PageIdentity::main("Real"), None);
    store.add_watch(2, PageIdentity::main("Real"), None);
    store.add_watch(2, PageIdentity::main("Shortcut"), None);
    let ctx = context(&store);
    let suggester = WatchSuggester::new(&ctx);

    let top = suggester.top_watchers(10).await.unwrap();
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|(_, count)| *count == 1));
}

// ============================================================================
// Page move reconciliation
// ============================================================================

#[tokio::test]
async fn move_preserves_pending_state_and_is_idempotent() {
    let store = Arc::new(MemoryStore::default());
    let old = PageIdentity::main("A");
    let new = PageIdentity::main("B");
    let since = Utc::now() - Duration::days(4);
    store.add_watch(1, old.clone(), Some(since));
    store.add_watch(2, old.clone(), None);
    let ctx = context(&store);
    let reconciler = PageMoveReconciler::new(&ctx);

    let carried = reconciler.reconcile_move(&old, &new).await.unwrap();
    assert_eq!(carried, 2);

    let tracker = ReviewTracker::new(&ctx);
    let status = tracker.status(user(1), &new).await.unwrap();
    assert_eq!(status, ReviewStatus::Pending(since), "timestamp copied verbatim");
    let status = tracker.status(user(2), &new).await.unwrap();
    assert_eq!(status, ReviewStatus::Reviewed);

    // Second application changes nothing
    let before = store.watches.lock().clone();
    reconciler.reconcile_move(&old, &new).await.unwrap();
    assert_eq!(*store.watches.lock(), before);
}

#[tokio::test]
async fn move_snapshots_the_moved_page() {
    let store = Arc::new(MemoryStore::default());
    let old = PageIdentity::main("A");
    let new = PageIdentity::main("B");
    store.add_watch(1, old.clone(), None);
    let ctx = context(&store);

    PageMoveReconciler::new(&ctx).reconcile_move(&old, &new).await.unwrap();

    let snapshots = store.page_snapshots.lock();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].page, new);
    assert_eq!(snapshots[0].num_watches, 1);
}

#[tokio::test]
async fn move_carries_watches_the_replica_has_not_seen() {
    let store = Arc::new(MemoryStore::default());
    let old = PageIdentity::main("A");
    let new = PageIdentity::main("B");
    let since = Utc::now() - Duration::minutes(1);
    store.add_watch(1, old.clone(), None);
    // Written to the primary just before the move; the replica lags behind
    store.add_unreplicated_watch(2, old.clone(), Some(since));
    let ctx = context(&store);

    let carried = PageMoveReconciler::new(&ctx).reconcile_move(&old, &new).await.unwrap();
    assert_eq!(carried, 2);

    let status = ReviewTracker::new(&ctx).status(user(2), &new).await.unwrap();
    assert_eq!(status, ReviewStatus::Pending(since));
}

#[tokio::test]
async fn move_with_redirect_snapshots_both_pages() {
    let store = Arc::new(MemoryStore::default());
    let old = PageIdentity::main("Old");
    let new = PageIdentity::main("New");
    store.add_watch(1, old.clone(), None);
    let ctx = context(&store);
    let reconciler = PageMoveReconciler::new(&ctx);

    reconciler.reconcile_move_with_redirect(&old, &new).await.unwrap();

    let snapshots = store.page_snapshots.lock();
    let pages: Vec<&PageIdentity> = snapshots.iter().map(|s| &s.page).collect();
    assert_eq!(pages, vec![&new, &old]);
}

// ============================================================================
// Watch-state recording
// ============================================================================

#[tokio::test]
async fn record_all_runs_once_per_window() {
    let store = Arc::new(MemoryStore::default());
    store.add_watch(1, PageIdentity::main("A"), None);
    store.add_watch(2, PageIdentity::main("A"), Some(Utc::now() - Duration::hours(1)));
    let ctx = context(&store);
    let recorder = WatchStateRecorder::new(&ctx);

    assert!(recorder.record_all().await.unwrap());
    assert_eq!(store.user_snapshots.lock().len(), 2);
    assert_eq!(store.page_snapshots.lock().len(), 1);

    // Inside the refresh window: the pass is skipped
    assert!(!recorder.record_all().await.unwrap());
    assert_eq!(store.user_snapshots.lock().len(), 2);
}

#[tokio::test]
async fn record_review_snapshots_reviewer_and_page() {
    let store = Arc::new(MemoryStore::default());
    store.add_watch(7, PageIdentity::main("A"), None);
    store.add_watch(7, PageIdentity::main("B"), Some(Utc::now() - Duration::days(1)));
    let ctx = context(&store);
    let recorder = WatchStateRecorder::new(&ctx);

    recorder.record_review(user(7), &PageIdentity::main("A")).await.unwrap();

    let snapshots = store.user_snapshots.lock();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].user_id, user(7));
    assert_eq!(snapshots[0].num_watches, 2);
    assert_eq!(snapshots[0].num_pending, 1);

    let page_snapshots = store.page_snapshots.lock();
    assert_eq!(page_snapshots.len(), 1);
    assert_eq!(page_snapshots[0].page, PageIdentity::main("A"));
    assert_eq!(page_snapshots[0].num_watches, 1);
    assert_eq!(page_snapshots[0].num_reviewed, 1);
}

// ============================================================================
// Bulk pending-review clear
// ============================================================================

fn criteria(start: DateTime<Utc>, end: DateTime<Utc>) -> ClearCriteria {
    ClearCriteria {
        start,
        end,
        category: None,
        title_prefix: Some("Proc".to_string()),
    }
}

#[tokio::test]
async fn clear_rejects_bad_input_before_writing() {
    let store = Arc::new(MemoryStore::default());
    let pending_since = Utc::now() - Duration::days(2);
    store.add_watch(1, PageIdentity::main("Procedure"), Some(pending_since));
    let ctx = context(&store);
    let cleaner = PendingReviewsCleaner::new(&ctx);
    let now = Utc::now();

    // start after end
    let err = cleaner
        .clear(&criteria(now, now - Duration::days(7)))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DATE_RANGE");

    // no page filter at all
    let bare = ClearCriteria {
        start: now - Duration::days(7),
        end: now,
        category: None,
        title_prefix: None,
    };
    let err = cleaner.clear(&bare).await.unwrap_err();
    assert_eq!(err.error_code(), "MISSING_CLEAR_FILTER");

    // Nothing was cleared by either rejected call
    let watch = store
        .find_watch(user(1), &PageIdentity::main("Procedure"))
        .await
        .unwrap()
        .unwrap();
    assert!(watch.is_pending());
}

#[tokio::test]
async fn clear_applies_window_and_reports_impact() {
    let store = Arc::new(MemoryStore::default());
    let now = Utc::now();
    store.add_watch(1, PageIdentity::main("Procedure_1"), Some(now - Duration::days(2)));
    store.add_watch(2, PageIdentity::main("Procedure_1"), Some(now - Duration::days(3)));
    store.add_watch(1, PageIdentity::main("Procedure_2"), Some(now - Duration::days(40)));
    store.add_watch(1, PageIdentity::main("Other"), Some(now - Duration::days(2)));
    let ctx = context(&store);
    let cleaner = PendingReviewsCleaner::new(&ctx);

    let window = criteria(now - Duration::days(7), now);

    let preview = cleaner.preview(&window).await.unwrap();
    assert_eq!(preview.rows_cleared, 0);
    assert_eq!(preview.pages, vec![PageIdentity::main("Procedure_1")]);
    assert_eq!(preview.users.len(), 2);

    let outcome = cleaner.clear(&window).await.unwrap();
    assert_eq!(outcome.rows_cleared, 2);

    // Out-of-window and non-matching titles survive untouched
    let old = store
        .find_watch(user(1), &PageIdentity::main("Procedure_2"))
        .await
        .unwrap()
        .unwrap();
    assert!(old.is_pending());
    let other = store
        .find_watch(user(1), &PageIdentity::main("Other"))
        .await
        .unwrap()
        .unwrap();
    assert!(other.is_pending());
}
