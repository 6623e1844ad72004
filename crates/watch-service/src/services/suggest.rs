//! Watch suggestion service
//!
//! Harvests candidate pages from the link graph around a user's watchlist
//! and ranks them by watch need.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use watch_core::entities::{rank_by_watch_need, Page, WatchSuggestionCandidate};
use watch_core::value_objects::{Namespace, PageId, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Watch suggestion service
pub struct WatchSuggester<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WatchSuggester<'a> {
    /// Create a new WatchSuggester
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Suggest pages for a user to watch, best candidates first.
    ///
    /// Candidates come from the link graph around the user's main-namespace
    /// watchlist; a user watching nothing gets every main-namespace page as
    /// an equally-weighted candidate. Ranking is one stable two-key sort:
    /// least-watched first, highest watch need within ties. Redirects,
    /// non-main pages, and identities that no longer resolve are skipped
    /// during truncation, after sorting.
    #[instrument(skip(self))]
    pub async fn suggestions(&self, user_id: UserId) -> ServiceResult<Vec<Page>> {
        let watchlist = self
            .ctx
            .watch_store()
            .user_watchlist(user_id, Namespace::MAIN)
            .await?;

        let link_counts = if watchlist.is_empty() {
            self.uniform_candidates().await?
        } else {
            self.linked_candidates(&watchlist.iter().map(|w| w.page_id).collect::<HashSet<_>>())
                .await?
        };

        let candidate_ids: Vec<PageId> = link_counts.keys().copied().collect();
        let stats = self.ctx.page_store().watch_view_stats(&candidate_ids).await?;

        let mut candidates: Vec<WatchSuggestionCandidate> = stats
            .iter()
            .map(|s| WatchSuggestionCandidate {
                page_id: s.page_id,
                num_links: link_counts.get(&s.page_id).copied().unwrap_or(1),
                num_watches: s.num_watches,
                num_views: s.num_views,
            })
            .collect();

        rank_by_watch_need(&mut candidates);

        let limit = self.ctx.pending().suggestion_limit;
        let mut suggestions = Vec::with_capacity(limit);
        for candidate in candidates {
            if suggestions.len() == limit {
                break;
            }
            let Some(page) = self.ctx.page_store().find_by_id(candidate.page_id).await? else {
                continue;
            };
            if !page.is_suggestible() {
                continue;
            }
            suggestions.push(page);
        }

        Ok(suggestions)
    }

    /// Users ranked by number of watched non-redirect pages
    #[instrument(skip(self))]
    pub async fn top_watchers(&self, limit: i64) -> ServiceResult<Vec<(UserId, i64)>> {
        Ok(self.ctx.watch_store().top_watchers(limit).await?)
    }

    /// Link counts for pages linked to or from the watchlist, excluding
    /// pages already on it
    async fn linked_candidates(
        &self,
        watched: &HashSet<PageId>,
    ) -> ServiceResult<HashMap<PageId, i64>> {
        let watched_ids: Vec<PageId> = watched.iter().copied().collect();
        let links = self.ctx.link_graph_store().links_touching(&watched_ids).await?;

        let mut counts: HashMap<PageId, i64> = HashMap::new();
        for (from, to) in links {
            // Each row contributes the end that is not on the watchlist.
            if watched.contains(&from) && !watched.contains(&to) {
                *counts.entry(to).or_insert(0) += 1;
            }
            if watched.contains(&to) && !watched.contains(&from) {
                *counts.entry(from).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }

    /// Every main-namespace page, uniformly weighted
    async fn uniform_candidates(&self) -> ServiceResult<HashMap<PageId, i64>> {
        let ids = self.ctx.page_store().page_ids_in(Namespace::MAIN).await?;
        Ok(ids.into_iter().map(|id| (id, 1)).collect())
    }
}
