//! Watch suggestions - candidate pages and watch-need ranking

use crate::value_objects::PageId;

/// A page linked to or from a user's watchlist but not yet watched by them.
/// Transient, built per suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSuggestionCandidate {
    pub page_id: PageId,
    /// Inbound + outbound links connecting this page to the watchlist
    pub num_links: i64,
    pub num_watches: i64,
    pub num_views: i64,
}

impl WatchSuggestionCandidate {
    /// Ranking heuristic: linear in link count, quadratic in view count.
    /// Popular pages that few watchlist pages reach are deliberately
    /// over-weighted.
    pub fn watch_need(&self) -> i64 {
        self.num_links.saturating_mul(self.num_views.saturating_mul(self.num_views))
    }
}

/// Order candidates for suggestion: ascending watcher count first, then
/// descending watch need within ties. One stable multi-key sort over the
/// whole set, never two passes.
pub fn rank_by_watch_need(candidates: &mut [WatchSuggestionCandidate]) {
    candidates.sort_by(|a, b| {
        a.num_watches
            .cmp(&b.num_watches)
            .then_with(|| b.watch_need().cmp(&a.watch_need()))
    });
}
