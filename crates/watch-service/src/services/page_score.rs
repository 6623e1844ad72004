//! Page score badge service
//!
//! Combines watcher engagement scores and raw review counts into the two
//! color-coded page badges.

use tracing::instrument;

use watch_core::entities::PageScoreBadges;
use watch_core::value_objects::PageIdentity;

use super::context::ServiceContext;
use super::engagement::EngagementScorer;
use super::error::ServiceResult;

/// Per-render scoring context.
///
/// Suppression is decided once before scoring, typically from an opt-out
/// marker in the page content, and never mutated afterwards. There is no
/// process-wide suppression switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageScoreContext {
    suppressed: bool,
}

impl PageScoreContext {
    /// Context for a page that shows its score badges
    pub fn visible() -> Self {
        Self { suppressed: false }
    }

    /// Context for a page that opted out of score badges
    pub fn suppressed() -> Self {
        Self { suppressed: true }
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}

/// Page score badge service
pub struct PageScoreCalculator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PageScoreCalculator<'a> {
    /// Create a new PageScoreCalculator
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Compute both badges for a page, or `None` when the render context
    /// suppresses scoring.
    ///
    /// Scrutiny is the sum of the watchers' engagement scores, rounded to one
    /// decimal; reviews is the count of watchers who have seen the latest
    /// change, independent of any single viewer's own status.
    #[instrument(skip(self, render))]
    pub async fn badges(
        &self,
        page: &PageIdentity,
        render: &PageScoreContext,
    ) -> ServiceResult<Option<PageScoreBadges>> {
        if render.is_suppressed() {
            return Ok(None);
        }

        let watchers = self.ctx.watch_store().watchers_of(page).await?;
        let scores = EngagementScorer::new(self.ctx).scores_for_all_users().await?;

        // A watcher without an aggregate row has nothing pending anywhere.
        let scrutiny: f64 = watchers
            .iter()
            .map(|w| scores.get(&w.user_id).copied().unwrap_or(1.0))
            .sum();
        let scrutiny = (scrutiny * 10.0).round() / 10.0;

        let reviews = self.ctx.watch_store().reviewed_watcher_count(page).await?;

        Ok(Some(PageScoreBadges { scrutiny, reviews }))
    }

    /// Resolve the badge color for a scrutiny score
    pub fn scrutiny_color(&self, score: f64) -> &str {
        self.ctx.scoring().scrutiny_colors.color_for(score)
    }

    /// Resolve the badge color for a review count
    pub fn review_color(&self, reviews: i64) -> &str {
        self.ctx.scoring().review_colors.color_for(reviews as f64)
    }
}
