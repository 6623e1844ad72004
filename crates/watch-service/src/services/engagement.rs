//! Engagement scoring service
//!
//! Aggregates per-user pending-watch state into decayed engagement scores.

use std::collections::HashMap;

use tracing::instrument;

use watch_core::entities::{compute_engagement_score, EngagementInputs};
use watch_core::value_objects::UserId;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Engagement scoring service
pub struct EngagementScorer<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementScorer<'a> {
    /// Create a new EngagementScorer
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Score every user in one grouped pass over the watch store.
    ///
    /// Page-level scoring runs this for whole result sets, so the aggregate
    /// is a single query rather than per-user round trips. Users without any
    /// watch rows are absent from the map; callers treat them as `1.0`.
    #[instrument(skip(self))]
    pub async fn scores_for_all_users(&self) -> ServiceResult<HashMap<UserId, f64>> {
        let inputs = self.ctx.watch_store().pending_stats_by_user().await?;

        Ok(inputs
            .iter()
            .map(|i| (i.user_id, compute_engagement_score(i)))
            .collect())
    }

    /// Score a single user
    #[instrument(skip(self))]
    pub async fn score_for(&self, user_id: UserId) -> ServiceResult<f64> {
        let stats = self.ctx.watch_store().user_watch_stats(user_id).await?;

        let minutes_in_day = f64::from(60 * 24);
        let inputs = EngagementInputs {
            user_id,
            pending_count: stats.num_pending,
            avg_pending_age_days: (stats.num_pending > 0)
                .then(|| stats.avg_pending_minutes / minutes_in_day),
        };

        Ok(compute_engagement_score(&inputs))
    }
}
