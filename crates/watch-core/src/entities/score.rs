//! Scoring entities - engagement scores, page badges, and watch statistics

use chrono::{DateTime, Utc};

use crate::value_objects::{PageIdentity, UserId};

/// Decay constant applied to the pending-watch count
const PENDING_COUNT_DECAY: f64 = 0.01;

/// Decay constant applied to the whole-days mean pending age
const PENDING_AGE_DECAY: f64 = 0.01;

/// Aggregate inputs for one user's engagement score, as produced by a single
/// grouped pass over the watch store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementInputs {
    pub user_id: UserId,
    /// Watches with a non-null notification timestamp
    pub pending_count: i64,
    /// Mean age in days over those pending watches; `None` when there are none
    pub avg_pending_age_days: Option<f64>,
}

/// Compute a user's engagement score in `(0, 1]`.
///
/// `exp(-0.01 * pending_count) * exp(-0.01 * floor(avg_age_days))`, rounded
/// to three decimals. A user with zero pending watches scores exactly `1.0`;
/// the age term never applies to an empty aggregate, so no NaN can escape.
pub fn compute_engagement_score(inputs: &EngagementInputs) -> f64 {
    if inputs.pending_count == 0 {
        return 1.0;
    }

    let avg_days = inputs.avg_pending_age_days.unwrap_or(0.0).max(0.0).floor();
    let raw = (-PENDING_COUNT_DECAY * inputs.pending_count as f64).exp()
        * (-PENDING_AGE_DECAY * avg_days).exp();

    (raw * 1000.0).round() / 1000.0
}

/// The two derived page scores, prior to color mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageScoreBadges {
    /// Engagement-weighted watch quality: sum of the watchers' engagement
    /// scores, rounded to one decimal
    pub scrutiny: f64,
    /// Watchers who have seen the latest change
    pub reviews: i64,
}

/// Per-user watch statistics, driving the pending-reviews emphasis cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserWatchStats {
    pub user_id: UserId,
    pub num_watches: i64,
    pub num_pending: i64,
    pub max_pending_minutes: i64,
    pub avg_pending_minutes: f64,
}

impl UserWatchStats {
    /// Empty stats for a user with no watches at all
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            num_watches: 0,
            num_pending: 0,
            max_pending_minutes: 0,
            avg_pending_minutes: 0.0,
        }
    }

    /// Age of the oldest pending change, in whole days rounded up
    pub fn max_pending_days(&self) -> i64 {
        // `i64::div_ceil` is gated as unstable on this toolchain; this is its
        // documented equivalent for a positive divisor.
        let minutes_per_day = 60 * 24;
        let quotient = self.max_pending_minutes / minutes_per_day;
        let remainder = self.max_pending_minutes % minutes_per_day;
        if remainder > 0 {
            quotient + 1
        } else {
            quotient
        }
    }
}

/// Per-page watch statistics, recorded by the state snapshot pass
#[derive(Debug, Clone, PartialEq)]
pub struct PageWatchStats {
    pub page: PageIdentity,
    pub num_watches: i64,
    pub num_reviewed: i64,
    pub percent_pending: f64,
    pub max_pending_minutes: i64,
    pub avg_pending_minutes: f64,
    pub recorded_at: DateTime<Utc>,
}
