//! # watch-service
//!
//! Application layer containing the analytics services: review tracking,
//! engagement scoring, page score badges, pending-review resolution, watch
//! suggestions, page-move reconciliation, and watch-state maintenance.

pub mod services;

pub use services::{
    ClearOutcome, EngagementScorer, PageMoveReconciler, PageScoreCalculator, PageScoreContext,
    PendingReviewResolver, PendingReviewsCleaner, ReviewSnapshot, ReviewTracker, ServiceContext,
    ServiceError, ServiceResult, WatchStateRecorder, WatchSuggester,
};
