//! Analytics services
//!
//! This module contains the service layer implementations that orchestrate
//! the store traits into the watch/review analytics operations.

pub mod context;
pub mod engagement;
pub mod error;
pub mod maintenance;
pub mod page_score;
pub mod pending;
pub mod reconcile;
pub mod review;
pub mod suggest;

// Re-export all services for convenience
pub use context::ServiceContext;
pub use engagement::EngagementScorer;
pub use error::{ServiceError, ServiceResult};
pub use maintenance::{ClearOutcome, PendingReviewsCleaner, WatchStateRecorder};
pub use page_score::{PageScoreCalculator, PageScoreContext};
pub use pending::PendingReviewResolver;
pub use reconcile::PageMoveReconciler;
pub use review::{ReviewSnapshot, ReviewTracker};
pub use suggest::WatchSuggester;
