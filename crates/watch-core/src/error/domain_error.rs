//! Domain errors - error types for the domain layer

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::{PageId, PageIdentity};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Policy Errors
    // =========================================================================
    #[error("Page cannot be watched: {0}")]
    NotWatchable(PageIdentity),

    // =========================================================================
    // Resolution Errors
    // =========================================================================
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("No page resolvable at identity: {0}")]
    UnresolvableIdentity(PageIdentity),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Bulk clear requires a category or title filter")]
    MissingClearFilter,

    // =========================================================================
    // Degradable Parse Errors
    // =========================================================================
    #[error("Unparseable move-target log parameters: {0:?}")]
    MalformedLogParameters(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotWatchable(_) => "NOT_WATCHABLE",
            Self::PageNotFound(_) => "UNKNOWN_PAGE",
            Self::UnresolvableIdentity(_) => "UNRESOLVABLE_IDENTITY",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::MissingClearFilter => "MISSING_CLEAR_FILTER",
            Self::MalformedLogParameters(_) => "MALFORMED_LOG_PARAMETERS",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a validation error (rejected before any write)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDateRange { .. } | Self::MissingClearFilter)
    }

    /// Check if this error degrades to an empty read result rather than
    /// propagating: unresolvable identities become deletion-branch entries,
    /// malformed log parameters become missing move targets.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableIdentity(_) | Self::MalformedLogParameters(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Namespace;
    use chrono::TimeZone;

    #[test]
    fn test_error_codes() {
        let err = DomainError::NotWatchable(PageIdentity::new(Namespace::new(-1), "Diff"));
        assert_eq!(err.code(), "NOT_WATCHABLE");

        let err = DomainError::MissingClearFilter;
        assert_eq!(err.code(), "MISSING_CLEAR_FILTER");
    }

    #[test]
    fn test_is_validation() {
        let start = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(DomainError::InvalidDateRange { start, end }.is_validation());
        assert!(DomainError::MissingClearFilter.is_validation());
        assert!(!DomainError::DatabaseError("boom".to_string()).is_validation());
    }

    #[test]
    fn test_is_degradable() {
        let identity = PageIdentity::main("Gone");
        assert!(DomainError::UnresolvableIdentity(identity).is_degradable());
        assert!(DomainError::MalformedLogParameters(String::new()).is_degradable());
        assert!(!DomainError::MissingClearFilter.is_degradable());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::PageNotFound(PageId::new(123));
        assert_eq!(err.to_string(), "Page not found: 123");
    }
}
