//! Error handling utilities for stores

use sqlx::Error as SqlxError;
use watch_core::error::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}
