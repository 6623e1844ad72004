//! # watch-db
//!
//! Database layer implementing the store traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the store traits
//! defined in `watch-core`. It handles:
//!
//! - Reader (replica) and writer (primary) pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Store implementations
//!
//! Reads go to the replica pool; anything that mutates watch state goes to
//! the primary so a clear or reconciliation is never followed by a stale
//! dependent read.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use watch_db::pool::{create_pools, StorePools};
//! use watch_db::PgWatchStore;
//! use watch_common::DatabaseConfig;
//!
//! async fn example(config: &DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pools = create_pools(config).await?;
//!     let watch_store = PgWatchStore::new(pools.clone());
//!
//!     // Use the store...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod stores;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// Re-export commonly used types
pub use pool::{create_pools, PgPool, StorePools};
pub use stores::{PgChangeLogStore, PgLinkGraphStore, PgPageStore, PgStatsStore, PgWatchStore};
