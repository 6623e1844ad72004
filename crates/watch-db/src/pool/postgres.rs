//! PostgreSQL connection pool management
//!
//! Holds a reader/writer pool pair. When no replica URL is configured the
//! reader is a clone of the writer pool, so callers never special-case the
//! single-database deployment.

pub use sqlx::postgres::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use watch_common::DatabaseConfig;

/// Reader/writer pool pair for the store implementations
#[derive(Debug, Clone)]
pub struct StorePools {
    reader: PgPool,
    writer: PgPool,
}

impl StorePools {
    pub fn new(reader: PgPool, writer: PgPool) -> Self {
        Self { reader, writer }
    }

    /// Pool for replica reads
    pub fn reader(&self) -> &PgPool {
        &self.reader
    }

    /// Pool for primary writes and read-after-write paths
    pub fn writer(&self) -> &PgPool {
        &self.writer
    }
}

async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .connect(url)
        .await
}

/// Create the reader/writer pool pair from configuration
pub async fn create_pools(config: &DatabaseConfig) -> Result<StorePools, sqlx::Error> {
    let writer = connect(&config.url, config).await?;

    let reader = match &config.replica_url {
        Some(replica_url) => connect(replica_url, config).await?,
        None => writer.clone(),
    };

    Ok(StorePools::new(reader, writer))
}
