//! Connection pool management

mod postgres;

pub use postgres::{create_pools, PgPool, StorePools};
