//! Configuration loading

mod app_config;

pub use app_config::{
    AnalyticsConfig, AppSettings, ConfigError, DatabaseConfig, Environment, PendingConfig,
    ScoringConfig,
};
