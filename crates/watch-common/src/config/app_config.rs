//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;

use watch_core::{ColorBand, ColorScale};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub scoring: ScoringConfig,
    pub pending: PendingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Primary (writer) connection URL
    pub url: String,
    /// Optional replica URL for reads; falls back to the primary when absent
    #[serde(default)]
    pub replica_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Badge-coloring threshold tables
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Thresholds for the engagement-weighted scrutiny score
    pub scrutiny_colors: ColorScale,
    /// Thresholds for the raw review count
    pub review_colors: ColorScale,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            scrutiny_colors: ColorScale::new(vec![
                ColorBand::new(5.0, "excellent"),
                ColorBand::new(2.0, "good"),
                ColorBand::new(1.0, "okay"),
                ColorBand::new(0.0, "warning"),
            ]),
            review_colors: ColorScale::new(vec![
                ColorBand::new(4.0, "excellent"),
                ColorBand::new(2.0, "good"),
                ColorBand::new(1.0, "okay"),
                ColorBand::new(0.0, "warning"),
            ]),
        }
    }
}

/// Pending-review behavior knobs
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PendingConfig {
    /// Maximum number of watch suggestions returned
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    /// Pending age (days) past which the review queue gets visual emphasis
    #[serde(default = "default_emphasize_days")]
    pub emphasize_days: i64,
    /// Minimum minutes between full watch-state snapshot passes
    #[serde(default = "default_refresh_window_minutes")]
    pub refresh_window_minutes: i64,
}

impl Default for PendingConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: default_suggestion_limit(),
            emphasize_days: default_emphasize_days(),
            refresh_window_minutes: default_refresh_window_minutes(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "watch-analytics".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_suggestion_limit() -> usize {
    20
}

fn default_emphasize_days() -> i64 {
    7
}

fn default_refresh_window_minutes() -> i64 {
    60
}

impl AnalyticsConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                replica_url: env::var("DATABASE_REPLICA_URL").ok(),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            scoring: Self::scoring_from_env()?,
            pending: PendingConfig {
                suggestion_limit: env::var("SUGGESTION_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_suggestion_limit),
                emphasize_days: env::var("PENDING_EMPHASIZE_DAYS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_emphasize_days),
                refresh_window_minutes: env::var("STATS_REFRESH_WINDOW_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_refresh_window_minutes),
            },
        })
    }

    /// Color tables come from env as JSON arrays of `{threshold, color}`
    /// objects; unset variables use the built-in defaults.
    fn scoring_from_env() -> Result<ScoringConfig, ConfigError> {
        let defaults = ScoringConfig::default();

        let scrutiny_colors = match env::var("SCRUTINY_COLOR_BANDS") {
            Ok(raw) => parse_color_bands("SCRUTINY_COLOR_BANDS", &raw)?,
            Err(_) => defaults.scrutiny_colors,
        };
        let review_colors = match env::var("REVIEW_COLOR_BANDS") {
            Ok(raw) => parse_color_bands("REVIEW_COLOR_BANDS", &raw)?,
            Err(_) => defaults.review_colors,
        };

        Ok(ScoringConfig {
            scrutiny_colors,
            review_colors,
        })
    }
}

fn parse_color_bands(var: &'static str, raw: &str) -> Result<ColorScale, ConfigError> {
    let bands: Vec<ColorBand> =
        serde_json::from_str(raw).map_err(|_| ConfigError::InvalidVar(var))?;
    Ok(ColorScale::new(bands))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidVar(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_tables() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.scrutiny_colors.color_for(5.0), "excellent");
        assert_eq!(scoring.scrutiny_colors.color_for(1.5), "okay");
        assert_eq!(scoring.review_colors.color_for(3.0), "good");
        assert_eq!(scoring.review_colors.color_for(-1.0), "danger");
    }

    #[test]
    fn test_default_pending_knobs() {
        let pending = PendingConfig::default();
        assert_eq!(pending.suggestion_limit, 20);
        assert_eq!(pending.emphasize_days, 7);
        assert_eq!(pending.refresh_window_minutes, 60);
    }

    #[test]
    fn test_parse_color_bands() {
        let scale = parse_color_bands(
            "TEST",
            r#"[{"threshold": 90.0, "color": "good"}, {"threshold": 50.0, "color": "warn"}]"#,
        )
        .unwrap();
        assert_eq!(scale.color_for(95.0), "good");
        assert_eq!(scale.color_for(60.0), "warn");
        assert_eq!(scale.color_for(10.0), "danger");
    }

    #[test]
    fn test_parse_color_bands_rejects_garbage() {
        assert!(parse_color_bands("TEST", "not json").is_err());
    }

    #[test]
    fn test_environment_helpers() {
        assert!(Environment::Production.is_production());
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_production());
    }
}
