//! Color scale - threshold table mapping scores to severity colors
//!
//! A scale is an ordered list of `(threshold, color)` bands. Looking up a
//! score walks the bands from the highest threshold down and returns the
//! first band whose threshold is `<=` the score. A score below every band
//! falls back to the most severe color.

use serde::{Deserialize, Serialize};

/// Color returned when a score is below every configured threshold
pub const FALLBACK_COLOR: &str = "danger";

/// One `(threshold, color)` entry in a scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBand {
    pub threshold: f64,
    pub color: String,
}

impl ColorBand {
    pub fn new(threshold: f64, color: impl Into<String>) -> Self {
        Self {
            threshold,
            color: color.into(),
        }
    }
}

/// Ordered threshold table for badge coloring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    bands: Vec<ColorBand>,
}

impl ColorScale {
    /// Build a scale from bands, sorting them descending by threshold.
    /// Band order as supplied does not matter; lookup is always highest-first.
    pub fn new(mut bands: Vec<ColorBand>) -> Self {
        bands.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        Self { bands }
    }

    /// Resolve the color for a score: first band (highest threshold first)
    /// whose threshold is `<=` the score, otherwise [`FALLBACK_COLOR`].
    pub fn color_for(&self, score: f64) -> &str {
        self.bands
            .iter()
            .find(|band| score >= band.threshold)
            .map_or(FALLBACK_COLOR, |band| band.color.as_str())
    }

    pub fn bands(&self) -> &[ColorBand] {
        &self.bands
    }
}
