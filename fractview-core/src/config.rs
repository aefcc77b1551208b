use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tunables for viewport animation and gestures.
///
/// Every field has a serde default so partial settings files stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Exponential smoothing rate (1/s) for center, side and rotation.
    pub smoothing_rate: f64,
    /// Scroll zoom step: side is divided or multiplied by `1 + zoom_factor`.
    pub zoom_factor: f64,
    /// Committed selections narrower or shorter than this (px) are discarded.
    pub min_selection_px: f32,
    /// Side length at startup and after reset.
    pub initial_side: f64,
    /// Arrow-key pan distance as a fraction of the side length.
    pub nudge_fraction: f64,
    /// Julia seed movement per pointer pixel.
    pub seed_change_rate: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            smoothing_rate: 3.5,
            zoom_factor: 0.22,
            min_selection_px: 10.0,
            initial_side: 3.4,
            nudge_fraction: 0.05,
            seed_change_rate: 1e-4,
        }
    }
}

impl ViewConfig {
    /// Check every field against the range the viewport math relies on.
    pub fn validate(&self) -> crate::Result<()> {
        let checks = [
            ("smoothing_rate", self.smoothing_rate, self.smoothing_rate >= 0.0),
            ("zoom_factor", self.zoom_factor, self.zoom_factor > 0.0),
            (
                "min_selection_px",
                self.min_selection_px as f64,
                self.min_selection_px >= 0.0,
            ),
            ("initial_side", self.initial_side, self.initial_side > 0.0),
            ("nudge_fraction", self.nudge_fraction, true),
            (
                "seed_change_rate",
                self.seed_change_rate,
                self.seed_change_rate > 0.0,
            ),
        ];
        for (field, value, in_range) in checks {
            if !value.is_finite() || !in_range {
                return Err(CoreError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}
