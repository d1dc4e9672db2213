//! Editor configuration.
//!
//! Every tunable that used to be a module constant lives here so that several
//! editors with different settings can coexist in one process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {name} range: {min} to {max}")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("`{0}` must be positive")]
    NotPositive(&'static str),
}

/// Coordinate space in which the line/pencil hit threshold is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitToleranceSpace {
    /// Threshold is in canvas units; on screen it shrinks as the user zooms in.
    #[default]
    Canvas,
    /// Threshold is in screen pixels and divided by the zoom before testing.
    Screen,
}

/// Settings shared by the camera, history, hit testing and the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of snapshots kept by the history.
    pub history_cap: usize,
    /// Distance under which a point hits a line, arrow or pencil stroke.
    pub hit_threshold: f64,
    /// Space the hit threshold is expressed in.
    pub hit_tolerance_space: HitToleranceSpace,
    /// Padding added around every bounding box (canvas units).
    pub bbox_padding: f64,
    /// Minimum zoom scale.
    pub min_scale: f64,
    /// Maximum zoom scale.
    pub max_scale: f64,
    /// Rectangles and circles must exceed this on both drag axes (canvas units).
    pub min_shape_size: f64,
    /// Marquee drags below this on both axes count as a click (screen pixels).
    pub marquee_threshold: f64,
    /// Two clicks on one text shape within this window form a double-click.
    pub double_click_ms: u64,
    /// Half-size of the resize handles (screen pixels).
    pub handle_size: f64,
    /// Font size for newly placed text.
    pub default_font_size: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub min_resize_factor: f64,
    pub max_resize_factor: f64,
    /// Zoom factor applied per wheel notch.
    pub zoom_step: f64,
    /// Caret blink half-period.
    pub caret_blink_ms: u64,
    /// Spaces inserted by the Tab key.
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_cap: 50,
            hit_threshold: 5.0,
            hit_tolerance_space: HitToleranceSpace::default(),
            bbox_padding: 5.0,
            min_scale: 0.1,
            max_scale: 30.0,
            min_shape_size: 5.0,
            marquee_threshold: 5.0,
            double_click_ms: 400,
            handle_size: 8.0,
            default_font_size: 20.0,
            min_font_size: 8.0,
            max_font_size: 200.0,
            min_resize_factor: 0.2,
            max_resize_factor: 5.0,
            zoom_step: 1.1,
            caret_blink_ms: 500,
            tab_width: 4,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every clamp range is positive and ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, min, max) in self.ranges() {
            if !valid_range(min, max) {
                return Err(ConfigError::InvalidRange { name, min, max });
            }
        }
        if !(self.zoom_step > 0.0 && self.zoom_step.is_finite()) {
            return Err(ConfigError::NotPositive("zoom_step"));
        }
        if self.history_cap == 0 {
            return Err(ConfigError::NotPositive("history_cap"));
        }
        Ok(())
    }

    /// Replace every invalid setting with its default.
    pub fn sanitized(self) -> Self {
        if let Err(err) = self.validate() {
            log::warn!("{err}; falling back to defaults for invalid settings");
        }
        let defaults = Self::default();
        let mut config = self;
        if !valid_range(config.min_scale, config.max_scale) {
            config.min_scale = defaults.min_scale;
            config.max_scale = defaults.max_scale;
        }
        if !valid_range(config.min_font_size, config.max_font_size) {
            config.min_font_size = defaults.min_font_size;
            config.max_font_size = defaults.max_font_size;
        }
        if !valid_range(config.min_resize_factor, config.max_resize_factor) {
            config.min_resize_factor = defaults.min_resize_factor;
            config.max_resize_factor = defaults.max_resize_factor;
        }
        if !(config.zoom_step > 0.0 && config.zoom_step.is_finite()) {
            config.zoom_step = defaults.zoom_step;
        }
        if config.history_cap == 0 {
            config.history_cap = defaults.history_cap;
        }
        config
    }

    fn ranges(&self) -> [(&'static str, f64, f64); 3] {
        [
            ("scale", self.min_scale, self.max_scale),
            ("font size", self.min_font_size, self.max_font_size),
            ("resize factor", self.min_resize_factor, self.max_resize_factor),
        ]
    }

    /// Hit threshold in canvas units for the given zoom scale.
    pub fn canvas_hit_threshold(&self, scale: f64) -> f64 {
        match self.hit_tolerance_space {
            HitToleranceSpace::Canvas => self.hit_threshold,
            HitToleranceSpace::Screen => self.hit_threshold / scale,
        }
    }
}

/// `min` is positive and no larger than a finite `max`. NaN fails.
fn valid_range(min: f64, max: f64) -> bool {
    min > 0.0 && max.is_finite() && min <= max
}
