//! Tuning constants for the morph animation.
//!
//! These are built from `Default` only; the program takes no external input.

use serde::{Deserialize, Serialize};

use crate::compute::{Palette, Rgb};

fn default_title() -> String {
    "Morph Animation: Diamond to Club".to_string()
}

/// Top-level animation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphConfig {
    /// Phase advance per tick.
    pub step: f32,
    /// Ticks to hold at each terminus and checkpoint.
    pub pause_ticks: u32,
    /// Timer interval in milliseconds.
    pub tick_interval_ms: u64,
    /// How mid-path checkpoints (1/3, 2/3) are detected.
    #[serde(default)]
    pub pause_rule: PauseRule,
    /// Keyframe colors for diamond, heart and spade.
    pub palette: Palette,
    /// Presentation surface parameters.
    pub window: WindowConfig,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            step: 0.005,
            pause_ticks: 60,
            tick_interval_ms: 16,
            pause_rule: PauseRule::default(),
            palette: Palette::default(),
            window: WindowConfig::default(),
        }
    }
}

/// Window and background parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear color.
    pub background: Rgb,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: 500,
            height: 500,
            background: Rgb::WHITE,
        }
    }
}

/// Checkpoint detection strategy for the phase driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseRule {
    /// Pause when the phase lands within one default step (0.005) of a
    /// checkpoint. Can fire on two consecutive ticks around the same checkpoint.
    /// Holds twice at each checkpoint, so a full cycle at default settings
    /// takes 942 ticks instead of 702.
    Proximity,
    /// Pause on the tick whose step reaches or passes a checkpoint.
    /// Fires exactly once per pass.
    #[default]
    Crossing,
}

impl MorphConfig {
    /// Timer interval as a `Duration`.
    #[inline]
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step > 0.0 && self.step < 1.0) {
            return Err(ConfigError::InvalidStep(self.step));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        let colors = self
            .palette
            .keyframes()
            .into_iter()
            .chain(std::iter::once(self.window.background));
        for (i, color) in colors.enumerate() {
            if !color.is_normalized() {
                return Err(ConfigError::ColorOutOfRange { index: i });
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Phase step must be in (0, 1), got {0}")]
    InvalidStep(f32),
    #[error("Tick interval must be non-zero")]
    InvalidInterval,
    #[error("Window dimensions must be non-zero")]
    InvalidDimensions,
    #[error("Color {index} has a channel outside [0, 1]")]
    ColorOutOfRange { index: usize },
}
