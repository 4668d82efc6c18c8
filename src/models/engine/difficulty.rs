//! Difficulty profiles: playback speed plus the hit window sizes.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Allowed range for the speed multiplier.
pub const MIN_SPEED: f64 = 0.25;
pub const MAX_SPEED: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    pub name: String,
    /// Song and note speed, within `[MIN_SPEED, MAX_SPEED]`.
    pub speed_multiplier: f64,
    /// Half-width of the Perfect window, in seconds.
    pub perfect_window: f64,
    /// Half-width of the Good window, in seconds.
    pub good_window: f64,
    /// Divide both windows by the speed multiplier.
    pub scale_windows_with_speed: bool,
}

impl DifficultyProfile {
    /// Standard profile: 1.0x speed, 50ms perfect, 100ms good.
    pub fn normal() -> Self {
        Self {
            name: "Normal".to_string(),
            speed_multiplier: 1.0,
            perfect_window: 0.05,
            good_window: 0.1,
            scale_windows_with_speed: true,
        }
    }

    pub fn easy() -> Self {
        Self {
            name: "Easy".to_string(),
            speed_multiplier: 0.75,
            perfect_window: 0.07,
            good_window: 0.14,
            scale_windows_with_speed: true,
        }
    }

    pub fn hard() -> Self {
        Self {
            name: "Hard".to_string(),
            speed_multiplier: 1.5,
            perfect_window: 0.04,
            good_window: 0.08,
            scale_windows_with_speed: true,
        }
    }

    /// Looks up a built-in preset by case-insensitive name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "easy" => Some(Self::easy()),
            "normal" => Some(Self::normal()),
            "hard" => Some(Self::hard()),
            _ => None,
        }
    }

    /// Utility constructor for fully custom values.
    pub fn from_custom(speed_multiplier: f64, perfect_window: f64, good_window: f64, scale: bool) -> Self {
        Self {
            name: "Custom".to_string(),
            speed_multiplier,
            perfect_window,
            good_window,
            scale_windows_with_speed: scale,
        }
    }

    pub fn scaled_perfect_window(&self) -> f64 {
        self.scale(self.perfect_window)
    }

    pub fn scaled_good_window(&self) -> f64 {
        self.scale(self.good_window)
    }

    fn scale(&self, window: f64) -> f64 {
        if self.scale_windows_with_speed {
            window / self.speed_multiplier
        } else {
            window
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed_multiplier) {
            return Err(EngineError::invalid(format!(
                "speed multiplier {} outside [{MIN_SPEED}, {MAX_SPEED}]",
                self.speed_multiplier
            )));
        }
        if !(self.perfect_window.is_finite() && self.perfect_window > 0.0) {
            return Err(EngineError::invalid(format!(
                "perfect window must be positive, got {}",
                self.perfect_window
            )));
        }
        if !(self.good_window.is_finite() && self.good_window >= self.perfect_window) {
            return Err(EngineError::invalid(format!(
                "good window {} must be at least the perfect window {}",
                self.good_window, self.perfect_window
            )));
        }
        Ok(())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::normal()
    }
}
