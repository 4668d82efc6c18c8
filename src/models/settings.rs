//! Engine settings loaded from `config.toml`.

use crate::error::Result;
use crate::models::engine::{DifficultyProfile, PlayerZone};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Distance from the zone center at which 1.0x notes spawn.
    pub spawn_distance: f32,
    pub zone_center: Vec2,
    pub zone_half_extents: Vec2,
    /// How long a hit note stays visible after resolution (s).
    pub hit_feedback_seconds: f64,
    /// How long a missed note stays visible after resolution (s).
    pub miss_feedback_seconds: f64,
    /// Extra time after the song end before the level completes (s).
    pub completion_grace_seconds: f64,
    /// Logic ticks per second in the headless driver.
    pub tick_rate: u32,
    pub practice_mode: bool,
    pub difficulty: DifficultyProfile,
}

impl EngineSettings {
    pub fn new() -> Self {
        Self {
            spawn_distance: 10.0,
            zone_center: Vec2::ZERO,
            zone_half_extents: Vec2::ONE,
            hit_feedback_seconds: 0.1,
            miss_feedback_seconds: 0.3,
            completion_grace_seconds: 1.0,
            tick_rate: 200,
            practice_mode: true,
            difficulty: DifficultyProfile::normal(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("SETTINGS: {:?} not found, using defaults", path);
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        match Self::from_toml_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::error!("Failed to parse TOML file {:?}: {}", path, e);
                Err(e)
            }
        }
    }

    pub fn player_zone(&self) -> PlayerZone {
        PlayerZone::new(self.zone_center, self.zone_half_extents)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = EngineSettings::from_toml_str(
            r#"
spawn_distance = 6.0
practice_mode = false

[difficulty]
name = "Hard"
speed_multiplier = 1.5
"#,
        )
        .unwrap();

        assert_eq!(settings.spawn_distance, 6.0);
        assert!(!settings.practice_mode);
        assert_eq!(settings.tick_rate, 200);
        assert_eq!(settings.difficulty.speed_multiplier, 1.5);
        assert_eq!(settings.difficulty.good_window, 0.1);
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(EngineSettings::from_toml_str("spawn_distance = \"far\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = EngineSettings::load_or_default(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let settings = EngineSettings::from_toml_str(include_str!("../../config.toml")).unwrap();
        assert_eq!(settings, EngineSettings::default());
    }
}
