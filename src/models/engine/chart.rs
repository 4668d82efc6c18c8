//! Chart data: song tempo metadata plus the notes to play.
//!
//! Charts are plain serde structures loaded from TOML or JSON. Once a level
//! starts the chart is shared immutably (`Arc<Chart>`) between the spawner
//! and the orchestrator.

use crate::error::{EngineError, Result};
use crate::models::engine::beat::{self, CardinalDirection};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default time between a note spawning and its hit instant, in seconds.
pub const DEFAULT_APPROACH_TIME: f64 = 1.0;

fn default_approach_time() -> f64 {
    DEFAULT_APPROACH_TIME
}

fn default_multiplier() -> f64 {
    1.0
}

/// A single note as authored in the chart. Never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Beat at which the note must be hit.
    pub beat_time: f64,
    /// Direction the note comes from, in degrees (0 = +X, counter-clockwise).
    #[serde(default)]
    pub approach_angle: f64,
    /// Per-note speed; faster notes spawn further out and arrive sooner after spawning.
    #[serde(default = "default_multiplier")]
    pub speed_multiplier: f64,
    /// Visual and hit-box scale (1 = default).
    #[serde(default = "default_multiplier")]
    pub size_multiplier: f64,
    /// Extra offset applied to the spawn position.
    #[serde(default)]
    pub position_offset: Vec2,
}

impl Note {
    pub fn new(beat_time: f64, approach_angle: f64) -> Self {
        Self {
            beat_time,
            approach_angle,
            speed_multiplier: 1.0,
            size_multiplier: 1.0,
            position_offset: Vec2::ZERO,
        }
    }

    pub fn with_speed(mut self, speed_multiplier: f64) -> Self {
        self.speed_multiplier = speed_multiplier;
        self
    }

    pub fn with_size(mut self, size_multiplier: f64) -> Self {
        self.size_multiplier = size_multiplier;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.position_offset = offset;
        self
    }

    /// Unit vector pointing from the player zone towards the spawn point.
    pub fn approach_direction(&self) -> Vec2 {
        let radians = self.approach_angle.to_radians();
        Vec2::new(radians.cos() as f32, radians.sin() as f32)
    }

    /// Hit time at the chart's base tempo, ignoring offset and difficulty speed.
    pub fn time_in_seconds(&self, bpm: f64) -> f64 {
        beat::beats_to_seconds(self.beat_time, bpm)
    }

    fn validate(&self, index: usize) -> Result<()> {
        if !self.beat_time.is_finite() || self.beat_time < 0.0 {
            return Err(EngineError::invalid(format!(
                "note {index}: beat time {} must be a non-negative number",
                self.beat_time
            )));
        }
        if !(0.0..360.0).contains(&self.approach_angle) {
            return Err(EngineError::invalid(format!(
                "note {index}: approach angle {} outside [0, 360)",
                self.approach_angle
            )));
        }
        if !(self.speed_multiplier.is_finite() && self.speed_multiplier > 0.0) {
            return Err(EngineError::invalid(format!(
                "note {index}: speed multiplier {} must be positive",
                self.speed_multiplier
            )));
        }
        if !(self.size_multiplier.is_finite() && self.size_multiplier > 0.0) {
            return Err(EngineError::invalid(format!(
                "note {index}: size multiplier {} must be positive",
                self.size_multiplier
            )));
        }
        Ok(())
    }
}

/// A complete level: tempo, offset and the notes sorted by beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Beats per minute at 1.0x speed.
    pub bpm: f64,
    /// Song time of beat 0, in seconds.
    #[serde(default)]
    pub offset_seconds: f64,
    /// Base approach time in seconds before difficulty scaling.
    #[serde(default = "default_approach_time")]
    pub default_approach_time: f64,
    /// Length of the backing track, when known.
    #[serde(default)]
    pub song_length_seconds: Option<f64>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Chart {
    pub fn new(bpm: f64, offset_seconds: f64, notes: Vec<Note>) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            bpm,
            offset_seconds,
            default_approach_time: DEFAULT_APPROACH_TIME,
            song_length_seconds: None,
            notes,
        }
    }

    /// Loads a chart from a `.toml` or `.json` file.
    ///
    /// Notes are sorted by beat after parsing, then the chart is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let chart = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        log::info!(
            "CHART: Loaded '{}' ({} notes, {:.1} BPM) from {:?}",
            chart.name,
            chart.notes.len(),
            chart.bpm,
            path
        );
        Ok(chart)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut chart: Chart = toml::from_str(content)?;
        chart.sort_notes();
        chart.validate()?;
        Ok(chart)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut chart: Chart = serde_json::from_str(content)?;
        chart.sort_notes();
        chart.validate()?;
        Ok(chart)
    }

    /// Generates a playable chart from a seed.
    ///
    /// The same seed always yields the same chart.
    pub fn random(seed: u64, note_count: usize, bpm: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut notes = Vec::with_capacity(note_count);
        // Leave two beats of lead-in before the first note.
        let mut beat_time = 2.0;

        for _ in 0..note_count {
            let direction = CardinalDirection::ALL[rng.random_range(0..CardinalDirection::ALL.len())];
            let speed = [0.75, 1.0, 1.0, 1.25][rng.random_range(0..4)];
            notes.push(Note::new(beat_time, direction.angle()).with_speed(speed));
            beat_time += [0.5, 1.0, 1.0, 2.0][rng.random_range(0..4)];
        }

        let mut chart = Self::new(bpm, 0.0, notes);
        chart.name = format!("Random #{seed}");
        chart
    }

    pub fn beat_duration(&self) -> f64 {
        beat::beat_duration(self.bpm)
    }

    /// BPM after applying a difficulty speed multiplier.
    pub fn scaled_bpm(&self, speed_multiplier: f64) -> f64 {
        self.bpm * speed_multiplier
    }

    /// Sorts notes by beat time, keeping authoring order for equal beats.
    pub fn sort_notes(&mut self) {
        self.notes
            .sort_by(|a, b| a.beat_time.total_cmp(&b.beat_time));
    }

    pub fn is_sorted(&self) -> bool {
        self.notes
            .windows(2)
            .all(|pair| pair[0].beat_time <= pair[1].beat_time)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn last_beat(&self) -> Option<f64> {
        self.notes.last().map(|n| n.beat_time)
    }

    /// Checks everything the scheduler relies on, including beat ordering.
    pub fn validate(&self) -> Result<()> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(EngineError::invalid(format!(
                "chart BPM must be positive, got {}",
                self.bpm
            )));
        }
        if !self.offset_seconds.is_finite() {
            return Err(EngineError::invalid("chart offset must be finite"));
        }
        if !(self.default_approach_time.is_finite() && self.default_approach_time > 0.0) {
            return Err(EngineError::invalid(format!(
                "default approach time must be positive, got {}",
                self.default_approach_time
            )));
        }
        for (i, note) in self.notes.iter().enumerate() {
            note.validate(i)?;
        }
        if let Some(i) = self
            .notes
            .windows(2)
            .position(|pair| pair[0].beat_time > pair[1].beat_time)
        {
            return Err(EngineError::invalid(format!(
                "notes are not sorted by beat: note {} (beat {}) comes after beat {}",
                i + 1,
                self.notes[i + 1].beat_time,
                self.notes[i].beat_time
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "Sample"
bpm = 120.0
offset_seconds = 0.25

[[notes]]
beat_time = 4.0
approach_angle = 90.0

[[notes]]
beat_time = 2.0
speed_multiplier = 1.5
position_offset = [0.5, -0.5]
"#;

    #[test]
    fn test_parse_toml_sorts_and_fills_defaults() {
        let chart = Chart::from_toml_str(SAMPLE).unwrap();
        assert_eq!(chart.name, "Sample");
        assert_eq!(chart.default_approach_time, DEFAULT_APPROACH_TIME);
        assert_eq!(chart.notes.len(), 2);
        assert_eq!(chart.notes[0].beat_time, 2.0);
        assert_eq!(chart.notes[0].speed_multiplier, 1.5);
        assert_eq!(chart.notes[0].position_offset, Vec2::new(0.5, -0.5));
        assert_eq!(chart.notes[1].size_multiplier, 1.0);
        assert!(chart.is_sorted());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"bpm": 90.0, "notes": [{"beat_time": 1.0}, {"beat_time": 0.5}]}"#;
        let chart = Chart::from_json_str(json).unwrap();
        assert_eq!(chart.notes[0].beat_time, 0.5);
        assert_eq!(chart.offset_seconds, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_tempo() {
        let chart = Chart::new(0.0, 0.0, vec![Note::new(1.0, 0.0)]);
        assert!(matches!(
            chart.validate(),
            Err(EngineError::InvalidConfiguration(_))
        ));
        let chart = Chart::new(-120.0, 0.0, vec![]);
        assert!(chart.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unsorted_notes() {
        let chart = Chart::new(120.0, 0.0, vec![Note::new(2.0, 0.0), Note::new(1.0, 0.0)]);
        assert!(!chart.is_sorted());
        let err = chart.validate().unwrap_err();
        assert!(err.to_string().contains("not sorted"));
    }

    #[test]
    fn test_validate_rejects_bad_note_fields() {
        let bad = [
            Note::new(-1.0, 0.0),
            Note::new(1.0, 360.0),
            Note::new(1.0, 0.0).with_speed(0.0),
            Note::new(1.0, 0.0).with_size(-2.0),
        ];
        for note in bad {
            let chart = Chart::new(120.0, 0.0, vec![note]);
            assert!(chart.validate().is_err());
        }
    }

    #[test]
    fn test_approach_direction() {
        let up = Note::new(0.0, 90.0).approach_direction();
        assert!(up.x.abs() < 1e-6);
        assert!((up.y - 1.0).abs() < 1e-6);
        let left = Note::new(0.0, 180.0).approach_direction();
        assert!((left.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_random_chart_is_deterministic_and_valid() {
        let a = Chart::random(42, 64, 140.0);
        let b = Chart::random(42, 64, 140.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.validate().is_ok());
        assert_ne!(a, Chart::random(43, 64, 140.0));
    }

    #[test]
    fn test_shipped_demo_chart() {
        let chart = Chart::from_toml_str(include_str!("../../../charts/demo.toml")).unwrap();
        assert_eq!(chart.len(), 32);
        assert!(chart.is_sorted());
        assert!(chart.song_length_seconds.is_some());
    }
}
