//! Tempo-only beat math shared by chart tooling and the autoplay input.
//!
//! These helpers ignore the chart offset. The timing engine applies the offset
//! and the difficulty speed on top of them.

use serde::{Deserialize, Serialize};

/// Seconds per minute, used in every BPM conversion.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Duration of one beat in seconds. Returns 0 for a non-positive BPM.
pub fn beat_duration(bpm: f64) -> f64 {
    if bpm <= 0.0 {
        return 0.0;
    }
    SECONDS_PER_MINUTE / bpm
}

pub fn beats_to_seconds(beats: f64, bpm: f64) -> f64 {
    beats * beat_duration(bpm)
}

pub fn seconds_to_beats(seconds: f64, bpm: f64) -> f64 {
    let duration = beat_duration(bpm);
    if duration <= 0.0 {
        return 0.0;
    }
    seconds / duration
}

/// Snaps a time in seconds to the nearest whole beat.
pub fn snap_to_nearest_beat(seconds: f64, bpm: f64) -> f64 {
    let beat = seconds_to_beats(seconds, bpm).round();
    beats_to_seconds(beat, bpm)
}

/// Snaps a time in seconds to a beat subdivision (0.5 = eighth notes at 4/4).
pub fn snap_to_subdivision(seconds: f64, bpm: f64, subdivision: f64) -> f64 {
    if subdivision <= 0.0 {
        return snap_to_nearest_beat(seconds, bpm);
    }
    let beat = seconds_to_beats(seconds, bpm);
    let snapped = (beat / subdivision).round() * subdivision;
    beats_to_seconds(snapped, bpm)
}

/// Eight-way approach directions used when authoring charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardinalDirection {
    Right,
    Up,
    Left,
    Down,
    UpRight,
    UpLeft,
    DownLeft,
    DownRight,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 8] = [
        CardinalDirection::Right,
        CardinalDirection::UpRight,
        CardinalDirection::Up,
        CardinalDirection::UpLeft,
        CardinalDirection::Left,
        CardinalDirection::DownLeft,
        CardinalDirection::Down,
        CardinalDirection::DownRight,
    ];

    /// Approach angle in degrees, counter-clockwise from +X.
    pub fn angle(self) -> f64 {
        match self {
            CardinalDirection::Right => 0.0,
            CardinalDirection::UpRight => 45.0,
            CardinalDirection::Up => 90.0,
            CardinalDirection::UpLeft => 135.0,
            CardinalDirection::Left => 180.0,
            CardinalDirection::DownLeft => 225.0,
            CardinalDirection::Down => 270.0,
            CardinalDirection::DownRight => 315.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beat_duration() {
        assert_eq!(beat_duration(120.0), 0.5);
        assert_eq!(beat_duration(0.0), 0.0);
        assert_eq!(beat_duration(-10.0), 0.0);
    }

    #[test]
    fn test_conversions_invert() {
        for bpm in [60.0, 97.5, 128.0, 174.0] {
            for beats in [0.0, 1.0, 3.25, 64.0, 511.75] {
                let back = seconds_to_beats(beats_to_seconds(beats, bpm), bpm);
                assert!((back - beats).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_snapping() {
        // 120 BPM: one beat every 0.5s
        assert!((snap_to_nearest_beat(1.26, 120.0) - 1.5).abs() < 1e-9);
        assert!((snap_to_nearest_beat(1.24, 120.0) - 1.0).abs() < 1e-9);
        assert!((snap_to_subdivision(1.13, 120.0, 0.5) - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_cardinal_angles_are_distinct_and_in_range() {
        let angles: Vec<f64> = CardinalDirection::ALL.iter().map(|d| d.angle()).collect();
        for (i, a) in angles.iter().enumerate() {
            assert!((0.0..360.0).contains(a));
            assert_eq!(*a, i as f64 * 45.0);
        }
    }
}
