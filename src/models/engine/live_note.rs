//! Runtime state of a spawned note.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable reference to a live note.
///
/// The epoch changes every time the spawner clears its live set, so a handle
/// taken before a seek can never resolve a note spawned after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteHandle {
    pub(crate) epoch: u32,
    pub(crate) chart_index: usize,
}

impl NoteHandle {
    /// Index of the source note in the chart.
    pub fn chart_index(&self) -> usize {
        self.chart_index
    }
}

/// Lifecycle of a live note. `Hit` and `Missed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteStatus {
    Approaching,
    Hit,
    Missed,
}

/// Terminal state requested when resolving a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hit,
    Missed,
}

impl From<Resolution> for NoteStatus {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Hit => NoteStatus::Hit,
            Resolution::Missed => NoteStatus::Missed,
        }
    }
}

/// A note in flight between its spawn point and the player zone.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveNote {
    pub handle: NoteHandle,
    pub chart_index: usize,
    /// Song time at which the note should be hit.
    pub hit_time: f64,
    /// Scheduled spawn time (`hit_time - approach_duration`).
    pub spawn_time: f64,
    pub approach_duration: f64,
    pub spawn_position: Vec2,
    pub target_position: Vec2,
    /// Interpolated position as of the last scheduler tick.
    pub position: Vec2,
    pub size: f32,
    pub status: NoteStatus,
    /// Song time of resolution, used to expire feedback.
    pub resolved_at: Option<f64>,
}

impl LiveNote {
    pub fn is_approaching(&self) -> bool {
        self.status == NoteStatus::Approaching
    }

    pub fn is_resolved(&self) -> bool {
        !self.is_approaching()
    }

    /// Signed timing error of a hit at `now` (positive = late).
    pub fn timing_error(&self, now: f64) -> f64 {
        now - self.hit_time
    }
}

/// Cubic ease-out: fast start, slow arrival.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
