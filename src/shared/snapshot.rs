//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of game state sent from the logic thread
//! to the presentation side. Nothing in them flows back into the engine.

use crate::models::engine::{Checkpoint, LiveNote};
use crate::models::stats::{HitResult, ScoreData, ScoreState};

/// High-level render state representing the current game mode.
#[derive(Clone, Debug)]
pub enum RenderState {
    /// Initial empty state.
    Empty,
    /// Active gameplay.
    InGame(GameplaySnapshot),
    /// Post-game result screen.
    Result(ScoreData),
}

/// Snapshot of gameplay state for rendering.
#[derive(Clone, Debug)]
pub struct GameplaySnapshot {
    /// Current song time in seconds.
    pub song_time: f64,
    pub beat: f64,

    /// Live notes with their interpolated positions, resolved ones included
    /// while their feedback is showing.
    pub live_notes: Vec<LiveNote>,

    pub score: ScoreState,
    /// Current accuracy percentage.
    pub accuracy: f64,
    /// Fraction of the song elapsed, in `[0, 1]`.
    pub progress: f64,
    /// Chart notes not spawned yet.
    pub remaining_notes: usize,

    /// Last hit judgement (for flash display).
    pub last_hit_result: Option<HitResult>,
    /// Last hit timing error in seconds (positive = late).
    pub last_hit_timing: Option<f64>,

    pub practice_mode: bool,
    pub checkpoints: Vec<Checkpoint>,
    pub current_checkpoint: Option<usize>,

    pub paused: bool,
    pub finished: bool,
}
