//! Snapshot creation for GameEngine - snapshot

use super::GameEngine;
use crate::shared::snapshot::GameplaySnapshot;

impl GameEngine {
    /// Creates a snapshot of the current game state for the presentation side.
    pub fn snapshot(&self) -> GameplaySnapshot {
        let song_time = self.song_time();

        GameplaySnapshot {
            song_time,
            beat: self.timing.seconds_to_beats(song_time),
            live_notes: self.spawner.live_notes().to_vec(),
            score: self.scoring.state().clone(),
            accuracy: self.scoring.accuracy(),
            progress: self.progress(),
            remaining_notes: self.chart.len().saturating_sub(self.spawner.cursor()),
            last_hit_result: self.last_hit_result,
            last_hit_timing: self.last_hit_timing,
            practice_mode: self.practice.is_enabled(),
            checkpoints: self.practice.checkpoints().to_vec(),
            current_checkpoint: self.practice.current_index(),
            paused: self.is_paused(),
            finished: self.level_complete,
        }
    }
}
