//! Practice mode - checkpoint actions routed to the checkpoint manager

use super::GameEngine;
use crate::logic::practice::SyncTargets;

impl GameEngine {
    /// Records a checkpoint at the current song time and next-spawn cursor.
    pub(crate) fn create_checkpoint(&mut self) {
        let song_time = self.timing.current_song_time();
        self.practice.create(song_time, self.spawner.cursor());
    }

    pub(crate) fn remove_checkpoint(&mut self) {
        if self.practice.remove_latest().is_none() {
            log::debug!("PRACTICE: No checkpoint to remove");
        }
    }

    pub(crate) fn previous_checkpoint(&mut self) {
        if !self.practice.is_enabled() || self.level_complete {
            return;
        }
        let targets = SyncTargets {
            timing: &mut self.timing,
            spawner: &mut self.spawner,
            playback: self.playback.as_mut(),
        };
        self.practice.go_to_previous(targets);
        self.clear_last_hit();
    }

    pub(crate) fn next_checkpoint(&mut self) {
        if !self.practice.is_enabled() || self.level_complete {
            return;
        }
        let targets = SyncTargets {
            timing: &mut self.timing,
            spawner: &mut self.spawner,
            playback: self.playback.as_mut(),
        };
        self.practice.go_to_next(targets);
        self.clear_last_hit();
    }

    pub(crate) fn toggle_practice(&mut self) {
        let enabled = !self.practice.is_enabled();
        self.practice.set_enabled(enabled);
    }

    fn clear_last_hit(&mut self) {
        self.last_hit_result = None;
        self.last_hit_timing = None;
    }
}
