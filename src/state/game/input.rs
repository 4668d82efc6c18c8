//! Input handling for GameEngine - handle_action, process_hit, toggle_pause

use super::GameEngine;
use crate::input::events::GameAction;
use crate::models::engine::Resolution;
use crate::models::stats::HitResult;
use crate::shared::messages::{GameEvent, publish};

impl GameEngine {
    /// Handles a gameplay action. While paused only pause and restart are
    /// honoured; everything else is dropped.
    pub fn handle_action(&mut self, action: GameAction) {
        if self.is_paused() && !action.allowed_while_paused() {
            log::debug!("INPUT: {:?} ignored while paused", action);
            return;
        }

        match action {
            GameAction::Hit => self.process_hit(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::Restart => {
                if let Err(e) = self.restart() {
                    log::error!("ENGINE: Restart failed: {}", e);
                }
            }
            GameAction::CreateCheckpoint => self.create_checkpoint(),
            GameAction::RemoveCheckpoint => self.remove_checkpoint(),
            GameAction::PreviousCheckpoint => self.previous_checkpoint(),
            GameAction::NextCheckpoint => self.next_checkpoint(),
            GameAction::TogglePractice => self.toggle_practice(),
        }
    }

    /// Judges a hit attempt against the best candidate note.
    ///
    /// Candidates are approaching notes overlapping the player zone; the one
    /// closest to its hit time wins. At most one note is judged per attempt.
    pub(crate) fn process_hit(&mut self) {
        if self.level_complete {
            return;
        }
        let now = self.timing.current_song_time();

        let target = self
            .spawner
            .live_notes()
            .iter()
            .filter(|n| n.is_approaching() && self.zone.overlaps(n))
            .map(|n| (n.handle, n.timing_error(now)))
            .min_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()));

        let Some((handle, error)) = target else {
            log::trace!("INPUT: Hit at {:.3}s with no note in the zone", now);
            return;
        };

        let result = self.scoring.evaluate(error);
        let resolution = match result {
            HitResult::Perfect | HitResult::Good => Resolution::Hit,
            HitResult::Miss | HitResult::None => Resolution::Missed,
        };
        if !self.spawner.resolve(handle, resolution) {
            return;
        }

        self.scoring.register(result);
        self.last_hit_result = Some(result);
        self.last_hit_timing = Some(error);
        log::debug!(
            "INPUT: Note {} {:?} ({:+.1}ms)",
            handle.chart_index(),
            result,
            error * 1000.0
        );
    }

    /// Pausing freezes song time; resuming restarts timing and playback from
    /// the frozen value so both stay aligned.
    pub fn toggle_pause(&mut self) {
        match self.paused_at.take() {
            Some(song_time) => {
                self.timing.start_from_offset(song_time);
                self.playback.seek(song_time);
                self.playback.play();
                log::info!("ENGINE: Resumed at {:.2}s", song_time);
                publish(&self.events_tx, GameEvent::Resumed { song_time });
            }
            None => {
                if self.level_complete {
                    return;
                }
                let song_time = self.timing.current_song_time();
                self.timing.stop();
                self.playback.pause();
                self.paused_at = Some(song_time);
                log::info!("ENGINE: Paused at {:.2}s", song_time);
                publish(&self.events_tx, GameEvent::Paused { song_time });
            }
        }
    }
}
