//! Per-tick note updates and level completion.

use super::GameEngine;
use crate::models::stats::HitResult;
use crate::shared::messages::{GameEvent, publish};

impl GameEngine {
    /// Advances the spawn scheduler and scores every note it auto-missed.
    pub(crate) fn update_notes(&mut self) {
        let missed = self.spawner.advance(&self.timing);
        if missed.is_empty() {
            return;
        }

        for _ in &missed {
            self.scoring.register(HitResult::Miss);
        }
        self.last_hit_result = Some(HitResult::Miss);
        self.last_hit_timing = None;
    }

    /// Hit time of every chart note at the current difficulty.
    pub fn hit_times(&self) -> Vec<f64> {
        self.chart
            .notes
            .iter()
            .map(|n| self.timing.beats_to_seconds(n.beat_time))
            .collect()
    }

    /// Song time after which the level may complete.
    pub fn song_end(&self) -> f64 {
        self.chart.song_length_seconds.unwrap_or_else(|| {
            self.chart
                .last_beat()
                .map_or(0.0, |beat| self.timing.beats_to_seconds(beat))
        })
    }

    /// Fraction of the song elapsed, clamped to `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let end = self.song_end();
        if end <= 0.0 {
            return 1.0;
        }
        (self.song_time() / end).clamp(0.0, 1.0)
    }

    /// Completes the level once every note is spawned and resolved and the
    /// song end plus the grace period has passed.
    pub(crate) fn check_level_complete(&mut self) {
        if self.level_complete || !self.spawner.is_exhausted() || self.spawner.has_approaching() {
            return;
        }
        let now = self.timing.current_song_time();
        if now <= self.song_end() + self.settings.completion_grace_seconds {
            return;
        }

        self.level_complete = true;
        self.playback.stop();

        let summary = self.scoring.score_data();
        log::info!(
            "ENGINE: Level complete at {:.2}s, score {} ({:.2}%)",
            now,
            summary.total_score,
            summary.accuracy
        );
        publish(&self.events_tx, GameEvent::LevelComplete { summary });
    }
}
