//! Hit evaluation and the score/combo state machine.

use crate::error::Result;
use crate::models::engine::DifficultyProfile;
use crate::models::stats::{HitResult, ScoreData, ScoreState};
use crate::shared::messages::{EventSender, GameEvent, publish};

pub const PERFECT_SCORE: u32 = 300;
pub const GOOD_SCORE: u32 = 100;
/// Bonus points per combo step, added on every hit.
pub const COMBO_MULTIPLIER: u32 = 10;

pub struct ScoringSystem {
    difficulty: DifficultyProfile,
    state: ScoreState,
    events: EventSender,
}

impl ScoringSystem {
    pub fn new(difficulty: DifficultyProfile, events: EventSender) -> Result<Self> {
        let mut scoring = Self {
            difficulty: DifficultyProfile::default(),
            state: ScoreState::new(),
            events,
        };
        scoring.initialize(difficulty)?;
        Ok(scoring)
    }

    /// Installs a difficulty profile and zeroes the counters.
    pub fn initialize(&mut self, difficulty: DifficultyProfile) -> Result<()> {
        difficulty.validate()?;
        log::debug!(
            "SCORE: {} windows perfect {:.3}s good {:.3}s",
            difficulty.name,
            difficulty.scaled_perfect_window(),
            difficulty.scaled_good_window()
        );
        self.difficulty = difficulty;
        self.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = ScoreState::new();
    }

    /// Classifies a signed timing error against the scaled windows.
    pub fn evaluate(&self, timing_error: f64) -> HitResult {
        let error = timing_error.abs();
        if error <= self.difficulty.scaled_perfect_window() {
            HitResult::Perfect
        } else if error <= self.difficulty.scaled_good_window() {
            HitResult::Good
        } else {
            HitResult::Miss
        }
    }

    /// Applies an outcome to the counters and returns the points gained.
    ///
    /// Emits `HitOutcome`, `ComboChanged` and `ScoreChanged` in that order.
    /// `HitResult::None` changes nothing and emits nothing.
    pub fn register(&mut self, result: HitResult) -> u32 {
        let state = &mut self.state;
        let gained = match result {
            HitResult::None => return 0,
            HitResult::Perfect => {
                state.perfect_hits += 1;
                state.combo += 1;
                PERFECT_SCORE + state.combo * COMBO_MULTIPLIER
            }
            HitResult::Good => {
                state.good_hits += 1;
                state.combo += 1;
                GOOD_SCORE + state.combo * COMBO_MULTIPLIER
            }
            HitResult::Miss => {
                state.missed_hits += 1;
                state.combo = 0;
                0
            }
        };
        state.total_score = state.total_score.saturating_add(gained);
        state.max_combo = state.max_combo.max(state.combo);

        log::trace!(
            "SCORE: {:?} +{} (combo {}, total {})",
            result,
            gained,
            state.combo,
            state.total_score
        );
        let (combo, total) = (state.combo, state.total_score);
        publish(
            &self.events,
            GameEvent::HitOutcome {
                result,
                score_gained: gained,
            },
        );
        publish(&self.events, GameEvent::ComboChanged { combo });
        publish(&self.events, GameEvent::ScoreChanged { total });
        gained
    }

    pub fn accuracy(&self) -> f64 {
        self.state.accuracy()
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn score_data(&self) -> ScoreData {
        self.state.summary()
    }

    pub fn difficulty(&self) -> &DifficultyProfile {
        &self.difficulty
    }
}
