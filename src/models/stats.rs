//! Hit outcomes and score counters.
//!
//! This module defines the outcome of a hit attempt and the counters the
//! scoring system maintains, including the accuracy formula.

use serde::{Deserialize, Serialize};

/// Outcome of a hit attempt, from "nothing happened" to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitResult {
    /// No note was judged.
    None,
    /// Outside every window, or never hit.
    Miss,
    /// Inside the good window.
    Good,
    /// Inside the perfect window.
    Perfect,
}

impl HitResult {
    /// Whether this outcome keeps the combo going.
    pub fn is_hit(self) -> bool {
        matches!(self, HitResult::Good | HitResult::Perfect)
    }
}

/// Live counters for a play session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub perfect_hits: u32,
    pub good_hits: u32,
    pub missed_hits: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub total_score: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of judged notes, misses included.
    pub fn total_hits(&self) -> u32 {
        self.perfect_hits + self.good_hits + self.missed_hits
    }

    /// Calculates accuracy percentage (0-100).
    ///
    /// Perfect counts 1.0, Good 0.5, Miss 0. With nothing judged yet the
    /// accuracy is 100%.
    pub fn accuracy(&self) -> f64 {
        let total = self.total_hits();
        if total == 0 {
            return 100.0;
        }

        let weighted = self.perfect_hits as f64 + self.good_hits as f64 * 0.5;
        weighted / total as f64 * 100.0
    }

    pub fn summary(&self) -> ScoreData {
        ScoreData {
            total_score: self.total_score,
            perfect_hits: self.perfect_hits,
            good_hits: self.good_hits,
            missed_hits: self.missed_hits,
            max_combo: self.max_combo,
            accuracy: self.accuracy(),
        }
    }
}

/// Final score summary for the results screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreData {
    pub total_score: u32,
    pub perfect_hits: u32,
    pub good_hits: u32,
    pub missed_hits: u32,
    pub max_combo: u32,
    pub accuracy: f64,
}
