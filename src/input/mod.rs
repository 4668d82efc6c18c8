//! Input thread bootstrapping.
//!
//! The headless build has no keyboard. An autoplay thread watches the
//! transport position and sends the actions a player would: a hit near every
//! note, plus a short practice sequence the first time through the song.

pub mod events;

use crate::input::events::GameAction;
use crate::system::bus::SystemBus;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Earliest and latest offset of an autoplay hit relative to the note.
const JITTER_RANGE: (f64, f64) = (-0.04, 0.08);
/// Past this, a note is left to auto-miss instead of being hit.
const GIVE_UP_AFTER: f64 = 0.12;

/// One scripted practice step, fired once at a fraction of the song.
#[derive(Debug, Clone, Copy)]
struct PracticeStep {
    at_fraction: f64,
    action: GameAction,
    done: bool,
}

/// Decides which actions to send for a given transport position.
pub struct AutoplayScript {
    hit_times: Vec<f64>,
    song_end: f64,
    next: usize,
    jitter: f64,
    last_position: f64,
    practice: Vec<PracticeStep>,
    rng: StdRng,
}

impl AutoplayScript {
    pub fn new(hit_times: Vec<f64>, song_end: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let jitter = rng.random_range(JITTER_RANGE.0..JITTER_RANGE.1);
        let step = |at_fraction, action| PracticeStep {
            at_fraction,
            action,
            done: false,
        };
        Self {
            hit_times,
            song_end,
            next: 0,
            jitter,
            last_position: 0.0,
            practice: vec![
                step(0.25, GameAction::CreateCheckpoint),
                step(0.40, GameAction::CreateCheckpoint),
                step(0.50, GameAction::PreviousCheckpoint),
            ],
            rng,
        }
    }

    /// Actions due at transport `position` (seconds).
    pub fn poll(&mut self, position: f64) -> Vec<GameAction> {
        let mut actions = Vec::new();

        // The transport jumped back (checkpoint or restart): rewind the plan.
        if position + 0.05 < self.last_position {
            self.next = self.hit_times.partition_point(|&t| t < position);
            log::debug!("INPUT: Rewound autoplay to note {}", self.next);
        }
        self.last_position = position;

        while let Some(&hit_time) = self.hit_times.get(self.next) {
            if position > hit_time + GIVE_UP_AFTER {
                self.next += 1;
                continue;
            }
            if position < hit_time + self.jitter {
                break;
            }
            actions.push(GameAction::Hit);
            self.next += 1;
            self.jitter = self.rng.random_range(JITTER_RANGE.0..JITTER_RANGE.1);
        }

        if self.song_end > 0.0 {
            let fraction = position / self.song_end;
            for step in self.practice.iter_mut().filter(|s| !s.done) {
                if fraction >= step.at_fraction {
                    step.done = true;
                    actions.push(step.action);
                }
            }
        }

        actions
    }
}

/// Starts the autoplay thread. It polls the transport every millisecond until
/// shutdown is requested.
pub fn start_thread(bus: SystemBus, mut script: AutoplayScript) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Autoplay started");

            while !bus.is_shutting_down() {
                for action in script.poll(bus.audio_position_seconds()) {
                    if let Err(e) = bus.action_tx.send(action) {
                        log::error!("INPUT: Failed to send action (Logic thread died?): {}", e);
                        return;
                    }
                }
                thread::sleep(Duration::from_millis(1));
            }

            log::info!("INPUT: Thread stopped");
        })
}
