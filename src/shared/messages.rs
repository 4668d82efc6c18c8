//! Notifications emitted by the core components.
//!
//! Every component receives an [`EventSender`] at construction and publishes
//! into one channel. The orchestrator drains it once per tick, so observers
//! see events in emission order. For a registered hit that order is always
//! `HitOutcome`, then `ComboChanged`, then `ScoreChanged`.

use crate::models::engine::{Checkpoint, NoteStatus};
use crate::models::stats::{HitResult, ScoreData};
use crossbeam_channel::Sender;
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A chart note became live.
    NoteSpawned {
        chart_index: usize,
        hit_time: f64,
        spawn_position: Vec2,
    },
    /// A note passed its hit time plus the grace period without being hit.
    NoteMissed { chart_index: usize, hit_time: f64 },
    /// A note was resolved by a hit attempt.
    NoteResolved {
        chart_index: usize,
        status: NoteStatus,
    },
    /// A judged outcome and the points it earned.
    HitOutcome { result: HitResult, score_gained: u32 },
    ComboChanged { combo: u32 },
    ScoreChanged { total: u32 },
    /// Position is the index in the chronological checkpoint list.
    CheckpointCreated { index: usize, checkpoint: Checkpoint },
    CheckpointRemoved { index: usize, checkpoint: Checkpoint },
    /// Playback jumped to a checkpoint; `None` means the song start.
    CheckpointActivated { checkpoint: Option<Checkpoint> },
    Paused { song_time: f64 },
    Resumed { song_time: f64 },
    LevelStarted,
    LevelComplete { summary: ScoreData },
}

pub type EventSender = Sender<GameEvent>;

/// Publishes an event, logging a disconnected receiver.
pub(crate) fn publish(tx: &EventSender, event: GameEvent) {
    if let Err(e) = tx.send(event) {
        log::warn!("EVENTS: Receiver gone, dropped {:?}", e.into_inner());
    }
}
