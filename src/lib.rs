//! Simulation core of a rhythm game.
//!
//! Converts a clock and a note chart into a deterministic stream of
//! spawn, hit and miss events, judges hit timing, keeps score, and supports
//! practice checkpoints that seek timing, spawning and playback together.

pub mod error;
pub mod input;
pub mod logic;
pub mod models;
pub mod shared;
pub mod state;
pub mod system;

pub use error::{EngineError, Result};
pub use logic::audio::{AudioManager, Playback};
pub use logic::clock::{Clock, ManualClock, SystemClock};
pub use logic::practice::{CheckpointManager, SyncTargets};
pub use logic::scoring::ScoringSystem;
pub use logic::spawner::{SpawnLayout, SpawnScheduler};
pub use logic::timing::TimingEngine;
pub use models::engine::{Chart, Checkpoint, DifficultyProfile, LiveNote, Note, NoteStatus, PlayerZone};
pub use models::settings::EngineSettings;
pub use models::stats::{HitResult, ScoreData, ScoreState};
pub use shared::messages::GameEvent;
pub use state::GameEngine;
