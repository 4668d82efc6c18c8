//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` connects the input, logic, transport and presentation
//! threads using lock-free channels.

use crate::input::events::GameAction;
use crate::shared::messages::GameEvent;
use crate::shared::snapshot::RenderState;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// System-level events sent to the logic thread.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Application shutdown requested.
    Quit,
}

/// Commands sent to the transport thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    Play,
    Pause,
    /// Stop and rewind to 0.
    Stop,
    /// Jump to a position in seconds.
    Seek { position_secs: f64 },
}

/// Aggregates the cross-thread communication channels.
#[derive(Clone)]
pub struct SystemBus {
    /// Input → Logic: gameplay actions.
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Logic → Presentation: game state snapshots.
    pub render_tx: Sender<RenderState>,
    pub render_rx: Receiver<RenderState>,

    /// Logic → Presentation: drained engine events, in emission order.
    pub event_tx: Sender<GameEvent>,
    pub event_rx: Receiver<GameEvent>,

    /// Main → Logic: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,

    /// Logic → Transport: playback commands.
    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,

    /// Transport position in seconds, stored as `f64` bits.
    /// Written by the transport thread, read by logic and input.
    pub audio_position: Arc<AtomicU64>,
    pub audio_playing: Arc<AtomicBool>,

    /// Set once by the main thread; every worker loop exits when it sees it.
    pub shutdown: Arc<AtomicBool>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (action_tx, action_rx) = unbounded();

        // Bounded render channel: max 2 frames queued to limit latency
        let (render_tx, render_rx) = bounded(2);

        let (event_tx, event_rx) = unbounded();
        let (sys_tx, sys_rx) = unbounded();
        let (audio_cmd_tx, audio_cmd_rx) = unbounded();

        Self {
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            event_tx,
            event_rx,
            sys_tx,
            sys_rx,
            audio_cmd_tx,
            audio_cmd_rx,
            audio_position: Arc::new(AtomicU64::new(0.0f64.to_bits())),
            audio_playing: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn audio_position_seconds(&self) -> f64 {
        f64::from_bits(self.audio_position.load(Ordering::Relaxed))
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.sys_tx.send(SystemEvent::Quit);
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
