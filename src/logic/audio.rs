//! Playback control boundary.
//!
//! The engine never talks to an audio device. It drives a [`Playback`]
//! implementation, which in the headless driver is an [`AudioManager`]
//! forwarding commands to the transport thread.

use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Transport controls used by the engine and the checkpoint manager.
///
/// After `seek(t)`, `current_time()` must read `t` within a few milliseconds.
pub trait Playback: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position_secs: f64);
    fn current_time(&self) -> f64;
    fn is_playing(&self) -> bool;
}

/// Wrapper for sending commands to the transport thread.
///
/// Commands are fire-and-forget so the logic thread never blocks on the
/// transport.
pub struct AudioManager {
    cmd_tx: Sender<AudioCommand>,
    position: Arc<AtomicU64>,
    playing: Arc<AtomicBool>,
}

impl AudioManager {
    pub fn new(bus: &SystemBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
            position: bus.audio_position.clone(),
            playing: bus.audio_playing.clone(),
        }
    }

    fn send(&self, cmd: AudioCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            log::warn!("AUDIO: Transport thread is gone");
        }
    }
}

impl Playback for AudioManager {
    fn play(&mut self) {
        self.playing.store(true, Ordering::Relaxed);
        self.send(AudioCommand::Play);
    }

    fn pause(&mut self) {
        self.playing.store(false, Ordering::Relaxed);
        self.send(AudioCommand::Pause);
    }

    fn stop(&mut self) {
        self.playing.store(false, Ordering::Relaxed);
        self.position.store(0.0f64.to_bits(), Ordering::Relaxed);
        self.send(AudioCommand::Stop);
    }

    /// The shared position is written right away so readers see the target
    /// before the transport thread has processed the command.
    fn seek(&mut self, position_secs: f64) {
        let position_secs = position_secs.max(0.0);
        self.position.store(position_secs.to_bits(), Ordering::Relaxed);
        self.send(AudioCommand::Seek { position_secs });
    }

    fn current_time(&self) -> f64 {
        f64::from_bits(self.position.load(Ordering::Relaxed))
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}
