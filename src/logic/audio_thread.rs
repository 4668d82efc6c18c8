//! Dedicated transport thread.
//!
//! There is no audio device in the headless build: the worker keeps a
//! virtual play head that advances with the wall clock while playing and
//! publishes it on the bus.

use crate::system::bus::{AudioCommand, SystemBus};
use crossbeam_channel::RecvTimeoutError;
use std::io;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

struct TransportWorker {
    position: f64,
    playing: bool,
    last_update: Instant,
    /// Bits last written to the shared position by this worker.
    published: u64,
}

impl TransportWorker {
    fn new() -> Self {
        Self {
            position: 0.0,
            playing: false,
            last_update: Instant::now(),
            published: 0.0f64.to_bits(),
        }
    }

    fn handle_command(&mut self, cmd: AudioCommand) {
        self.tick();
        match cmd {
            AudioCommand::Play => self.playing = true,
            AudioCommand::Pause => self.playing = false,
            AudioCommand::Stop => {
                self.playing = false;
                self.position = 0.0;
            }
            AudioCommand::Seek { position_secs } => {
                self.position = position_secs.max(0.0);
                log::info!("AUDIO: Seeked to {:.2}s", self.position);
            }
        }
    }

    /// Moves the play head by the wall time elapsed since the last call.
    fn tick(&mut self) {
        let now = Instant::now();
        if self.playing {
            self.position += (now - self.last_update).as_secs_f64();
        }
        self.last_update = now;
    }

    /// Publishes the play head after every queued command was applied.
    fn publish_commanded(&mut self, bus: &SystemBus) {
        self.published = self.position.to_bits();
        bus.audio_position.store(self.published, Ordering::Relaxed);
        bus.audio_playing.store(self.playing, Ordering::Relaxed);
    }

    /// Publishes clock progress unless a writer moved the position since our
    /// last store. That write belongs to a command still in the queue.
    fn publish_progress(&mut self, bus: &SystemBus) {
        let next = self.position.to_bits();
        if bus
            .audio_position
            .compare_exchange(self.published, next, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            self.published = next;
        }
    }
}

/// Starts the transport thread. It runs until shutdown is requested or
/// every command sender is dropped.
pub fn start_audio_thread(bus: SystemBus) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("Audio Thread".to_string())
        .spawn(move || {
            log::info!("AUDIO: Thread started");

            let mut worker = TransportWorker::new();

            while !bus.is_shutting_down() {
                match bus.audio_cmd_rx.recv_timeout(Duration::from_millis(1)) {
                    Ok(cmd) => {
                        worker.handle_command(cmd);
                        for cmd in bus.audio_cmd_rx.try_iter() {
                            worker.handle_command(cmd);
                        }
                        worker.publish_commanded(&bus);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        worker.tick();
                        worker.publish_progress(&bus);
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            log::info!("AUDIO: Thread stopped");
        })
}
