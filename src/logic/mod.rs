//! Simulation components and the logic thread that drives them.
//!
//! The logic thread runs the `GameEngine` at a fixed tick rate and forwards
//! its events and snapshots to the presentation side.

pub mod audio;
pub mod audio_thread;
pub mod clock;
pub mod practice;
pub mod scoring;
pub mod spawner;
pub mod timing;

use crate::input::events::GameAction;
use crate::shared::messages::GameEvent;
use crate::shared::snapshot::RenderState;
use crate::state::GameEngine;
use crate::system::bus::{SystemBus, SystemEvent};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Spawns the transport thread and the main logic thread.
///
/// The logic loop:
/// 1. Handles system events (quit)
/// 2. Drains queued actions and runs one engine tick
/// 3. Forwards the tick's events, then a snapshot
/// 4. Sleeps until the next tick
pub fn start_thread(
    bus: SystemBus,
    mut engine: GameEngine,
    tick_rate: u32,
) -> io::Result<Vec<JoinHandle<()>>> {
    let audio = audio_thread::start_audio_thread(bus.clone())?;

    let logic = thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started ({} TPS)", tick_rate);

            if let Err(e) = engine.start_level() {
                log::error!("LOGIC: Failed to start level: {}", e);
                bus.request_shutdown();
                return;
            }

            let target_dt = Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64);
            let mut next_tick = Instant::now();

            loop {
                // 1. Handle system events
                while let Ok(sys_evt) = bus.sys_rx.try_recv() {
                    match sys_evt {
                        SystemEvent::Quit => {
                            log::info!("LOGIC: Quit received...");
                            send_result(&bus, &engine);
                            return;
                        }
                    }
                }

                // 2. One simulation tick
                let actions: Vec<GameAction> = bus.action_rx.try_iter().collect();
                let events = engine.tick(actions);
                let finished = events
                    .iter()
                    .any(|e| matches!(e, GameEvent::LevelComplete { .. }));

                // 3. Forward to the presentation side
                for event in events {
                    if bus.event_tx.send(event).is_err() {
                        log::warn!("LOGIC: Event receiver gone, stopping");
                        return;
                    }
                }
                // Dropping a snapshot is fine; a fresher one follows next tick.
                let _ = bus
                    .render_tx
                    .try_send(RenderState::InGame(engine.snapshot()));

                if finished {
                    send_result(&bus, &engine);
                    break;
                }

                // 4. Fixed-rate pacing without accumulating lag
                next_tick += target_dt;
                let now = Instant::now();
                if next_tick > now {
                    thread::sleep(next_tick - now);
                } else {
                    next_tick = now;
                }
            }

            log::info!("LOGIC: Thread stopped");
        })?;

    Ok(vec![audio, logic])
}

fn send_result(bus: &SystemBus, engine: &GameEngine) {
    let result = RenderState::Result(engine.scoring().score_data());
    if bus
        .render_tx
        .send_timeout(result, Duration::from_millis(500))
        .is_err()
    {
        log::warn!("LOGIC: Presentation gone, result dropped");
    }
}
