//! Headless driver and thread bootstrapper.
//!
//! Usage: `beatline [chart-path] [config-path]`. Without a chart a seeded
//! random one is generated. The main thread acts as the presentation sink.

use beatline::input::{self, AutoplayScript};
use beatline::logic;
use beatline::shared::snapshot::RenderState;
use beatline::system::bus::SystemBus;
use beatline::{AudioManager, Chart, EngineSettings, GameEngine, GameEvent, ScoreData, SystemClock};
use crossbeam_channel::select;
use env_logger::Env;
use std::path::{Path, PathBuf};

const RANDOM_CHART_NOTES: usize = 64;
const RANDOM_CHART_BPM: f64 = 128.0;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("MAIN: Booting beatline...");

    if let Err(e) = run() {
        log::error!("MAIN: {}", e);
        std::process::exit(1);
    }
}

fn run() -> beatline::Result<()> {
    let mut args = std::env::args().skip(1);
    let chart_path = args.next().map(PathBuf::from);
    let config_path = args
        .next()
        .map_or_else(|| PathBuf::from("config.toml"), PathBuf::from);

    let settings = EngineSettings::load_or_default(&config_path)?;
    let chart = load_chart(chart_path.as_deref())?;

    let bus = SystemBus::new();
    let tick_rate = settings.tick_rate;
    let engine = GameEngine::new(
        chart,
        settings,
        Box::new(SystemClock::new()),
        Box::new(AudioManager::new(&bus)),
    )?;

    let script = AutoplayScript::new(engine.hit_times(), engine.song_end(), rand::random());

    let mut handles = logic::start_thread(bus.clone(), engine, tick_rate)?;
    handles.push(input::start_thread(bus.clone(), script)?);

    let result = present(&bus);

    bus.request_shutdown();
    for handle in handles {
        if handle.join().is_err() {
            log::error!("MAIN: A worker thread panicked");
        }
    }

    match result {
        Some(score) => log_result(&score),
        None => log::warn!("MAIN: Finished without a result"),
    }
    Ok(())
}

fn load_chart(path: Option<&Path>) -> beatline::Result<Chart> {
    match path {
        Some(path) => {
            let chart = Chart::load(path)?;
            log::info!("MAIN: Loaded chart {:?}", path);
            Ok(chart)
        }
        None => {
            let seed: u64 = rand::random();
            log::info!("MAIN: No chart given, generating one (seed {})", seed);
            Ok(Chart::random(seed, RANDOM_CHART_NOTES, RANDOM_CHART_BPM))
        }
    }
}

/// Consumes events and snapshots until the logic thread reports a result.
fn present(bus: &SystemBus) -> Option<ScoreData> {
    let mut last_logged_second = -1i64;

    loop {
        select! {
            recv(bus.event_rx) -> event => match event {
                Ok(event) => log_event(&event),
                Err(_) => return None,
            },
            recv(bus.render_rx) -> state => match state {
                Ok(RenderState::InGame(snapshot)) => {
                    let second = snapshot.song_time.floor() as i64;
                    if second != last_logged_second && !snapshot.paused {
                        last_logged_second = second;
                        log::info!(
                            "MAIN: {:>6.2}s {:>5.1}% | score {:>7} combo {:>3} acc {:>6.2}% | {} live",
                            snapshot.song_time,
                            snapshot.progress * 100.0,
                            snapshot.score.total_score,
                            snapshot.score.combo,
                            snapshot.accuracy,
                            snapshot.live_notes.len()
                        );
                    }
                }
                Ok(RenderState::Result(score)) => {
                    // Flush what the logic thread sent before the result.
                    bus.event_rx.try_iter().for_each(|e| log_event(&e));
                    return Some(score);
                }
                Ok(RenderState::Empty) => {}
                Err(_) => return None,
            },
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::NoteSpawned { chart_index, .. } => log::trace!("MAIN: Spawned note {}", chart_index),
        GameEvent::HitOutcome {
            result,
            score_gained,
        } => log::debug!("MAIN: {:?} +{}", result, score_gained),
        GameEvent::CheckpointCreated { index, checkpoint } => {
            log::info!("MAIN: Checkpoint #{} {}", index, checkpoint.label)
        }
        GameEvent::CheckpointRemoved { checkpoint, .. } => {
            log::info!("MAIN: Removed {}", checkpoint.label)
        }
        GameEvent::CheckpointActivated { checkpoint } => match checkpoint {
            Some(checkpoint) => log::info!("MAIN: Jumped to {}", checkpoint.label),
            None => log::info!("MAIN: Jumped to song start"),
        },
        GameEvent::LevelComplete { .. } => log::info!("MAIN: Level complete"),
        other => log::trace!("MAIN: {:?}", other),
    }
}

fn log_result(score: &ScoreData) {
    log::info!("MAIN: ===== RESULT =====");
    log::info!("MAIN: Score     {}", score.total_score);
    log::info!("MAIN: Accuracy  {:.2}%", score.accuracy);
    log::info!("MAIN: Max combo {}", score.max_combo);
    log::info!(
        "MAIN: Perfect {} / Good {} / Miss {}",
        score.perfect_hits,
        score.good_hits,
        score.missed_hits
    );
}
