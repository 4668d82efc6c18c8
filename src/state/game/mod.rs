//! Core gameplay engine for the rhythm simulation.
//!
//! The `GameEngine` owns the timing engine, spawn scheduler, scoring system
//! and checkpoint manager, and drives them in a fixed order once per tick:
//! - Spawn scheduler advance (auto-misses are scored here)
//! - Queued player actions
//! - Level completion check

mod input;
mod notes;
mod practice;
mod snapshot;

use crate::error::Result;
use crate::input::events::GameAction;
use crate::logic::audio::Playback;
use crate::logic::clock::Clock;
use crate::logic::practice::CheckpointManager;
use crate::logic::scoring::ScoringSystem;
use crate::logic::spawner::{SpawnLayout, SpawnScheduler};
use crate::logic::timing::TimingEngine;
use crate::models::engine::{Chart, PlayerZone};
use crate::models::settings::EngineSettings;
use crate::models::stats::HitResult;
use crate::shared::messages::{EventSender, GameEvent, publish};
use crossbeam_channel::{Receiver, unbounded};
use std::sync::Arc;

pub struct GameEngine {
    chart: Arc<Chart>,
    settings: EngineSettings,
    zone: PlayerZone,

    timing: TimingEngine,
    spawner: SpawnScheduler,
    scoring: ScoringSystem,
    practice: CheckpointManager,
    playback: Box<dyn Playback>,

    events_tx: EventSender,
    events_rx: Receiver<GameEvent>,

    /// Judgement of the last hit attempt or auto-miss.
    last_hit_result: Option<HitResult>,
    /// Timing error of the last judged hit attempt, in seconds.
    last_hit_timing: Option<f64>,
    /// Song time frozen at the moment of pausing.
    paused_at: Option<f64>,
    level_complete: bool,
}

impl GameEngine {
    /// Builds every component for `chart`. Nothing runs until
    /// [`GameEngine::start_level`].
    pub fn new(
        chart: Chart,
        settings: EngineSettings,
        clock: Box<dyn Clock>,
        playback: Box<dyn Playback>,
    ) -> Result<Self> {
        let chart = Arc::new(chart);
        let (events_tx, events_rx) = unbounded();

        let timing = TimingEngine::new(clock, &chart, &settings.difficulty)?;
        let spawner = SpawnScheduler::new(
            chart.clone(),
            &timing,
            SpawnLayout::from_settings(&settings),
            events_tx.clone(),
        )?;
        let scoring = ScoringSystem::new(settings.difficulty.clone(), events_tx.clone())?;
        let practice = CheckpointManager::new(settings.practice_mode, events_tx.clone());

        log::info!(
            "ENGINE: Loaded '{}' ({} notes, {:.1} BPM, {})",
            chart.name,
            chart.len(),
            chart.bpm,
            settings.difficulty.name
        );

        Ok(Self {
            zone: settings.player_zone(),
            chart,
            settings,
            timing,
            spawner,
            scoring,
            practice,
            playback,
            events_tx,
            events_rx,
            last_hit_result: None,
            last_hit_timing: None,
            paused_at: None,
            level_complete: false,
        })
    }

    /// Resets every component and starts the song from 0.
    pub fn start_level(&mut self) -> Result<()> {
        let difficulty = self.settings.difficulty.clone();
        self.timing.initialize(&self.chart, &difficulty)?;
        self.spawner.initialize(self.chart.clone(), &self.timing)?;
        self.scoring.initialize(difficulty)?;
        self.practice.clear();

        self.last_hit_result = None;
        self.last_hit_timing = None;
        self.paused_at = None;
        self.level_complete = false;

        self.playback.stop();
        self.playback.seek(0.0);
        self.timing.start();
        self.playback.play();

        log::info!("ENGINE: Level started");
        publish(&self.events_tx, GameEvent::LevelStarted);
        Ok(())
    }

    /// Tears everything down and starts over. Checkpoints do not survive.
    pub fn restart(&mut self) -> Result<()> {
        log::info!("ENGINE: Restarting level");
        self.start_level()
    }

    /// Runs one simulation tick and returns the events it produced, in
    /// emission order.
    pub fn tick(&mut self, actions: impl IntoIterator<Item = GameAction>) -> Vec<GameEvent> {
        if self.is_running() {
            self.update_notes();
        }

        for action in actions {
            self.handle_action(action);
        }

        if self.is_running() {
            self.check_level_complete();
        }

        self.events_rx.try_iter().collect()
    }

    fn is_running(&self) -> bool {
        self.paused_at.is_none() && !self.level_complete
    }

    /// Current song time; frozen while paused.
    pub fn song_time(&self) -> f64 {
        self.paused_at
            .unwrap_or_else(|| self.timing.current_song_time())
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.level_complete
    }

    pub fn chart(&self) -> &Arc<Chart> {
        &self.chart
    }

    pub fn timing(&self) -> &TimingEngine {
        &self.timing
    }

    pub fn spawner(&self) -> &SpawnScheduler {
        &self.spawner
    }

    pub fn scoring(&self) -> &ScoringSystem {
        &self.scoring
    }

    pub fn practice(&self) -> &CheckpointManager {
        &self.practice
    }
}
