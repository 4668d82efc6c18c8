//! Timing engine: maps the injected clock to song time and beats.
//!
//! Song time is `clock_now - song_start_clock` while running and reads 0 when
//! stopped. Beat conversions use the effective BPM (`chart.bpm * speed`) and
//! the chart offset.

use crate::error::{EngineError, Result};
use crate::logic::clock::Clock;
use crate::models::engine::{Chart, DifficultyProfile};

pub struct TimingEngine {
    clock: Box<dyn Clock>,
    song_start_clock: f64,
    running: bool,
    speed_multiplier: f64,
    effective_bpm: f64,
    offset_seconds: f64,
}

impl TimingEngine {
    /// Creates a stopped engine configured for `chart` at `difficulty`.
    pub fn new(clock: Box<dyn Clock>, chart: &Chart, difficulty: &DifficultyProfile) -> Result<Self> {
        let mut engine = Self {
            clock,
            song_start_clock: 0.0,
            running: false,
            speed_multiplier: 1.0,
            effective_bpm: 0.0,
            offset_seconds: 0.0,
        };
        engine.initialize(chart, difficulty)?;
        Ok(engine)
    }

    /// Reconfigures tempo and speed and returns to the stopped state.
    pub fn initialize(&mut self, chart: &Chart, difficulty: &DifficultyProfile) -> Result<()> {
        if !(chart.bpm.is_finite() && chart.bpm > 0.0) {
            return Err(EngineError::invalid(format!(
                "chart BPM must be positive, got {}",
                chart.bpm
            )));
        }
        difficulty.validate()?;

        self.speed_multiplier = difficulty.speed_multiplier;
        self.effective_bpm = chart.scaled_bpm(difficulty.speed_multiplier);
        self.offset_seconds = chart.offset_seconds;
        self.running = false;

        log::debug!(
            "TIMING: {:.2} BPM x{:.2} -> {:.2} effective, offset {:.3}s",
            chart.bpm,
            self.speed_multiplier,
            self.effective_bpm,
            self.offset_seconds
        );
        Ok(())
    }

    /// Starts running with song time 0 at the instant of the call.
    pub fn start(&mut self) {
        self.start_from_offset(0.0);
    }

    /// Starts running so that song time equals `offset` at the instant of the call.
    pub fn start_from_offset(&mut self, offset: f64) {
        self.song_start_clock = self.clock.now() - offset;
        self.running = true;
        log::debug!("TIMING: Running from {:.3}s", offset);
    }

    /// Stops the engine. Song time reads 0 until the next start.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds since the song start, or 0 while stopped.
    pub fn current_song_time(&self) -> f64 {
        if !self.running {
            return 0.0;
        }
        self.clock.now() - self.song_start_clock
    }

    pub fn current_beat(&self) -> f64 {
        if self.effective_bpm <= 0.0 {
            return 0.0;
        }
        (self.current_song_time() - self.offset_seconds) / self.beat_duration()
    }

    /// Seconds per beat at the effective BPM.
    pub fn beat_duration(&self) -> f64 {
        if self.effective_bpm <= 0.0 {
            return 0.0;
        }
        60.0 / self.effective_bpm
    }

    pub fn beats_to_seconds(&self, beats: f64) -> f64 {
        beats * self.beat_duration() + self.offset_seconds
    }

    pub fn seconds_to_beats(&self, seconds: f64) -> f64 {
        let duration = self.beat_duration();
        if duration <= 0.0 {
            return 0.0;
        }
        (seconds - self.offset_seconds) / duration
    }

    pub fn has_reached_beat(&self, beat: f64) -> bool {
        self.current_beat() >= beat
    }

    /// Seconds from now until `beat` (negative once it has passed).
    pub fn time_until_beat(&self, beat: f64) -> f64 {
        self.beats_to_seconds(beat) - self.current_song_time()
    }

    pub fn effective_bpm(&self) -> f64 {
        self.effective_bpm
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn offset_seconds(&self) -> f64 {
        self.offset_seconds
    }
}
