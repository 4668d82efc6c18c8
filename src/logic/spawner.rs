//! Spawn scheduler: walks the chart with a cursor and owns the live notes.
//!
//! Live notes sit in a dense `Vec` ordered by chart index. Resolved notes stay
//! around for their feedback window and are compacted away on a later tick.

use crate::error::{EngineError, Result};
use crate::logic::timing::TimingEngine;
use crate::models::engine::{Chart, LiveNote, NoteHandle, NoteStatus, Resolution, ease_out_cubic};
use crate::models::settings::EngineSettings;
use crate::shared::messages::{EventSender, GameEvent, publish};
use glam::Vec2;
use std::sync::Arc;

/// Seconds past its hit time before an untouched note counts as missed.
pub const AUTO_MISS_GRACE_SECONDS: f64 = 0.15;

/// Geometry and feedback timings used when spawning notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnLayout {
    pub spawn_distance: f32,
    pub zone_center: Vec2,
    pub hit_feedback_seconds: f64,
    pub miss_feedback_seconds: f64,
}

impl SpawnLayout {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            spawn_distance: settings.spawn_distance,
            zone_center: settings.zone_center,
            hit_feedback_seconds: settings.hit_feedback_seconds,
            miss_feedback_seconds: settings.miss_feedback_seconds,
        }
    }
}

impl Default for SpawnLayout {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

pub struct SpawnScheduler {
    chart: Arc<Chart>,
    layout: SpawnLayout,
    approach_time: f64,
    cursor: usize,
    epoch: u32,
    live: Vec<LiveNote>,
    last_tick_time: f64,
    events: EventSender,
}

impl SpawnScheduler {
    pub fn new(chart: Arc<Chart>, timing: &TimingEngine, layout: SpawnLayout, events: EventSender) -> Result<Self> {
        let mut scheduler = Self {
            chart: chart.clone(),
            layout,
            approach_time: 0.0,
            cursor: 0,
            epoch: 0,
            live: Vec::new(),
            last_tick_time: 0.0,
            events,
        };
        scheduler.initialize(chart, timing)?;
        Ok(scheduler)
    }

    /// Loads a chart, derives the approach time from the timing speed and
    /// returns to cursor 0 with no live notes.
    ///
    /// An unsorted chart is rejected: the cursor scan stops at the first note
    /// that is not due and would silently skip out-of-order notes.
    pub fn initialize(&mut self, chart: Arc<Chart>, timing: &TimingEngine) -> Result<()> {
        chart.validate()?;
        let speed = timing.speed_multiplier();
        if speed <= 0.0 {
            return Err(EngineError::invalid(format!("speed multiplier {speed} must be positive")));
        }

        self.approach_time = chart.default_approach_time / speed;
        self.chart = chart;
        self.cursor = 0;
        self.last_tick_time = 0.0;
        self.clear_all();

        log::info!(
            "SPAWN: {} notes, approach {:.3}s",
            self.chart.len(),
            self.approach_time
        );
        Ok(())
    }

    /// Runs one scheduler tick at the timing engine's current song time.
    ///
    /// Returns the handles of notes that were auto-missed during this tick,
    /// so the caller can feed them to scoring.
    pub fn advance(&mut self, timing: &TimingEngine) -> Vec<NoteHandle> {
        let now = timing.current_song_time();
        self.last_tick_time = now;

        let chart = Arc::clone(&self.chart);
        while let Some(note) = chart.notes.get(self.cursor) {
            let hit_time = timing.beats_to_seconds(note.beat_time);
            let approach_duration = self.approach_time / note.speed_multiplier;
            let spawn_time = hit_time - approach_duration;
            if spawn_time > now {
                break;
            }

            let target_position = self.layout.zone_center + note.position_offset;
            let distance = self.layout.spawn_distance * note.speed_multiplier as f32;
            let spawn_position = target_position + note.approach_direction() * distance;
            let handle = NoteHandle {
                epoch: self.epoch,
                chart_index: self.cursor,
            };

            self.live.push(LiveNote {
                handle,
                chart_index: self.cursor,
                hit_time,
                spawn_time,
                approach_duration,
                spawn_position,
                target_position,
                position: spawn_position,
                size: note.size_multiplier as f32,
                status: NoteStatus::Approaching,
                resolved_at: None,
            });
            log::trace!("SPAWN: Note {} due at {:.3}s", self.cursor, hit_time);
            publish(
                &self.events,
                GameEvent::NoteSpawned {
                    chart_index: self.cursor,
                    hit_time,
                    spawn_position,
                },
            );
            self.cursor += 1;
        }

        let mut missed = Vec::new();
        for note in self.live.iter_mut().filter(|n| n.is_approaching()) {
            let progress = if note.approach_duration > 0.0 {
                ((now - note.spawn_time) / note.approach_duration).clamp(0.0, 1.0)
            } else {
                1.0
            };
            let eased = ease_out_cubic(progress) as f32;
            note.position = note.spawn_position.lerp(note.target_position, eased);

            if now - note.hit_time > AUTO_MISS_GRACE_SECONDS {
                note.status = NoteStatus::Missed;
                note.resolved_at = Some(now);
                missed.push(note.handle);
                publish(
                    &self.events,
                    GameEvent::NoteMissed {
                        chart_index: note.chart_index,
                        hit_time: note.hit_time,
                    },
                );
            }
        }
        if !missed.is_empty() {
            log::debug!("SPAWN: {} note(s) auto-missed at {:.3}s", missed.len(), now);
        }

        self.compact(now);
        missed
    }

    /// Moves a live note to a terminal state.
    ///
    /// Returns `false` without side effects when the handle is stale or the
    /// note is already resolved.
    pub fn resolve(&mut self, handle: NoteHandle, resolution: Resolution) -> bool {
        if handle.epoch != self.epoch {
            return false;
        }
        let now = self.last_tick_time;
        let Some(note) = self.find_mut(handle) else {
            return false;
        };
        if note.is_resolved() {
            return false;
        }

        note.status = resolution.into();
        note.resolved_at = Some(now);
        let (chart_index, status) = (note.chart_index, note.status);
        publish(&self.events, GameEvent::NoteResolved { chart_index, status });
        true
    }

    /// Clears the live set and moves the cursor, clamped to the chart length.
    pub fn reset_to_index(&mut self, index: usize) {
        let clamped = index.min(self.chart.len());
        if clamped != index {
            log::warn!("SPAWN: Cursor {} out of range, clamped to {}", index, clamped);
        }
        self.clear_all();
        self.cursor = clamped;
    }

    /// Drops every live note and invalidates outstanding handles.
    pub fn clear_all(&mut self) {
        self.live.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn live_notes(&self) -> &[LiveNote] {
        &self.live
    }

    pub fn get(&self, handle: NoteHandle) -> Option<&LiveNote> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.live
            .binary_search_by_key(&handle.chart_index, |n| n.chart_index)
            .ok()
            .map(|i| &self.live[i])
    }

    pub fn approach_time(&self) -> f64 {
        self.approach_time
    }

    pub fn chart(&self) -> &Arc<Chart> {
        &self.chart
    }

    /// All chart notes have been spawned.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.chart.len()
    }

    pub fn has_approaching(&self) -> bool {
        self.live.iter().any(|n| n.is_approaching())
    }

    fn find_mut(&mut self, handle: NoteHandle) -> Option<&mut LiveNote> {
        let i = self
            .live
            .binary_search_by_key(&handle.chart_index, |n| n.chart_index)
            .ok()?;
        self.live.get_mut(i)
    }

    /// Removes resolved notes whose feedback window has elapsed.
    fn compact(&mut self, now: f64) {
        let layout = self.layout;
        self.live.retain(|note| match (note.status, note.resolved_at) {
            (NoteStatus::Approaching, _) | (_, None) => true,
            (NoteStatus::Hit, Some(at)) => now - at < layout.hit_feedback_seconds,
            (NoteStatus::Missed, Some(at)) => now - at < layout.miss_feedback_seconds,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::clock::ManualClock;
    use crate::models::engine::{DifficultyProfile, Note};
    use crossbeam_channel::{Receiver, unbounded};

    fn chart_of(beats: &[f64]) -> Chart {
        Chart::new(60.0, 0.0, beats.iter().map(|&b| Note::new(b, 0.0)).collect())
    }

    fn setup(chart: Chart, speed: f64) -> (ManualClock, TimingEngine, SpawnScheduler, Receiver<GameEvent>) {
        let clock = ManualClock::new(1000.0);
        let difficulty = DifficultyProfile::from_custom(speed, 0.05, 0.1, true);
        let mut timing = TimingEngine::new(Box::new(clock.clone()), &chart, &difficulty).unwrap();
        timing.start();
        let (tx, rx) = unbounded();
        let spawner = SpawnScheduler::new(Arc::new(chart), &timing, SpawnLayout::default(), tx).unwrap();
        (clock, timing, spawner, rx)
    }

    fn spawned(rx: &Receiver<GameEvent>) -> Vec<usize> {
        rx.try_iter()
            .filter_map(|e| match e {
                GameEvent::NoteSpawned { chart_index, .. } => Some(chart_index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_spawns_at_look_ahead() {
        // 60 BPM: beat n hits at n seconds, approach 1s.
        let (clock, timing, mut spawner, rx) = setup(chart_of(&[2.0, 3.0]), 1.0);

        clock.set(1000.9);
        spawner.advance(&timing);
        assert!(spawner.live_notes().is_empty());

        clock.set(1001.0);
        spawner.advance(&timing);
        assert_eq!(spawner.cursor(), 1);
        assert_eq!(spawned(&rx), vec![0]);

        let note = &spawner.live_notes()[0];
        assert_eq!(note.hit_time, 2.0);
        assert_eq!(note.spawn_time, 1.0);
        assert!((note.spawn_position - Vec2::new(10.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_note_speed_shortens_approach_and_extends_distance() {
        let chart = Chart::new(60.0, 0.0, vec![Note::new(4.0, 90.0).with_speed(2.0)]);
        let (clock, timing, mut spawner, _rx) = setup(chart, 1.0);

        clock.set(1003.49);
        spawner.advance(&timing);
        assert!(spawner.live_notes().is_empty());

        clock.set(1003.5);
        spawner.advance(&timing);
        let note = &spawner.live_notes()[0];
        assert_eq!(note.approach_duration, 0.5);
        assert!((note.spawn_position - Vec2::new(0.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn test_difficulty_speed_scales_approach() {
        let (_clock, _timing, spawner, _rx) = setup(chart_of(&[2.0]), 2.0);
        assert_eq!(spawner.approach_time(), 0.5);
    }

    #[test]
    fn test_catches_up_several_notes_in_one_tick() {
        let (clock, timing, mut spawner, rx) = setup(chart_of(&[1.0, 1.5, 2.0, 8.0]), 1.0);
        clock.set(1001.05);
        spawner.advance(&timing);
        assert_eq!(spawned(&rx), vec![0, 1, 2]);
        assert_eq!(spawner.cursor(), 3);
    }

    #[test]
    fn test_position_eases_towards_target() {
        let (clock, timing, mut spawner, _rx) = setup(chart_of(&[2.0]), 1.0);
        clock.set(1001.0);
        spawner.advance(&timing);
        clock.set(1001.5);
        spawner.advance(&timing);
        // ease_out_cubic(0.5) = 0.875
        let x = spawner.live_notes()[0].position.x;
        assert!((x - 1.25).abs() < 1e-4);

        clock.set(1002.0);
        spawner.advance(&timing);
        assert!(spawner.live_notes()[0].position.length() < 1e-5);
    }

    #[test]
    fn test_auto_miss_after_grace() {
        let (clock, timing, mut spawner, rx) = setup(chart_of(&[2.0]), 1.0);
        clock.set(1001.0);
        spawner.advance(&timing);

        clock.set(1002.14);
        assert!(spawner.advance(&timing).is_empty());

        clock.set(1002.16);
        let missed = spawner.advance(&timing);
        assert_eq!(missed.len(), 1);
        assert_eq!(spawner.live_notes()[0].status, NoteStatus::Missed);
        assert!(
            rx.try_iter()
                .any(|e| matches!(e, GameEvent::NoteMissed { chart_index: 0, .. }))
        );

        // Already missed: not reported twice.
        clock.set(1002.2);
        assert!(spawner.advance(&timing).is_empty());

        // Gone once the miss feedback window elapses.
        clock.set(1002.5);
        spawner.advance(&timing);
        assert!(spawner.live_notes().is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let (clock, timing, mut spawner, rx) = setup(chart_of(&[2.0]), 1.0);
        clock.set(1001.9);
        spawner.advance(&timing);
        let handle = spawner.live_notes()[0].handle;

        assert!(spawner.resolve(handle, Resolution::Hit));
        assert!(!spawner.resolve(handle, Resolution::Missed));
        assert_eq!(spawner.get(handle).unwrap().status, NoteStatus::Hit);

        let resolved = rx
            .try_iter()
            .filter(|e| matches!(e, GameEvent::NoteResolved { .. }))
            .count();
        assert_eq!(resolved, 1);

        // A hit note never auto-misses.
        clock.set(1002.5);
        assert!(spawner.advance(&timing).is_empty());
    }

    #[test]
    fn test_stale_handle_after_reset_is_ignored() {
        let (clock, timing, mut spawner, _rx) = setup(chart_of(&[2.0]), 1.0);
        clock.set(1001.5);
        spawner.advance(&timing);
        let handle = spawner.live_notes()[0].handle;

        spawner.reset_to_index(0);
        spawner.advance(&timing);
        assert_eq!(spawner.live_notes().len(), 1);
        assert!(!spawner.resolve(handle, Resolution::Hit));
        assert!(spawner.get(handle).is_none());
        assert!(spawner.live_notes()[0].is_approaching());
    }

    #[test]
    fn test_reset_to_index_clamps() {
        let (clock, timing, mut spawner, _rx) = setup(chart_of(&[1.0, 2.0, 3.0]), 1.0);
        clock.set(1001.0);
        spawner.advance(&timing);
        assert!(!spawner.live_notes().is_empty());

        spawner.reset_to_index(99);
        assert_eq!(spawner.cursor(), 3);
        assert!(spawner.live_notes().is_empty());
        assert!(spawner.is_exhausted());

        spawner.reset_to_index(1);
        assert_eq!(spawner.cursor(), 1);
    }

    #[test]
    fn test_rejects_unsorted_chart() {
        let clock = ManualClock::new(0.0);
        let sorted = chart_of(&[1.0]);
        let timing = TimingEngine::new(Box::new(clock), &sorted, &DifficultyProfile::normal()).unwrap();
        let (tx, _rx) = unbounded();
        let result = SpawnScheduler::new(Arc::new(chart_of(&[3.0, 1.0])), &timing, SpawnLayout::default(), tx);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_deterministic_spawn_sequence() {
        let run = || {
            let chart = Chart::random(7, 40, 150.0);
            let (clock, timing, mut spawner, rx) = setup(chart, 1.0);
            let mut log = Vec::new();
            for step in 0..600 {
                clock.set(1000.0 + step as f64 * 0.1);
                spawner.advance(&timing);
                for event in rx.try_iter() {
                    if let GameEvent::NoteSpawned {
                        chart_index,
                        hit_time,
                        spawn_position,
                    } = event
                    {
                        log.push((step, chart_index, hit_time.to_bits(), spawn_position.x.to_bits()));
                    }
                }
            }
            log
        };

        let first = run();
        assert_eq!(first.len(), 40);
        assert_eq!(first, run());
    }
}
