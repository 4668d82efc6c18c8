//! Practice checkpoints and the joint seek they trigger.
//!
//! A restore moves three clocks at once: the timing engine, the spawn cursor
//! and the external playback. Every jump goes through [`CheckpointManager::restore_to`]
//! or [`CheckpointManager::restart_from_beginning`] so they cannot drift apart.

use crate::logic::audio::Playback;
use crate::logic::spawner::SpawnScheduler;
use crate::logic::timing::TimingEngine;
use crate::models::engine::Checkpoint;
use crate::shared::messages::{EventSender, GameEvent, publish};

/// The components a restore has to move together.
pub struct SyncTargets<'a> {
    pub timing: &'a mut TimingEngine,
    pub spawner: &'a mut SpawnScheduler,
    pub playback: &'a mut dyn Playback,
}

pub struct CheckpointManager {
    enabled: bool,
    /// Ordered by song time; equal times keep creation order.
    checkpoints: Vec<Checkpoint>,
    /// `None` means "at the song start, before the first checkpoint".
    current: Option<usize>,
    next_id: u64,
    events: EventSender,
}

impl CheckpointManager {
    pub fn new(enabled: bool, events: EventSender) -> Self {
        Self {
            enabled,
            checkpoints: Vec::new(),
            current: None,
            next_id: 0,
            events,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning practice mode off discards every checkpoint.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
        log::info!("PRACTICE: {}", if enabled { "Enabled" } else { "Disabled" });
    }

    pub fn clear(&mut self) {
        self.checkpoints.clear();
        self.current = None;
    }

    /// Records a checkpoint and makes it current.
    ///
    /// Returns its position in the chronological list, or `None` when
    /// practice mode is off.
    pub fn create(&mut self, song_time: f64, chart_cursor: usize) -> Option<usize> {
        if !self.enabled {
            log::debug!("PRACTICE: Checkpoint ignored, practice mode is off");
            return None;
        }

        let checkpoint = Checkpoint::new(self.next_id, song_time, chart_cursor);
        self.next_id += 1;

        let index = self
            .checkpoints
            .partition_point(|cp| cp.song_time <= checkpoint.song_time);
        log::info!("PRACTICE: {} (cursor {})", checkpoint.label, chart_cursor);
        self.checkpoints.insert(index, checkpoint.clone());
        self.current = Some(index);

        publish(&self.events, GameEvent::CheckpointCreated { index, checkpoint });
        Some(index)
    }

    /// Removes the most recently created checkpoint, wherever it sits in
    /// time order. A no-op on an empty list.
    pub fn remove_latest(&mut self) -> Option<Checkpoint> {
        let (index, _) = self
            .checkpoints
            .iter()
            .enumerate()
            .max_by_key(|(_, cp)| cp.id)?;
        let removed = self.checkpoints.remove(index);

        self.current = match self.current {
            _ if self.checkpoints.is_empty() => None,
            Some(c) if c > index => Some(c - 1),
            Some(c) => Some(c.min(self.checkpoints.len() - 1)),
            None => None,
        };

        log::info!("PRACTICE: Removed {}", removed.label);
        publish(
            &self.events,
            GameEvent::CheckpointRemoved {
                index,
                checkpoint: removed.clone(),
            },
        );
        Some(removed)
    }

    /// Steps back one checkpoint. Stepping back from the first one restarts
    /// the song from the beginning.
    pub fn go_to_previous(&mut self, targets: SyncTargets<'_>) {
        if self.checkpoints.is_empty() {
            return;
        }
        match self.current {
            Some(i) if i > 0 => {
                self.current = Some(i - 1);
                self.restore_to(&self.checkpoints[i - 1], targets);
            }
            _ => {
                self.current = None;
                self.restart_from_beginning(targets);
            }
        }
    }

    /// Steps forward one checkpoint. Past the last one nothing happens.
    pub fn go_to_next(&mut self, targets: SyncTargets<'_>) {
        let next = self.current.map_or(0, |i| i + 1);
        if next >= self.checkpoints.len() {
            log::debug!("PRACTICE: Already at the last checkpoint");
            return;
        }
        self.current = Some(next);
        self.restore_to(&self.checkpoints[next], targets);
    }

    /// Moves timing, spawner and playback to `checkpoint` as one step.
    pub fn restore_to(&self, checkpoint: &Checkpoint, targets: SyncTargets<'_>) {
        Self::jump(checkpoint.song_time, checkpoint.chart_cursor, targets);
        log::info!("PRACTICE: Restored {}", checkpoint.label);
        publish(
            &self.events,
            GameEvent::CheckpointActivated {
                checkpoint: Some(checkpoint.clone()),
            },
        );
    }

    pub fn restart_from_beginning(&self, targets: SyncTargets<'_>) {
        Self::jump(0.0, 0, targets);
        log::info!("PRACTICE: Restarted from the beginning");
        publish(&self.events, GameEvent::CheckpointActivated { checkpoint: None });
    }

    fn jump(song_time: f64, cursor: usize, targets: SyncTargets<'_>) {
        let SyncTargets {
            timing,
            spawner,
            playback,
        } = targets;

        playback.stop();
        // Also drops every live note.
        spawner.reset_to_index(cursor);
        timing.start_from_offset(song_time);
        playback.seek(song_time);
        playback.play();
    }

    /// Checkpoint closest in time to `song_time`.
    pub fn find_nearest(&self, song_time: f64) -> Option<&Checkpoint> {
        self.checkpoints.iter().min_by(|a, b| {
            let da = (a.song_time - song_time).abs();
            let db = (b.song_time - song_time).abs();
            da.total_cmp(&db)
        })
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Checkpoint> {
        self.current.and_then(|i| self.checkpoints.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::audio::testing::{PlaybackCall, RecordingPlayback};
    use crate::logic::clock::ManualClock;
    use crate::logic::spawner::SpawnLayout;
    use crate::models::engine::{Chart, DifficultyProfile, Note};
    use crossbeam_channel::{Receiver, unbounded};
    use std::sync::Arc;

    struct Rig {
        clock: ManualClock,
        timing: TimingEngine,
        spawner: SpawnScheduler,
        playback: RecordingPlayback,
        practice: CheckpointManager,
        rx: Receiver<GameEvent>,
    }

    impl Rig {
        fn new() -> Self {
            let notes = (0..20).map(|i| Note::new(2.0 + i as f64, 0.0)).collect();
            let chart = Chart::new(60.0, 0.0, notes);
            let clock = ManualClock::new(500.0);
            let timing =
                TimingEngine::new(Box::new(clock.clone()), &chart, &DifficultyProfile::normal()).unwrap();
            let (tx, rx) = unbounded();
            let spawner =
                SpawnScheduler::new(Arc::new(chart), &timing, SpawnLayout::default(), tx.clone()).unwrap();
            Self {
                clock,
                timing,
                spawner,
                playback: RecordingPlayback::default(),
                practice: CheckpointManager::new(true, tx),
                rx,
            }
        }

        fn targets(&mut self) -> (&mut CheckpointManager, SyncTargets<'_>) {
            (
                &mut self.practice,
                SyncTargets {
                    timing: &mut self.timing,
                    spawner: &mut self.spawner,
                    playback: &mut self.playback,
                },
            )
        }

        fn times(&self) -> Vec<f64> {
            self.practice.checkpoints().iter().map(|c| c.song_time).collect()
        }
    }

    #[test]
    fn test_round_trip() {
        let mut rig = Rig::new();
        rig.timing.start();
        rig.clock.advance(15.0);
        rig.spawner.advance(&rig.timing);
        assert!(!rig.spawner.live_notes().is_empty());

        let index = rig.practice.create(12.34, 7).unwrap();
        let checkpoint = rig.practice.checkpoints()[index].clone();
        let (practice, targets) = rig.targets();
        practice.restore_to(&checkpoint, targets);

        assert!((rig.timing.current_song_time() - 12.34).abs() < 1e-9);
        assert_eq!(rig.spawner.cursor(), 7);
        assert!(rig.spawner.live_notes().is_empty());
        assert_eq!(
            rig.playback.take_calls(),
            vec![PlaybackCall::Stop, PlaybackCall::Seek(12.34), PlaybackCall::Play]
        );
    }

    #[test]
    fn test_create_keeps_time_order() {
        let mut rig = Rig::new();
        assert_eq!(rig.practice.create(10.0, 5), Some(0));
        assert_eq!(rig.practice.create(4.0, 2), Some(0));
        assert_eq!(rig.practice.create(7.0, 3), Some(1));
        // Equal time goes after the existing one.
        assert_eq!(rig.practice.create(7.0, 3), Some(2));
        assert_eq!(rig.times(), vec![4.0, 7.0, 7.0, 10.0]);
        assert_eq!(rig.practice.current_index(), Some(2));
        assert_eq!(rig.practice.current().unwrap().id, 3);
    }

    #[test]
    fn test_remove_latest_is_creation_order() {
        let mut rig = Rig::new();
        rig.practice.create(10.0, 5);
        rig.practice.create(4.0, 2);
        rig.practice.create(20.0, 9);
        rig.practice.create(15.0, 7);
        assert_eq!(rig.practice.current_index(), Some(2));

        // Latest created is the 15s one, not the chronologically last.
        let removed = rig.practice.remove_latest().unwrap();
        assert_eq!(removed.song_time, 15.0);
        assert_eq!(rig.times(), vec![4.0, 10.0, 20.0]);
        assert_eq!(rig.practice.current_index(), Some(2));

        let removed = rig.practice.remove_latest().unwrap();
        assert_eq!(removed.song_time, 20.0);
        assert_eq!(rig.practice.current_index(), Some(1));

        rig.practice.remove_latest();
        rig.practice.remove_latest();
        assert_eq!(rig.practice.current_index(), None);
        assert!(rig.practice.remove_latest().is_none());

        let removed_events = rig
            .rx
            .try_iter()
            .filter(|e| matches!(e, GameEvent::CheckpointRemoved { .. }))
            .count();
        assert_eq!(removed_events, 4);
    }

    #[test]
    fn test_remove_before_current_shifts_pointer() {
        let mut rig = Rig::new();
        rig.practice.create(10.0, 5);
        rig.practice.create(2.0, 1);
        rig.practice.create(20.0, 9);
        // Point at 10s, then drop the 20s one created last.
        let (practice, targets) = rig.targets();
        practice.go_to_previous(targets);
        assert_eq!(rig.practice.current().unwrap().song_time, 10.0);

        rig.practice.remove_latest();
        assert_eq!(rig.practice.current().unwrap().song_time, 10.0);

        // Now the 2s one is latest; pointer shifts down to stay on 10s.
        rig.practice.remove_latest();
        assert_eq!(rig.practice.current_index(), Some(0));
        assert_eq!(rig.practice.current().unwrap().song_time, 10.0);
    }

    #[test]
    fn test_previous_from_first_restarts_song() {
        let mut rig = Rig::new();
        rig.timing.start();
        rig.clock.advance(8.0);
        rig.practice.create(5.0, 3);
        rig.practice.create(1.0, 0);
        assert_eq!(rig.practice.current_index(), Some(0));

        let (practice, targets) = rig.targets();
        practice.go_to_previous(targets);

        assert_eq!(rig.practice.current_index(), None);
        assert_eq!(rig.spawner.cursor(), 0);
        assert!(rig.timing.current_song_time().abs() < 1e-9);
        assert!(
            rig.rx
                .try_iter()
                .any(|e| e == GameEvent::CheckpointActivated { checkpoint: None })
        );

        // Next from the start goes to the first checkpoint.
        let (practice, targets) = rig.targets();
        practice.go_to_next(targets);
        assert_eq!(rig.practice.current_index(), Some(0));
        assert!((rig.timing.current_song_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_next_past_last_is_noop() {
        let mut rig = Rig::new();
        rig.timing.start();
        rig.practice.create(3.0, 1);
        rig.practice.create(6.0, 4);
        rig.clock.advance(9.0);

        let (practice, targets) = rig.targets();
        practice.go_to_next(targets);

        assert_eq!(rig.practice.current_index(), Some(1));
        assert!(rig.playback.take_calls().is_empty());
        assert!((rig.timing.current_song_time() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_navigation_on_empty_list_is_noop() {
        let mut rig = Rig::new();
        let (practice, targets) = rig.targets();
        practice.go_to_previous(targets);
        let (practice, targets) = rig.targets();
        practice.go_to_next(targets);
        assert!(rig.playback.take_calls().is_empty());
        assert_eq!(rig.practice.current_index(), None);
    }

    #[test]
    fn test_restore_clamps_cursor() {
        let mut rig = Rig::new();
        let checkpoint = Checkpoint::new(0, 4.0, 500);
        let (practice, targets) = rig.targets();
        practice.restore_to(&checkpoint, targets);
        assert_eq!(rig.spawner.cursor(), 20);
    }

    #[test]
    fn test_find_nearest() {
        let mut rig = Rig::new();
        assert!(rig.practice.find_nearest(3.0).is_none());
        rig.practice.create(2.0, 0);
        rig.practice.create(9.0, 6);
        rig.practice.create(5.0, 3);
        assert_eq!(rig.practice.find_nearest(6.5).unwrap().song_time, 5.0);
        assert_eq!(rig.practice.find_nearest(100.0).unwrap().song_time, 9.0);
    }

    #[test]
    fn test_disabled_mode() {
        let mut rig = Rig::new();
        rig.practice.create(2.0, 0);
        rig.practice.set_enabled(false);
        assert!(rig.practice.checkpoints().is_empty());
        assert_eq!(rig.practice.create(3.0, 1), None);
    }
}
