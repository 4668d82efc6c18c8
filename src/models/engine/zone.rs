//! The player zone: the box notes converge on and must be hit inside.

use crate::models::engine::live_note::LiveNote;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerZone {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl PlayerZone {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }

    /// Whether the note's hit box (unit box scaled by its size) overlaps the zone.
    pub fn overlaps(&self, note: &LiveNote) -> bool {
        let note_half = Vec2::splat(0.5 * note.size);
        let d = (note.position - self.center).abs();
        let reach = self.half_extents + note_half;
        d.x <= reach.x && d.y <= reach.y
    }
}

impl Default for PlayerZone {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::live_note::{NoteHandle, NoteStatus};

    fn note_at(position: Vec2, size: f32) -> LiveNote {
        LiveNote {
            handle: NoteHandle { epoch: 0, chart_index: 0 },
            chart_index: 0,
            hit_time: 1.0,
            spawn_time: 0.0,
            approach_duration: 1.0,
            spawn_position: position,
            target_position: Vec2::ZERO,
            position,
            size,
            status: NoteStatus::Approaching,
            resolved_at: None,
        }
    }

    #[test]
    fn test_contains_point() {
        let zone = PlayerZone::default();
        assert!(zone.contains_point(Vec2::new(0.9, -0.9)));
        assert!(!zone.contains_point(Vec2::new(1.1, 0.0)));
    }

    #[test]
    fn test_overlap_accounts_for_note_size() {
        let zone = PlayerZone::default();
        assert!(zone.overlaps(&note_at(Vec2::new(1.4, 0.0), 1.0)));
        assert!(!zone.overlaps(&note_at(Vec2::new(1.6, 0.0), 1.0)));
        assert!(zone.overlaps(&note_at(Vec2::new(1.9, 0.0), 2.0)));
    }
}
