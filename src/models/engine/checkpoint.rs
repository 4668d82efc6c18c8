//! Practice checkpoints: a saved (song time, spawn cursor) pair.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Creation sequence number, unique within a practice session.
    pub id: u64,
    /// Song time in seconds where play resumes.
    pub song_time: f64,
    /// Index of the next chart note to spawn after restoring.
    pub chart_cursor: usize,
    pub label: String,
}

impl Checkpoint {
    /// Builds a checkpoint; negative times are clamped to the song start.
    pub fn new(id: u64, song_time: f64, chart_cursor: usize) -> Self {
        let song_time = song_time.max(0.0);
        Self {
            id,
            song_time,
            chart_cursor,
            label: format!("Checkpoint {}", format_time(song_time)),
        }
    }
}

/// Formats seconds as `MM:SS.cc`.
pub fn format_time(seconds: f64) -> String {
    // Small bias so 12.34 does not render as 12.33 after float rounding.
    let centis = (seconds.max(0.0) * 100.0 + 1e-6).floor() as u64;
    let minutes = centis / 6000;
    let secs = (centis / 100) % 60;
    let cs = centis % 100;
    format!("{minutes:02}:{secs:02}.{cs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(12.34), "00:12.34");
        assert_eq!(format_time(75.5), "01:15.50");
        assert_eq!(format_time(3599.999), "59:59.99");
    }

    #[test]
    fn test_label_and_clamp() {
        let cp = Checkpoint::new(3, 12.34, 7);
        assert_eq!(cp.label, "Checkpoint 00:12.34");
        assert_eq!(cp.chart_cursor, 7);

        let early = Checkpoint::new(0, -0.01, 0);
        assert_eq!(early.song_time, 0.0);
    }
}
