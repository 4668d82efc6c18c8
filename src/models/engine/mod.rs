pub mod beat;
pub mod chart;
pub mod checkpoint;
pub mod difficulty;
pub mod live_note;
pub mod zone;

pub use beat::CardinalDirection;
pub use chart::{Chart, DEFAULT_APPROACH_TIME, Note};
pub use checkpoint::Checkpoint;
pub use difficulty::DifficultyProfile;
pub use live_note::{LiveNote, NoteHandle, NoteStatus, Resolution, ease_out_cubic};
pub use zone::PlayerZone;
