//! Gameplay actions delivered to the logic thread.

/// A discrete player intent. Hit attempts carry no payload: the engine
/// samples its own clock when it handles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Hit,
    TogglePause,
    Restart,

    // Practice
    CreateCheckpoint,
    RemoveCheckpoint,
    PreviousCheckpoint,
    NextCheckpoint,
    TogglePractice,
}

impl GameAction {
    /// Actions still honoured while the game is paused.
    pub fn allowed_while_paused(self) -> bool {
        matches!(self, GameAction::TogglePause | GameAction::Restart)
    }
}
