//! Error type shared by the whole crate.
//!
//! Only configuration problems are surfaced as errors. Out-of-range cursors
//! are clamped and redundant resolutions are absorbed where they happen.

use thiserror::Error;

/// Errors that can abort engine construction or asset loading.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Chart or difficulty data that cannot be played (non-positive BPM,
    /// unsorted notes, speed multiplier out of range, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
