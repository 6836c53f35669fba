//! Error types
//!
//! Nothing in the simulation is fatal: a bad ball/color combination keeps
//! the session from starting and the message is handed back to the caller.

use thiserror::Error;

/// Why a session refused to start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// Fewer than two balls per color would let a lone ball win on its own
    #[error("need at least {required} balls for {colors} colors (got {balls})")]
    NotEnoughBalls {
        balls: usize,
        colors: usize,
        required: usize,
    },

    /// Color count is zero or larger than the palette
    #[error("color count must be between 1 and {max} (got {colors})")]
    UnsupportedColorCount { colors: usize, max: usize },
}

/// Errors from reading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] StartError),

    #[error("invalid settings: {field} = {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
}
