//! Error types for timeline construction.

use thiserror::Error;

/// Result type for motion operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Authoring errors reported synchronously when a timeline is built.
///
/// Values are never clamped into range: a bad window or duration is a bug in
/// the surface that built the timeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Group entry window outside `0 <= start <= end <= 1`.
    #[error("invalid window [{start}, {end}]: expected 0 <= start <= end <= 1")]
    InvalidWindow { start: f64, end: f64 },

    /// Tick interval must be positive and finite.
    #[error("invalid tick interval {0}ms")]
    InvalidTick(f64),

    /// Duration must be non-negative and finite.
    #[error("invalid duration {0}ms")]
    InvalidDuration(f64),

    /// Interactive reference distance must be finite and non-zero.
    #[error("invalid reference distance {0}")]
    InvalidReference(f64),

    /// Unknown easing name or bad curve parameters.
    #[error("invalid easing: {0}")]
    InvalidEasing(String),
}
