//! Horizontal swipe classification.
//!
//! A swipe is decided once, when the gesture ends, from the total travel and
//! the release velocity:
//!
//! ```text
//! |dx| > |dy|  &&  |dx| > distance_threshold  &&  |vx| > velocity_threshold
//! ```

use glide_config::GestureConfig;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Divisor turning raw fling velocity into the reported swipe velocity.
pub const DEFAULT_VELOCITY_NORMALIZATION: f64 = 1750.0;

/// Minimum horizontal fling velocity, units per second.
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 1200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// A recognized swipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeDecision {
    pub direction: SwipeDirection,
    /// `|vx| / normalization`.
    pub velocity: f64,
}

/// Classify with the default normalization.
pub fn classify(
    dx: f64,
    dy: f64,
    vx: f64,
    vy: f64,
    distance_threshold: f64,
    velocity_threshold: f64,
) -> Option<SwipeDecision> {
    SwipeRecognizer::new(distance_threshold, velocity_threshold).classify(dx, dy, vx, vy)
}

/// Swipe thresholds bundled for one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeRecognizer {
    distance_threshold: f64,
    velocity_threshold: f64,
    normalization: f64,
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_VELOCITY_THRESHOLD)
    }
}

impl SwipeRecognizer {
    pub fn new(distance_threshold: f64, velocity_threshold: f64) -> Self {
        Self {
            distance_threshold,
            velocity_threshold,
            normalization: DEFAULT_VELOCITY_NORMALIZATION,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.swipe_distance_threshold, config.swipe_velocity_threshold)
            .with_normalization(config.swipe_velocity_normalization)
    }

    /// Non-positive values keep the default.
    pub fn with_normalization(mut self, normalization: f64) -> Self {
        if normalization.is_finite() && normalization > 0.0 {
            self.normalization = normalization;
        }
        self
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    pub fn velocity_threshold(&self) -> f64 {
        self.velocity_threshold
    }

    pub fn normalization(&self) -> f64 {
        self.normalization
    }

    pub fn classify(&self, dx: f64, dy: f64, vx: f64, vy: f64) -> Option<SwipeDecision> {
        let recognized =
            dx.abs() > dy.abs() && dx.abs() > self.distance_threshold && vx.abs() > self.velocity_threshold;
        trace!(dx, dy, vx, vy, recognized, "swipe classification");
        if !recognized {
            return None;
        }
        Some(SwipeDecision {
            direction: if dx > 0.0 { SwipeDirection::Right } else { SwipeDirection::Left },
            velocity: vx.abs() / self.normalization,
        })
    }
}
