//! Release velocity estimation.

use std::collections::VecDeque;

use glide_config::GestureConfig;
use tracing::trace;

use crate::touch::Point;

/// Samples kept regardless of the window.
const MAX_SAMPLES: usize = 20;

/// Estimates pointer velocity, in units per second, from recent samples.
///
/// Velocity is measured across the samples inside a trailing window ending
/// at the newest sample. When the window holds a single sample (a long pause
/// before release) the previous sample is used instead.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    window_ms: f64,
    samples: VecDeque<(f64, Point)>,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl VelocityTracker {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: if window_ms.is_finite() && window_ms > 0.0 { window_ms } else { 100.0 },
            samples: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.velocity_window_ms)
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Record a position. Samples older than the newest one are dropped.
    pub fn add(&mut self, timestamp_ms: f64, point: Point) {
        if let Some((last, _)) = self.samples.back() {
            if timestamp_ms < *last {
                trace!(timestamp_ms, last, "velocity sample out of order");
                return;
            }
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((timestamp_ms, point));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Current velocity estimate; zero with fewer than two samples.
    pub fn velocity(&self) -> Point {
        let Some(&(newest_t, newest)) = self.samples.back() else {
            return Point::ZERO;
        };
        let in_window = self
            .samples
            .iter()
            .position(|(t, _)| newest_t - t <= self.window_ms)
            .unwrap_or(self.samples.len() - 1);
        let oldest = if in_window + 1 >= self.samples.len() {
            match self.samples.len().checked_sub(2) {
                Some(index) => index,
                None => return Point::ZERO,
            }
        } else {
            in_window
        };

        let (oldest_t, oldest_point) = self.samples[oldest];
        let dt = newest_t - oldest_t;
        if dt <= 0.0 {
            return Point::ZERO;
        }
        let delta = newest - oldest_point;
        Point::new(delta.x / dt * 1000.0, delta.y / dt * 1000.0)
    }
}
