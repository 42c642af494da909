//! Cancellable repeating timer driven by host time.
//!
//! Surfaces own one of these for periodic work (carousel auto-advance, tile
//! flips) and advance it from their update call. Stopping is synchronous:
//! a stopped timer never fires again until restarted.

use super::error::{MotionError, Result};

/// Upper bound on the count reported by one [`RepeatingTimer::advance`].
pub const MAX_FIRED: u32 = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingTimer {
    interval_ms: f64,
    elapsed_ms: f64,
    running: bool,
}

impl RepeatingTimer {
    /// Create a stopped timer.
    pub fn new(interval_ms: f64) -> Result<Self> {
        if !interval_ms.is_finite() || interval_ms <= 0.0 {
            return Err(MotionError::InvalidTick(interval_ms));
        }
        Ok(Self {
            interval_ms,
            elapsed_ms: 0.0,
            running: false,
        })
    }

    /// Start (or restart) counting a full interval from now.
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Advance by `delta_ms` and return how many intervals elapsed.
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if !self.running || !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += delta_ms;
        let intervals = (self.elapsed_ms / self.interval_ms).floor();
        if intervals < 1.0 {
            return 0;
        }
        self.elapsed_ms -= intervals * self.interval_ms;
        // float error can leave the remainder a hair outside [0, interval)
        self.elapsed_ms = self.elapsed_ms.clamp(0.0, self.interval_ms);
        intervals.min(MAX_FIRED as f64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_interval() {
        assert!(RepeatingTimer::new(0.0).is_err());
        assert!(RepeatingTimer::new(-5.0).is_err());
        assert!(RepeatingTimer::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_fires_per_interval() {
        let mut timer = RepeatingTimer::new(100.0).unwrap();
        assert_eq!(timer.advance(500.0), 0, "stopped timer must not fire");

        timer.start();
        assert_eq!(timer.advance(60.0), 0);
        assert_eq!(timer.advance(60.0), 1);
        assert_eq!(timer.advance(250.0), 2);
    }

    #[test]
    fn test_huge_delta_is_capped() {
        let mut timer = RepeatingTimer::new(1.0).unwrap();
        timer.start();
        assert_eq!(timer.advance(1e15), MAX_FIRED);
        assert_eq!(timer.advance(0.5), 0);
        assert_eq!(timer.advance(0.5), 1);
    }

    #[test]
    fn test_stop_is_synchronous() {
        let mut timer = RepeatingTimer::new(100.0).unwrap();
        timer.start();
        timer.advance(90.0);
        timer.stop();
        assert_eq!(timer.advance(1000.0), 0);

        timer.start();
        assert_eq!(timer.advance(90.0), 0, "restart counts a full interval");
        assert_eq!(timer.advance(10.0), 1);
    }
}
