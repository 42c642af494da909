//! iOS `UITouch` translation. Coordinates are already in points.

use serde::{Deserialize, Serialize};

use crate::touch::{NativeAction, NativePointer, NativeTouchEvent, Point};

/// Density to normalize iOS events with.
pub const POINT_DENSITY: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IosTouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Cancelled,
}

/// Fields of a `UITouch` delivered to `touchesBegan`/`Moved`/`Ended`/`Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IosTouch {
    pub phase: IosTouchPhase,
    /// `locationInView(view)`.
    pub location: Point,
    /// `locationInView(nil)`.
    pub window_location: Point,
    /// `UITouch.timestamp`, in seconds.
    pub timestamp_s: f64,
}

impl IosTouch {
    pub fn new(phase: IosTouchPhase, location: Point, timestamp_s: f64) -> Self {
        Self {
            phase,
            location,
            window_location: location,
            timestamp_s,
        }
    }

    /// Translate to a native event. A stationary touch produces nothing.
    pub fn to_native(&self) -> Option<NativeTouchEvent> {
        let action = match self.phase {
            IosTouchPhase::Began => NativeAction::Down,
            IosTouchPhase::Moved => NativeAction::Move,
            IosTouchPhase::Stationary => return None,
            IosTouchPhase::Ended => NativeAction::Up,
            IosTouchPhase::Cancelled => NativeAction::Cancel,
        };
        Some(NativeTouchEvent::new(
            action,
            NativePointer::new(self.location, self.window_location),
            self.timestamp_s * 1000.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mapping() {
        let at = Point::new(12.0, 34.0);
        let cases = [
            (IosTouchPhase::Began, Some(NativeAction::Down)),
            (IosTouchPhase::Moved, Some(NativeAction::Move)),
            (IosTouchPhase::Stationary, None),
            (IosTouchPhase::Ended, Some(NativeAction::Up)),
            (IosTouchPhase::Cancelled, Some(NativeAction::Cancel)),
        ];
        for (phase, expected) in cases {
            let native = IosTouch::new(phase, at, 0.0).to_native();
            assert_eq!(native.map(|n| n.action), expected);
        }
    }

    #[test]
    fn test_timestamp_in_ms() {
        let native = IosTouch::new(IosTouchPhase::Moved, Point::ZERO, 1.25).to_native().unwrap();
        assert_eq!(native.timestamp_ms, 1250.0);
    }
}
