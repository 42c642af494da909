//! UWP pointer event translation. Coordinates are device-independent pixels.

use serde::{Deserialize, Serialize};

use crate::touch::{NativeAction, NativePointer, NativeTouchEvent, Point};

/// The `UIElement` pointer event that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UwpPointerKind {
    Pressed,
    Moved,
    Released,
    Canceled,
    CaptureLost,
    Entered,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UwpPointerEvent {
    pub kind: UwpPointerKind,
    /// `GetCurrentPoint(element).Position`.
    pub position: Point,
    /// `GetCurrentPoint(null).Position`.
    pub root_position: Point,
    /// `PointerPoint.Timestamp`, in microseconds.
    pub timestamp_us: u64,
}

impl UwpPointerEvent {
    pub fn new(kind: UwpPointerKind, position: Point, timestamp_us: u64) -> Self {
        Self {
            kind,
            position,
            root_position: position,
            timestamp_us,
        }
    }

    /// Translate to a native event. Losing pointer capture cancels the
    /// sequence.
    pub fn to_native(&self) -> NativeTouchEvent {
        let action = match self.kind {
            UwpPointerKind::Pressed => NativeAction::Down,
            UwpPointerKind::Moved => NativeAction::Move,
            UwpPointerKind::Released => NativeAction::Up,
            UwpPointerKind::Canceled | UwpPointerKind::CaptureLost => NativeAction::Cancel,
            UwpPointerKind::Entered => NativeAction::HoverEnter,
            UwpPointerKind::Exited => NativeAction::HoverExit,
        };
        NativeTouchEvent::new(
            action,
            NativePointer::new(self.position, self.root_position),
            self.timestamp_us as f64 / 1000.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let cases = [
            (UwpPointerKind::Pressed, NativeAction::Down),
            (UwpPointerKind::Moved, NativeAction::Move),
            (UwpPointerKind::Released, NativeAction::Up),
            (UwpPointerKind::Canceled, NativeAction::Cancel),
            (UwpPointerKind::CaptureLost, NativeAction::Cancel),
            (UwpPointerKind::Entered, NativeAction::HoverEnter),
            (UwpPointerKind::Exited, NativeAction::HoverExit),
        ];
        for (kind, expected) in cases {
            let native = UwpPointerEvent::new(kind, Point::new(1.0, 2.0), 16_000).to_native();
            assert_eq!(native.action, expected);
            assert_eq!(native.timestamp_ms, 16.0);
        }
    }
}
