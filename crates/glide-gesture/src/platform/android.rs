//! Android `MotionEvent` translation.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::touch::{NativeAction, NativePointer, NativeTouchEvent, Point};

pub const ACTION_MASK: i32 = 0xff;
pub const ACTION_DOWN: i32 = 0;
pub const ACTION_UP: i32 = 1;
pub const ACTION_MOVE: i32 = 2;
pub const ACTION_CANCEL: i32 = 3;
pub const ACTION_OUTSIDE: i32 = 4;
pub const ACTION_POINTER_DOWN: i32 = 5;
pub const ACTION_POINTER_UP: i32 = 6;
pub const ACTION_HOVER_MOVE: i32 = 7;
pub const ACTION_HOVER_ENTER: i32 = 9;
pub const ACTION_HOVER_EXIT: i32 = 10;

/// Fields of an Android `MotionEvent` for the primary pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AndroidMotionEvent {
    /// Raw `getAction()` value; the pointer index bits are masked off.
    pub action: i32,
    /// `getX()`/`getY()`, relative to the view.
    pub x: f64,
    pub y: f64,
    /// `getRawX()`/`getRawY()`, relative to the screen.
    pub raw_x: f64,
    pub raw_y: f64,
    pub event_time_ms: f64,
}

impl AndroidMotionEvent {
    pub fn new(action: i32, x: f64, y: f64, event_time_ms: f64) -> Self {
        Self {
            action,
            x,
            y,
            raw_x: x,
            raw_y: y,
            event_time_ms,
        }
    }

    pub fn masked_action(&self) -> i32 {
        self.action & ACTION_MASK
    }

    /// Translate to a native event. Secondary pointers going down or up do
    /// not start or end a sequence and produce nothing, as do actions
    /// outside the touch model.
    pub fn to_native(&self) -> Option<NativeTouchEvent> {
        let action = match self.masked_action() {
            ACTION_DOWN => NativeAction::Down,
            ACTION_UP => NativeAction::Up,
            ACTION_MOVE => NativeAction::Move,
            ACTION_CANCEL => NativeAction::Cancel,
            ACTION_OUTSIDE => NativeAction::Outside,
            ACTION_HOVER_ENTER => NativeAction::HoverEnter,
            ACTION_HOVER_EXIT => NativeAction::HoverExit,
            other => {
                trace!(action = other, "android action not translated");
                return None;
            }
        };
        let pointer = NativePointer::new(Point::new(self.x, self.y), Point::new(self.raw_x, self.raw_y));
        Some(NativeTouchEvent::new(action, pointer, self.event_time_ms))
    }
}
