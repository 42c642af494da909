//! Canonical touch model and the normalizer that produces it.
//!
//! Platform translators turn native events into [`NativeTouchEvent`]s in
//! physical pixels. [`TouchNormalizer`] divides every coordinate by the
//! device density and maps actions onto [`TouchKind`]. It also implements
//! "swipe suppresses tap": once a swipe has been recognized in the current
//! sequence, the native Up is delivered as `Cancelled` so the surface never
//! commits a drag that was already handled as a swipe.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use tracing::trace;

/// A point in density-independent units (or physical pixels, before
/// normalization).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Divide both coordinates by `density`.
    pub fn to_dips(self, density: f64) -> Self {
        Self::new(self.x / density, self.y / density)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Kind of a canonical touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchKind {
    Entered,
    Pressed,
    Move,
    Released,
    Exited,
    Cancelled,
}

impl TouchKind {
    /// Released or Cancelled.
    pub fn ends_sequence(&self) -> bool {
        matches!(self, Self::Released | Self::Cancelled)
    }
}

/// One canonical touch event, produced per native callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub kind: TouchKind,
    /// Position relative to the surface.
    pub local_point: Point,
    /// Position relative to the application window.
    pub application_point: Point,
    pub is_pressed: bool,
    /// Host timestamp, only used for velocity estimation.
    pub timestamp_ms: f64,
}

impl TouchEvent {
    /// Event whose local and application points coincide.
    pub fn new(kind: TouchKind, point: Point, timestamp_ms: f64) -> Self {
        Self {
            kind,
            local_point: point,
            application_point: point,
            is_pressed: matches!(kind, TouchKind::Pressed | TouchKind::Move),
            timestamp_ms,
        }
    }
}

/// Platform-neutral native action, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeAction {
    Down,
    Move,
    Up,
    Cancel,
    Outside,
    HoverEnter,
    HoverExit,
}

/// Pointer coordinates in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativePointer {
    pub local: Point,
    pub application: Point,
}

impl NativePointer {
    pub fn new(local: Point, application: Point) -> Self {
        Self { local, application }
    }

    /// Pointer whose surface sits at the window origin.
    pub fn at(x: f64, y: f64) -> Self {
        let point = Point::new(x, y);
        Self::new(point, point)
    }
}

/// A native event as handed over by a platform translator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativeTouchEvent {
    pub action: NativeAction,
    /// `None` when the platform delivered no pointer data.
    pub pointer: Option<NativePointer>,
    pub timestamp_ms: f64,
}

impl NativeTouchEvent {
    pub fn new(action: NativeAction, pointer: NativePointer, timestamp_ms: f64) -> Self {
        Self {
            action,
            pointer: Some(pointer),
            timestamp_ms,
        }
    }
}

/// Density actually applied: non-positive or non-finite densities are
/// treated as 1.
pub fn effective_density(density: f64) -> f64 {
    if density.is_finite() && density > 0.0 { density } else { 1.0 }
}

/// Converts native events into canonical [`TouchEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct TouchNormalizer {
    pressed: bool,
    swipe_recognized: bool,
}

impl TouchNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the current sequence was recognized as a swipe; its Up
    /// will be delivered as `Cancelled`.
    pub fn mark_swipe_recognized(&mut self) {
        self.swipe_recognized = true;
    }

    pub fn swipe_recognized(&self) -> bool {
        self.swipe_recognized
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Normalize one native event. Returns `None` when the native event
    /// carries no pointer.
    pub fn on_native_touch(&mut self, native: &NativeTouchEvent, density: f64) -> Option<TouchEvent> {
        let Some(pointer) = native.pointer else {
            trace!(action = ?native.action, "native event without pointer");
            return None;
        };
        let density = effective_density(density);

        let kind = match native.action {
            NativeAction::Down => {
                self.pressed = true;
                self.swipe_recognized = false;
                TouchKind::Pressed
            }
            NativeAction::Move => TouchKind::Move,
            NativeAction::Up => {
                let kind = if self.swipe_recognized {
                    TouchKind::Cancelled
                } else {
                    TouchKind::Released
                };
                self.pressed = false;
                self.swipe_recognized = false;
                kind
            }
            NativeAction::Cancel | NativeAction::Outside => {
                self.pressed = false;
                self.swipe_recognized = false;
                TouchKind::Cancelled
            }
            NativeAction::HoverEnter => TouchKind::Entered,
            NativeAction::HoverExit => TouchKind::Exited,
        };

        Some(TouchEvent {
            kind,
            local_point: pointer.local.to_dips(density),
            application_point: pointer.application.to_dips(density),
            is_pressed: self.pressed,
            timestamp_ms: native.timestamp_ms,
        })
    }
}
