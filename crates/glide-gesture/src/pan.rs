//! Interactive pan controller.
//!
//! One controller per surface. It turns canonical touch events into pan
//! updates carrying the total delta since the gesture started:
//!
//! ```text
//! Idle ──Pressed (lock granted)──▶ Started ──claimed Move──▶ Running
//!   ▲                                                     │
//!   │                    Released ──▶ Completing ─────────┤
//!   └──────────────────  Cancelled ─▶ Cancelled ──────────┘
//! ```
//!
//! A move is claimed while the horizontal travel since the press exceeds
//! the vertical travel. Unclaimed moves are left to ancestors (vertical
//! scrolling) and emit nothing.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::arbiter::{GestureArbiter, SurfaceId};
use crate::swipe::SwipeDirection;
use crate::touch::{Point, TouchEvent, TouchKind};

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanState {
    #[default]
    Idle,
    Started,
    Running,
    Completing,
    Cancelled,
}

/// Status reported to the surface with each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanStatus {
    Started,
    Running,
    Completed,
    Canceled,
}

/// One pan update: status plus total delta since the gesture started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanUpdate {
    pub status: PanStatus,
    pub gesture_id: u64,
    pub total_x: f64,
    pub total_y: f64,
}

/// Outbound contract of a gesture-handling surface.
pub trait PanHost {
    fn on_pan_updated(&mut self, update: PanUpdate);

    fn on_swiped(&mut self, _direction: SwipeDirection, _velocity: f64) {}

    /// Ask ancestors (scroll views, pagers) not to intercept the rest of
    /// the sequence.
    fn request_disallow_ancestor_intercept(&mut self, _disallow: bool) {}
}

fn next_gesture_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy)]
struct GestureSession {
    start: Point,
    previous: Point,
    total: Point,
    /// Allocated on the first claimed move.
    gesture_id: Option<u64>,
    disallowed_intercept: bool,
}

impl GestureSession {
    fn new(start: Point) -> Self {
        Self {
            start,
            previous: start,
            total: Point::ZERO,
            gesture_id: None,
            disallowed_intercept: false,
        }
    }
}

#[derive(Debug)]
pub struct PanController {
    surface: SurfaceId,
    arbiter: Rc<GestureArbiter>,
    enabled: bool,
    state: PanState,
    session: Option<GestureSession>,
}

impl PanController {
    pub fn new(arbiter: Rc<GestureArbiter>) -> Self {
        Self::with_surface(SurfaceId::new(), arbiter)
    }

    pub fn with_surface(surface: SurfaceId, arbiter: Rc<GestureArbiter>) -> Self {
        Self {
            surface,
            arbiter,
            enabled: true,
            state: PanState::Idle,
            session: None,
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn arbiter(&self) -> &Rc<GestureArbiter> {
        &self.arbiter
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling takes effect on the next press.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True between a granted press and the end of its sequence.
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Gesture id of the current session, once a move has been claimed.
    pub fn gesture_id(&self) -> Option<u64> {
        self.session.and_then(|s| s.gesture_id)
    }

    /// Delta from the press position to `point`, while tracking.
    pub fn delta_to(&self, point: Point) -> Option<Point> {
        self.session.map(|s| point - s.start)
    }

    /// Feed one canonical event. Returns whether the surface handled it.
    pub fn handle<H: PanHost + ?Sized>(&mut self, event: &TouchEvent, host: &mut H) -> bool {
        match event.kind {
            TouchKind::Pressed => self.on_pressed(event.local_point, host),
            TouchKind::Move => self.on_move(event.local_point, host),
            TouchKind::Released => self.on_end(event.local_point, PanStatus::Completed, host),
            TouchKind::Cancelled => self.on_end(event.local_point, PanStatus::Canceled, host),
            TouchKind::Entered | TouchKind::Exited => false,
        }
    }

    fn on_pressed<H: PanHost + ?Sized>(&mut self, point: Point, host: &mut H) -> bool {
        if self.session.is_some() {
            // press without a matching release: drop the stale sequence
            debug!(surface = self.surface.0, "press while tracking, resetting");
            self.reset(host);
        }
        if !self.enabled {
            return false;
        }
        if !self.arbiter.try_claim(self.surface) {
            return false;
        }
        self.session = Some(GestureSession::new(point));
        self.state = PanState::Started;
        trace!(surface = self.surface.0, x = point.x, y = point.y, "pan started");
        true
    }

    fn on_move<H: PanHost + ?Sized>(&mut self, point: Point, host: &mut H) -> bool {
        let Some(session) = self.session.as_mut() else {
            trace!(surface = self.surface.0, "move without press ignored");
            return false;
        };
        if !self.arbiter.is_held_by(self.surface) {
            return false;
        }

        let step = point - session.previous;
        session.previous = point;
        session.total = point - session.start;
        trace!(surface = self.surface.0, step_x = step.x, step_y = step.y, "pan move");
        let total = session.total;
        if total.x.abs() <= total.y.abs() {
            return false;
        }

        let gesture_id = match session.gesture_id {
            Some(id) => id,
            None => {
                let id = next_gesture_id();
                session.gesture_id = Some(id);
                host.on_pan_updated(PanUpdate {
                    status: PanStatus::Started,
                    gesture_id: id,
                    total_x: total.x,
                    total_y: total.y,
                });
                id
            }
        };
        if !session.disallowed_intercept {
            session.disallowed_intercept = true;
            host.request_disallow_ancestor_intercept(true);
        }

        self.state = PanState::Running;
        host.on_pan_updated(PanUpdate {
            status: PanStatus::Running,
            gesture_id,
            total_x: total.x,
            total_y: total.y,
        });
        true
    }

    fn on_end<H: PanHost + ?Sized>(&mut self, point: Point, status: PanStatus, host: &mut H) -> bool {
        let Some(session) = self.session else {
            trace!(surface = self.surface.0, ?status, "end without press ignored");
            return false;
        };
        let handled = match session.gesture_id {
            Some(gesture_id) => {
                let total = point - session.start;
                self.state = match status {
                    PanStatus::Canceled => PanState::Cancelled,
                    _ => PanState::Completing,
                };
                debug!(surface = self.surface.0, gesture_id, ?status, total_x = total.x, "pan ended");
                host.on_pan_updated(PanUpdate {
                    status,
                    gesture_id,
                    total_x: total.x,
                    total_y: total.y,
                });
                true
            }
            None => false,
        };
        self.reset(host);
        handled
    }

    fn reset<H: PanHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(session) = self.session.take() {
            if session.disallowed_intercept {
                host.request_disallow_ancestor_intercept(false);
            }
        }
        self.arbiter.release(self.surface);
        self.state = PanState::Idle;
    }

    /// Drop any session and release the lock. Used when the surface leaves
    /// the tree; an ancestor intercept block taken by the session is lifted.
    pub fn detach<H: PanHost + ?Sized>(&mut self, host: &mut H) {
        if self.session.is_some() {
            debug!(surface = self.surface.0, "detached while tracking");
        }
        self.reset(host);
    }
}

impl Drop for PanController {
    fn drop(&mut self) {
        self.arbiter.release(self.surface);
    }
}
