//! Per-surface gesture pipeline: native event in, pan updates and swipes out.

use std::rc::Rc;

use glide_config::GestureConfig;
use tracing::debug;

use crate::arbiter::{GestureArbiter, SurfaceId};
use crate::pan::{PanController, PanHost, PanState};
use crate::swipe::{SwipeDecision, SwipeRecognizer};
use crate::touch::{NativeAction, NativeTouchEvent, TouchKind, TouchNormalizer, effective_density};
use crate::velocity::VelocityTracker;

/// Normalizer, velocity tracker, swipe recognizer and pan controller for
/// one surface.
///
/// On the native Up of a tracked sequence the swipe is classified before the
/// event is normalized: a recognized swipe is reported through
/// [`PanHost::on_swiped`] and the Up is delivered as Cancelled, so the
/// surface sees `Canceled` instead of a `Completed` drag.
#[derive(Debug)]
pub struct SurfaceGestures {
    normalizer: TouchNormalizer,
    velocity: VelocityTracker,
    recognizer: SwipeRecognizer,
    pan: PanController,
}

impl SurfaceGestures {
    pub fn new(arbiter: Rc<GestureArbiter>, config: &GestureConfig) -> Self {
        Self {
            normalizer: TouchNormalizer::new(),
            velocity: VelocityTracker::from_config(config),
            recognizer: SwipeRecognizer::from_config(config),
            pan: PanController::new(arbiter),
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.pan.surface()
    }

    pub fn pan(&self) -> &PanController {
        &self.pan
    }

    pub fn pan_state(&self) -> PanState {
        self.pan.state()
    }

    pub fn recognizer(&self) -> &SwipeRecognizer {
        &self.recognizer
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.pan.set_enabled(enabled);
    }

    /// Feed one native event. Returns whether the surface handled it.
    pub fn on_native_touch<H: PanHost + ?Sized>(
        &mut self,
        native: &NativeTouchEvent,
        density: f64,
        host: &mut H,
    ) -> bool {
        if native.action == NativeAction::Up {
            if let Some(decision) = self.classify_release(native, density) {
                debug!(
                    surface = self.surface().0,
                    direction = ?decision.direction,
                    velocity = decision.velocity,
                    "swipe recognized"
                );
                host.on_swiped(decision.direction, decision.velocity);
                self.normalizer.mark_swipe_recognized();
            }
        }

        let Some(event) = self.normalizer.on_native_touch(native, density) else {
            return false;
        };
        match event.kind {
            TouchKind::Pressed => {
                self.velocity.reset();
                self.velocity.add(event.timestamp_ms, event.local_point);
            }
            TouchKind::Move => self.velocity.add(event.timestamp_ms, event.local_point),
            _ => {}
        }
        self.pan.handle(&event, host)
    }

    fn classify_release(&mut self, native: &NativeTouchEvent, density: f64) -> Option<SwipeDecision> {
        if !self.pan.is_tracking() || !self.pan.arbiter().is_held_by(self.pan.surface()) {
            return None;
        }
        let point = native.pointer?.local.to_dips(effective_density(density));
        let total = self.pan.delta_to(point)?;
        self.velocity.add(native.timestamp_ms, point);
        let velocity = self.velocity.velocity();
        self.recognizer.classify(total.x, total.y, velocity.x, velocity.y)
    }

    /// Drop the current sequence and release the lock.
    pub fn detach<H: PanHost + ?Sized>(&mut self, host: &mut H) {
        self.pan.detach(host);
        self.normalizer.reset();
        self.velocity.reset();
    }
}
