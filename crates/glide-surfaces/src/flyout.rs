//! Slide-in flyout menu with a dimming overlay.
//!
//! The menu's revealed width (the offset) follows a horizontal drag 1:1.
//! On release it snaps open when at least `snap_ratio` of the menu is
//! revealed and closed otherwise, animating from wherever the finger left
//! it. A fling overrides the position: right opens, left closes.

use std::cell::Cell;
use std::rc::Rc;

use glide_config::{FlyoutConfig, GlideConfig};
use glide_gesture::{
    GestureArbiter, NativeTouchEvent, PanHost, PanStatus, PanUpdate, SurfaceGestures, SurfaceId, SwipeDirection,
};
use glide_motion::{
    AbortMode, Animation, AnimationGroup, EasingFunction, InteractiveDrive, MotionError, Result, SharedVisual,
    TimedOptions, TimelineEvent, TimelineHost, Visual, VisualElement, VisualProperty, animate_property,
};
use tracing::{debug, warn};

const SNAP_KEY: &str = "flyout.snap";

/// Flyout menu surface.
pub struct FlyoutMenu<V: Visual + 'static = VisualElement> {
    gestures: SurfaceGestures,
    state: FlyoutState<V>,
}

struct FlyoutState<V: Visual + 'static> {
    menu: SharedVisual<V>,
    overlay: SharedVisual<V>,
    config: FlyoutConfig,
    easing: EasingFunction,
    snap: TimedOptions,
    offset: Rc<Cell<f64>>,
    open: bool,
    drag: Option<InteractiveDrive>,
    drag_origin: f64,
    swiped: bool,
    timelines: TimelineHost,
}

impl<V: Visual + 'static> FlyoutMenu<V> {
    /// Build a closed menu. `menu` is translated horizontally, `overlay`
    /// fades in as the menu opens.
    pub fn new(
        menu: SharedVisual<V>,
        overlay: SharedVisual<V>,
        arbiter: Rc<GestureArbiter>,
        config: &GlideConfig,
    ) -> Result<Self> {
        let flyout = config.flyout.clone();
        if !flyout.menu_width.is_finite() || flyout.menu_width <= 0.0 {
            return Err(MotionError::InvalidReference(flyout.menu_width));
        }
        let snap = TimedOptions::new(flyout.snap_duration_ms).tick_ms(config.timeline.tick_ms);
        snap.validate()?;
        let easing: EasingFunction = config.timeline.easing.parse()?;

        let state = FlyoutState {
            menu,
            overlay,
            config: flyout,
            easing,
            snap,
            offset: Rc::new(Cell::new(0.0)),
            open: false,
            drag: None,
            drag_origin: 0.0,
            swiped: false,
            timelines: TimelineHost::new(),
        };
        state.apply_offset(0.0);

        Ok(Self {
            gestures: SurfaceGestures::new(arbiter, &config.gesture),
            state,
        })
    }

    pub fn surface(&self) -> SurfaceId {
        self.gestures.surface()
    }

    /// Feed one native event.
    pub fn on_native_touch(&mut self, native: &NativeTouchEvent, density: f64) -> bool {
        self.gestures.on_native_touch(native, density, &mut self.state)
    }

    /// Advance snap animations.
    pub fn update(&mut self, delta_ms: f64) {
        self.state.timelines.update(delta_ms);
    }

    pub fn open(&mut self) {
        self.state.settle(true);
    }

    pub fn close(&mut self) {
        self.state.settle(false);
    }

    pub fn toggle(&mut self) {
        let open = !self.state.open;
        self.state.settle(open);
    }

    /// Target state: true once an open has been committed, even while the
    /// snap animation is still running.
    pub fn is_open(&self) -> bool {
        self.state.open
    }

    /// Revealed width of the menu.
    pub fn offset(&self) -> f64 {
        self.state.offset.get()
    }

    pub fn revealed_fraction(&self) -> f64 {
        self.state.offset.get() / self.state.config.menu_width
    }

    pub fn is_animating(&self) -> bool {
        self.state.timelines.is_running(SNAP_KEY)
    }

    pub fn is_dragging(&self) -> bool {
        self.state.drag.is_some()
    }

    pub fn set_gestures_enabled(&mut self, enabled: bool) {
        self.gestures.set_enabled(enabled);
    }

    /// Back button: closes an open menu and consumes the press.
    pub fn on_back_pressed(&mut self) -> bool {
        if !self.state.open {
            return false;
        }
        debug!("back pressed, closing flyout");
        self.state.settle(false);
        true
    }

    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        self.state.timelines.drain_events().collect()
    }

    /// Stop animations and give up the gesture lock. The menu keeps its
    /// current position.
    pub fn detach(&mut self) {
        self.state.timelines.abort_all(AbortMode::Discard);
        self.state.drag = None;
        self.gestures.detach(&mut self.state);
    }
}

impl<V: Visual + 'static> FlyoutState<V> {
    fn width(&self) -> f64 {
        self.config.menu_width
    }

    /// Menu translation, overlay opacity and the offset cell, all driven by
    /// one progress value.
    fn offset_timeline(&self, from: f64, to: f64, easing: EasingFunction) -> AnimationGroup {
        let width = self.width();
        let dim = self.config.overlay_opacity / width;
        let offset = Rc::clone(&self.offset);
        AnimationGroup::new()
            .with_full(animate_property(&self.menu, VisualProperty::TranslationX, from - width, to - width, easing))
            .with_full(animate_property(&self.overlay, VisualProperty::Opacity, from * dim, to * dim, easing))
            .with_full(Animation::new(from, to, easing, move |v| offset.set(v)))
    }

    fn apply_offset(&self, offset: f64) {
        let width = self.width();
        self.menu.borrow_mut().set_property(VisualProperty::TranslationX, offset - width);
        self.overlay
            .borrow_mut()
            .set_property(VisualProperty::Opacity, offset * self.config.overlay_opacity / width);
        self.offset.set(offset);
    }

    /// Commit to open or closed and animate there from the live offset.
    fn settle(&mut self, open: bool) {
        self.drag = None;
        self.open = open;
        let from = self.offset.get();
        let to = if open { self.width() } else { 0.0 };
        debug!(open, from, to, "flyout settling");
        let timeline = self.offset_timeline(from, to, self.easing);
        if let Err(e) = self.timelines.start_timed(SNAP_KEY, timeline, self.snap) {
            warn!(error = %e, "flyout snap rejected, jumping to target");
            self.apply_offset(to);
        }
    }
}

impl<V: Visual + 'static> PanHost for FlyoutState<V> {
    fn on_pan_updated(&mut self, update: PanUpdate) {
        match update.status {
            PanStatus::Started => {
                self.timelines.abort(SNAP_KEY, AbortMode::Discard);
                self.swiped = false;
                self.drag_origin = self.offset.get();
                let timeline = self.offset_timeline(0.0, self.width(), EasingFunction::Linear);
                self.drag = InteractiveDrive::new(timeline, self.width()).ok();
            }
            PanStatus::Running => {
                let target = self.drag_origin + update.total_x;
                if let Some(drag) = self.drag.as_mut() {
                    drag.drive(target);
                }
            }
            PanStatus::Completed => {
                let revealed = self.offset.get() / self.width();
                self.settle(revealed >= self.config.snap_ratio);
            }
            PanStatus::Canceled => {
                if !self.swiped {
                    let open = self.open;
                    self.settle(open);
                }
            }
        }
    }

    fn on_swiped(&mut self, direction: SwipeDirection, velocity: f64) {
        debug!(?direction, velocity, "flyout swiped");
        self.swiped = true;
        self.settle(direction == SwipeDirection::Right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_gesture::{NativeAction, NativePointer};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    struct Fixture {
        flyout: FlyoutMenu,
        menu: SharedVisual<VisualElement>,
        overlay: SharedVisual<VisualElement>,
        arbiter: Rc<GestureArbiter>,
    }

    fn fixture() -> Fixture {
        let menu = VisualElement::new().shared();
        let overlay = VisualElement::new().shared();
        let arbiter = Rc::new(GestureArbiter::new());
        let flyout = FlyoutMenu::new(menu.clone(), overlay.clone(), arbiter.clone(), &GlideConfig::default()).unwrap();
        Fixture {
            flyout,
            menu,
            overlay,
            arbiter,
        }
    }

    fn touch(flyout: &mut FlyoutMenu, action: NativeAction, x: f64, t: f64) -> bool {
        flyout.on_native_touch(&NativeTouchEvent::new(action, NativePointer::at(x, 300.0), t), 1.0)
    }

    /// Slow drag from `from` by `dx`, released without a fling.
    fn slow_drag(flyout: &mut FlyoutMenu, from: f64, dx: f64) {
        touch(flyout, NativeAction::Down, from, 0.0);
        for i in 1..=10 {
            touch(flyout, NativeAction::Move, from + dx * i as f64 / 10.0, i as f64 * 50.0);
        }
        touch(flyout, NativeAction::Up, from + dx, 700.0);
    }

    #[test]
    fn test_starts_closed() {
        let f = fixture();
        assert!(!f.flyout.is_open());
        assert_eq!(f.menu.borrow().translation_x, -280.0);
        assert_eq!(f.overlay.borrow().opacity, 0.0);
    }

    #[test]
    fn test_drag_follows_finger() {
        let mut f = fixture();
        touch(&mut f.flyout, NativeAction::Down, 10.0, 0.0);
        assert!(touch(&mut f.flyout, NativeAction::Move, 80.0, 200.0));
        assert!(f.flyout.is_dragging());
        assert!(approx_eq(f.flyout.offset(), 70.0));
        assert!(approx_eq(f.menu.borrow().translation_x, -210.0));
        assert!(approx_eq(f.overlay.borrow().opacity, 0.125));

        // clamped to the menu width
        touch(&mut f.flyout, NativeAction::Move, 900.0, 400.0);
        assert!(approx_eq(f.flyout.offset(), 280.0));
    }

    #[test]
    fn test_release_past_ratio_opens() {
        let mut f = fixture();
        slow_drag(&mut f.flyout, 0.0, 180.0);
        assert!(f.flyout.is_open());
        assert!(f.flyout.is_animating());
        assert!(approx_eq(f.flyout.offset(), 180.0), "snap starts from the live offset");

        f.flyout.update(400.0);
        assert!(!f.flyout.is_animating());
        assert!(approx_eq(f.flyout.offset(), 280.0));
        assert!(approx_eq(f.menu.borrow().translation_x, 0.0));
        assert!(f.flyout.drain_events().iter().any(|e| e.is_finished()));
    }

    #[test]
    fn test_release_short_of_ratio_closes() {
        let mut f = fixture();
        slow_drag(&mut f.flyout, 0.0, 100.0);
        assert!(!f.flyout.is_open());
        f.flyout.update(400.0);
        assert!(approx_eq(f.flyout.offset(), 0.0));
    }

    #[test]
    fn test_drag_closes_open_menu() {
        let mut f = fixture();
        f.flyout.open();
        f.flyout.update(400.0);
        slow_drag(&mut f.flyout, 270.0, -200.0);
        assert!(!f.flyout.is_open());
    }

    #[test]
    fn test_swipe_right_opens_even_when_short() {
        let mut f = fixture();
        touch(&mut f.flyout, NativeAction::Down, 0.0, 0.0);
        touch(&mut f.flyout, NativeAction::Move, 30.0, 16.0);
        touch(&mut f.flyout, NativeAction::Move, 60.0, 32.0);
        touch(&mut f.flyout, NativeAction::Up, 90.0, 48.0);

        assert!(f.flyout.is_open());
        f.flyout.update(400.0);
        assert!(approx_eq(f.flyout.offset(), 280.0));
        assert!(f.arbiter.is_free());
    }

    #[test]
    fn test_swipe_left_closes() {
        let mut f = fixture();
        f.flyout.open();
        f.flyout.update(400.0);

        touch(&mut f.flyout, NativeAction::Down, 260.0, 1000.0);
        touch(&mut f.flyout, NativeAction::Move, 230.0, 1016.0);
        touch(&mut f.flyout, NativeAction::Up, 180.0, 1032.0);
        assert!(!f.flyout.is_open());
    }

    #[test]
    fn test_platform_cancel_restores_state() {
        let mut f = fixture();
        touch(&mut f.flyout, NativeAction::Down, 0.0, 0.0);
        touch(&mut f.flyout, NativeAction::Move, 200.0, 500.0);
        touch(&mut f.flyout, NativeAction::Cancel, 200.0, 600.0);
        assert!(!f.flyout.is_open());
        f.flyout.update(400.0);
        assert!(approx_eq(f.flyout.offset(), 0.0));
    }

    #[test]
    fn test_back_pressed() {
        let mut f = fixture();
        assert!(!f.flyout.on_back_pressed());
        f.flyout.open();
        assert!(f.flyout.on_back_pressed());
        assert!(!f.flyout.is_open());
    }

    #[test]
    fn test_press_during_snap_continues_from_live_offset() {
        let mut f = fixture();
        f.flyout.open();
        f.flyout.update(64.0);
        let live = f.flyout.offset();
        assert!(live > 0.0 && live < 280.0);

        touch(&mut f.flyout, NativeAction::Down, 100.0, 0.0);
        touch(&mut f.flyout, NativeAction::Move, 110.0, 300.0);
        assert!(!f.flyout.is_animating());
        assert!(approx_eq(f.flyout.offset(), live + 10.0));
    }

    #[test]
    fn test_detach_releases_lock_and_stops() {
        let mut f = fixture();
        touch(&mut f.flyout, NativeAction::Down, 0.0, 0.0);
        f.flyout.open();
        f.flyout.detach();
        assert!(f.arbiter.is_free());
        assert!(!f.flyout.is_animating());
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut config = GlideConfig::default();
        config.timeline.easing = "wobble".to_string();
        let menu = VisualElement::new().shared();
        let overlay = VisualElement::new().shared();
        let result = FlyoutMenu::new(menu, overlay, Rc::new(GestureArbiter::new()), &config);
        assert!(matches!(result, Err(MotionError::InvalidEasing(_))));
    }
}
