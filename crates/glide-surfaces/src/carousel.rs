//! Paged carousel with drag, fling and optional auto-advance.
//!
//! Items sit side by side on a strip; the strip is translated by
//! `-index * page_width`. A drag moves the strip 1:1. On release the page
//! changes when the drag covered at least `snap_ratio` of a page, otherwise
//! it snaps back. Flinging left shows the next item, right the previous one.

use std::cell::Cell;
use std::rc::Rc;

use glide_config::{CarouselConfig, GlideConfig};
use glide_gesture::{
    GestureArbiter, NativeTouchEvent, PanHost, PanStatus, PanUpdate, SurfaceGestures, SurfaceId, SwipeDirection,
};
use glide_motion::{
    AbortMode, Animation, EasingFunction, MotionError, RepeatingTimer, Result, SharedVisual, TimedOptions,
    TimelineEvent, TimelineHost, Visual, VisualElement, VisualProperty,
};
use tracing::{debug, warn};

const PAGE_KEY: &str = "carousel.page";

pub struct CarouselLayout<V: Visual + 'static = VisualElement> {
    gestures: SurfaceGestures,
    state: CarouselState<V>,
}

struct CarouselState<V: Visual + 'static> {
    strip: SharedVisual<V>,
    config: CarouselConfig,
    item_count: usize,
    page_width: f64,
    index: usize,
    easing: EasingFunction,
    page: TimedOptions,
    offset: Rc<Cell<f64>>,
    drag_origin: Option<f64>,
    swiped: bool,
    timelines: TimelineHost,
    auto_advance: Option<RepeatingTimer>,
    visible: bool,
}

impl<V: Visual + 'static> CarouselLayout<V> {
    /// Build a carousel showing item 0. Auto-advance starts immediately
    /// when configured.
    pub fn new(
        strip: SharedVisual<V>,
        item_count: usize,
        page_width: f64,
        arbiter: Rc<GestureArbiter>,
        config: &GlideConfig,
    ) -> Result<Self> {
        if !page_width.is_finite() || page_width <= 0.0 {
            return Err(MotionError::InvalidReference(page_width));
        }
        let page = TimedOptions::new(config.carousel.page_duration_ms).tick_ms(config.timeline.tick_ms);
        page.validate()?;
        let easing: EasingFunction = config.timeline.easing.parse()?;
        let auto_advance = config.carousel.auto_advance_ms.map(RepeatingTimer::new).transpose()?;

        let mut state = CarouselState {
            strip,
            config: config.carousel.clone(),
            item_count,
            page_width,
            index: 0,
            easing,
            page,
            offset: Rc::new(Cell::new(0.0)),
            drag_origin: None,
            swiped: false,
            timelines: TimelineHost::new(),
            auto_advance,
            visible: true,
        };
        state.apply_offset(0.0);
        state.restart_timer();

        Ok(Self {
            gestures: SurfaceGestures::new(arbiter, &config.gesture),
            state,
        })
    }

    pub fn surface(&self) -> SurfaceId {
        self.gestures.surface()
    }

    pub fn on_native_touch(&mut self, native: &NativeTouchEvent, density: f64) -> bool {
        self.gestures.on_native_touch(native, density, &mut self.state)
    }

    /// Advance paging animations and the auto-advance timer.
    pub fn update(&mut self, delta_ms: f64) {
        self.state.timelines.update(delta_ms);
        let fired = match self.state.auto_advance.as_mut() {
            Some(timer) => timer.advance(delta_ms),
            None => 0,
        };
        if fired > 0 && self.state.drag_origin.is_none() {
            debug!(fired, "carousel auto-advance");
            for _ in 0..fired {
                self.state.step(1);
            }
        }
    }

    pub fn current_index(&self) -> usize {
        self.state.index
    }

    pub fn item_count(&self) -> usize {
        self.state.item_count
    }

    /// Strip translation.
    pub fn offset(&self) -> f64 {
        self.state.offset.get()
    }

    pub fn is_animating(&self) -> bool {
        self.state.timelines.is_running(PAGE_KEY)
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.state.auto_advance.as_ref().is_some_and(RepeatingTimer::is_running)
    }

    /// Show the next item. Returns false at the end without wrap.
    pub fn next(&mut self) -> bool {
        self.state.step(1)
    }

    /// Show the previous item. Returns false at the start without wrap.
    pub fn previous(&mut self) -> bool {
        self.state.step(-1)
    }

    /// Animate to `index`. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.state.item_count {
            return false;
        }
        self.state.settle(index);
        true
    }

    /// Hidden carousels stop auto-advancing; showing restarts the interval.
    pub fn set_visible(&mut self, visible: bool) {
        if self.state.visible == visible {
            return;
        }
        self.state.visible = visible;
        if visible {
            self.state.restart_timer();
        } else if let Some(timer) = self.state.auto_advance.as_mut() {
            timer.stop();
        }
    }

    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        self.state.timelines.drain_events().collect()
    }

    /// Stop the timer and animations, and give up the gesture lock.
    pub fn detach(&mut self) {
        if let Some(timer) = self.state.auto_advance.as_mut() {
            timer.stop();
        }
        self.state.visible = false;
        self.state.drag_origin = None;
        self.state.timelines.abort_all(AbortMode::Discard);
        self.gestures.detach(&mut self.state);
    }
}

impl<V: Visual + 'static> CarouselState<V> {
    fn offset_for(&self, index: usize) -> f64 {
        -(index as f64) * self.page_width
    }

    fn apply_offset(&self, offset: f64) {
        self.strip.borrow_mut().set_property(VisualProperty::TranslationX, offset);
        self.offset.set(offset);
    }

    fn restart_timer(&mut self) {
        if let Some(timer) = self.auto_advance.as_mut() {
            if self.visible {
                timer.start();
            }
        }
    }

    /// Index `delta` pages away, honoring wrap.
    fn neighbor(&self, delta: isize) -> Option<usize> {
        if self.item_count == 0 {
            return None;
        }
        let target = self.index as isize + delta;
        let count = self.item_count as isize;
        if (0..count).contains(&target) {
            Some(target as usize)
        } else if self.config.wrap {
            Some(target.rem_euclid(count) as usize)
        } else {
            None
        }
    }

    fn step(&mut self, delta: isize) -> bool {
        match self.neighbor(delta) {
            Some(index) if index != self.index => {
                self.settle(index);
                true
            }
            _ => false,
        }
    }

    /// Commit to `index` and animate the strip there from its live offset.
    fn settle(&mut self, index: usize) {
        self.drag_origin = None;
        self.index = index;
        let from = self.offset.get();
        let to = self.offset_for(index);
        debug!(index, from, to, "carousel settling");

        let strip = Rc::clone(&self.strip);
        let offset = Rc::clone(&self.offset);
        let slide = Animation::new(from, to, self.easing, move |v| {
            strip.borrow_mut().set_property(VisualProperty::TranslationX, v);
            offset.set(v);
        });
        if let Err(e) = self.timelines.start_timed(PAGE_KEY, slide, self.page) {
            warn!(error = %e, "carousel page animation rejected, jumping to target");
            self.apply_offset(to);
        }
    }
}

impl<V: Visual + 'static> PanHost for CarouselState<V> {
    fn on_pan_updated(&mut self, update: PanUpdate) {
        match update.status {
            PanStatus::Started => {
                self.timelines.abort(PAGE_KEY, AbortMode::Discard);
                self.swiped = false;
                self.drag_origin = Some(self.offset.get());
                // user interaction restarts the auto-advance interval
                self.restart_timer();
            }
            PanStatus::Running => {
                if let Some(origin) = self.drag_origin {
                    self.apply_offset(origin + update.total_x);
                }
            }
            PanStatus::Completed => {
                let fraction = update.total_x / self.page_width;
                let target = if fraction.abs() >= self.config.snap_ratio {
                    // dragging left reveals the next item
                    let delta = if fraction < 0.0 { 1 } else { -1 };
                    self.neighbor(delta).unwrap_or(self.index)
                } else {
                    self.index
                };
                self.settle(target);
            }
            PanStatus::Canceled => {
                if !self.swiped {
                    let index = self.index;
                    self.settle(index);
                }
            }
        }
    }

    fn on_swiped(&mut self, direction: SwipeDirection, velocity: f64) {
        debug!(?direction, velocity, "carousel swiped");
        self.swiped = true;
        let delta = match direction {
            SwipeDirection::Left => 1,
            SwipeDirection::Right => -1,
        };
        let target = self.neighbor(delta).unwrap_or(self.index);
        self.settle(target);
    }

    fn request_disallow_ancestor_intercept(&mut self, disallow: bool) {
        debug!(disallow, "carousel owns horizontal drag");
    }
}
