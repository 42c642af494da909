//! Tile that periodically flips between a front and a back face.
//!
//! Each flip is one group on the tile's Y rotation:
//!
//! ```text
//! progress  0 ────────── 0.5 ────────── 1
//! rotate    [ 0 → 90    )
//! swap                   | face
//! rotate                 [ -90 → 0     ]
//! ```

use std::cell::Cell;
use std::rc::Rc;

use glide_motion::{
    AbortMode, Animation, AnimationGroup, EasingFunction, RepeatingTimer, Result, SharedVisual, TimedOptions,
    TimelineEvent, TimelineHost, Visual, VisualElement, VisualProperty, animate_property,
};
use tracing::{debug, warn};

const FLIP_KEY: &str = "tile.flip";

/// Visible face of a [`FlipTile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileFace {
    Front,
    Back,
}

impl TileFace {
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

pub struct FlipTile<V: Visual + 'static = VisualElement> {
    tile: SharedVisual<V>,
    face: Rc<Cell<TileFace>>,
    timer: RepeatingTimer,
    flip: TimedOptions,
    easing: EasingFunction,
    timelines: TimelineHost,
}

impl<V: Visual + 'static> FlipTile<V> {
    /// A stopped tile showing its front face, flipping every `interval_ms`
    /// once started.
    pub fn new(tile: SharedVisual<V>, interval_ms: f64, flip_duration_ms: f64) -> Result<Self> {
        let flip = TimedOptions::new(flip_duration_ms);
        flip.validate()?;
        Ok(Self {
            tile,
            face: Rc::new(Cell::new(TileFace::Front)),
            timer: RepeatingTimer::new(interval_ms)?,
            flip,
            easing: EasingFunction::SinInOut,
            timelines: TimelineHost::new(),
        })
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_tick(mut self, tick_ms: f64) -> Result<Self> {
        let flip = self.flip.tick_ms(tick_ms);
        flip.validate()?;
        self.flip = flip;
        Ok(self)
    }

    pub fn face(&self) -> TileFace {
        self.face.get()
    }

    pub fn is_flipping(&self) -> bool {
        self.timelines.is_running(FLIP_KEY)
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start(&mut self) {
        self.timer.start();
    }

    /// Stop periodic flipping. A flip in progress is completed so the tile
    /// never rests edge-on.
    pub fn stop(&mut self) {
        self.timer.stop();
        self.timelines.abort(FLIP_KEY, AbortMode::Complete);
    }

    /// One flip, as a group: half turn out, face swap, half turn in.
    pub fn flip_timeline(&self) -> Result<AnimationGroup> {
        let target = self.face.get().flipped();
        let face = Rc::clone(&self.face);
        let swap = Animation::new(0.0, 1.0, EasingFunction::Linear, move |_| face.set(target));
        AnimationGroup::new()
            .with(0.0, 0.5, animate_property(&self.tile, VisualProperty::RotationY, 0.0, 90.0, self.easing))?
            .with(0.5, 0.5, swap)?
            .with(0.5, 1.0, animate_property(&self.tile, VisualProperty::RotationY, -90.0, 0.0, self.easing))
    }

    /// Flip now, restarting any flip in progress.
    pub fn flip_now(&mut self) {
        if self.timelines.is_running(FLIP_KEY) {
            self.timelines.abort(FLIP_KEY, AbortMode::Complete);
        }
        match self.flip_timeline() {
            Ok(group) => {
                if let Err(e) = self.timelines.start_timed(FLIP_KEY, group, self.flip) {
                    warn!(error = %e, "flip rejected");
                }
            }
            Err(e) => warn!(error = %e, "flip timeline invalid"),
        }
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.timelines.update(delta_ms);
        let fired = self.timer.advance(delta_ms);
        if fired > 0 {
            debug!(fired, face = ?self.face.get(), "tile flip due");
            self.flip_now();
        }
    }

    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        self.timelines.drain_events().collect()
    }

    /// Stop flipping; the current flip is completed.
    pub fn detach(&mut self) {
        self.stop();
    }
}
