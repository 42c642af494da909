//! Time-remapped animation engine for gesture-driven UI.
//!
//! This crate provides:
//! - **Animations**: a start/end value, an easing and a callback receiving
//!   the interpolated value
//! - **Groups**: ordered entries bound to `[start, end]` windows of the
//!   parent progress, nestable to any depth
//! - **Scale animations**: width/height animations with deferred `Auto`
//!   sizes and co-scaled margin/padding
//! - **Timeline host**: fixed-tick timed runs keyed by name, and interactive
//!   drives fed from gesture travel
//! - **Repeating timer**: cancellable periodic work owned by a surface
//!
//! # Architecture
//!
//! ```text
//! TimelineHost
//!   ├── timed runs (key → Timeline, fixed tick)
//!   └── EventQueue (Started / Iteration / Finished / Aborted)
//!
//! Timeline
//!   ├── Leaf(Animation)
//!   └── Group(AnimationGroup) ── [start, end] → Timeline ...
//! ```
//!
//! Everything here runs on the UI thread. Hosts and timelines own boxed
//! `FnMut` callbacks over `Rc<RefCell<_>>` elements and are not `Send`.

pub mod animation;
pub mod easing;
pub mod error;
pub mod events;
pub mod group;
pub mod host;
pub mod sizing;
pub mod timer;
pub mod types;
pub mod visual;

pub use animation::{Animation, FinishCallback, ValueCallback};
pub use easing::{EasingFunction, StepPosition};
pub use error::{MotionError, Result};
pub use events::{EventQueue, TimelineEvent};
pub use group::{AnimationGroup, Timeline, Window};
pub use host::{AbortMode, DEFAULT_TICK_MS, InteractiveDrive, TimedOptions, TimelineHost};
pub use sizing::ScaleAnimation;
pub use timer::RepeatingTimer;
pub use types::{Axis, RunId, RunState, SizeValue, Thickness, VisualProperty};
pub use visual::{SharedVisual, Visual, VisualElement, animate_property, animate_property_to};

use static_assertions::assert_impl_all;

assert_impl_all!(TimelineEvent: Send, Sync);
assert_impl_all!(EasingFunction: Send, Sync);
