//! Touch normalization and gesture recognition for interactive surfaces.
//!
//! This crate provides:
//! - **Platform translators**: Android motion events, iOS touch phases and
//!   UWP pointer events mapped onto one native event shape
//! - **Touch normalizer**: canonical [`TouchEvent`]s in density-independent
//!   units, with "swipe suppresses tap"
//! - **Swipe recognizer**: release-time velocity/distance classification
//! - **Pan controller**: per-surface state machine reporting total deltas
//! - **Gesture arbiter**: the claimant lock shared by the surfaces of a root
//!
//! # Data flow
//!
//! ```text
//! platform event ─▶ NativeTouchEvent ─▶ SurfaceGestures
//!                                         ├── SwipeRecognizer (on Up) ─▶ PanHost::on_swiped
//!                                         ├── TouchNormalizer ─▶ TouchEvent
//!                                         └── PanController ─▶ PanHost::on_pan_updated
//! ```
//!
//! Nothing here returns errors: malformed or out-of-order native input is
//! dropped and traced.

pub mod arbiter;
pub mod pan;
pub mod pipeline;
pub mod platform;
pub mod swipe;
pub mod touch;
pub mod velocity;

pub use arbiter::{GestureArbiter, SurfaceId};
pub use pan::{PanController, PanHost, PanState, PanStatus, PanUpdate};
pub use pipeline::SurfaceGestures;
pub use swipe::{SwipeDecision, SwipeDirection, SwipeRecognizer, classify};
pub use touch::{
    NativeAction, NativePointer, NativeTouchEvent, Point, TouchEvent, TouchKind, TouchNormalizer,
    effective_density,
};
pub use velocity::VelocityTracker;

use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(TouchEvent: Send, Sync);
assert_impl_all!(PanUpdate: Send, Sync);
assert_impl_all!(SwipeDecision: Send, Sync);
assert_not_impl_any!(PanController: Send);
assert_not_impl_any!(SurfaceGestures: Send);
