//! Interactive surfaces built on the motion and gesture crates.
//!
//! Each surface owns a [`SurfaceGestures`](glide_gesture::SurfaceGestures)
//! pipeline and a [`TimelineHost`](glide_motion::TimelineHost), and is
//! driven by the host loop with native touch events and frame deltas:
//!
//! ```text
//! native touch ─▶ surface.on_native_touch(event, density)
//! frame tick   ─▶ surface.update(delta_ms)
//! ```
//!
//! - [`FlyoutMenu`]: drag-to-reveal side menu with a dimming overlay
//! - [`CarouselLayout`]: horizontally paged strip with optional auto-advance
//! - [`FlipTile`]: tile flipping between two faces on a timer
//! - [`PopupAnimator`]: fade plus auto-height show/hide
//! - [`ScrollHeader`]: header collapsing with the content's scroll offset
//!
//! Surfaces sharing one [`GestureArbiter`](glide_gesture::GestureArbiter)
//! never track a drag at the same time.

pub mod carousel;
pub mod flip_tile;
pub mod flyout;
pub mod popup;
pub mod scroll_header;

pub use carousel::CarouselLayout;
pub use flip_tile::{FlipTile, TileFace};
pub use flyout::FlyoutMenu;
pub use popup::PopupAnimator;
pub use scroll_header::ScrollHeader;

use static_assertions::{assert_impl_all, assert_not_impl_any};

assert_impl_all!(TileFace: Send, Sync);
assert_not_impl_any!(FlyoutMenu: Send);
assert_not_impl_any!(CarouselLayout: Send);
assert_not_impl_any!(FlipTile: Send);
assert_not_impl_any!(PopupAnimator: Send);
assert_not_impl_any!(ScrollHeader: Send);
