//! Thin translators from platform touch APIs to [`NativeTouchEvent`](crate::touch::NativeTouchEvent).
//!
//! Each translator is a pure mapping. Density division and sequence state
//! live in the shared [`TouchNormalizer`](crate::touch::TouchNormalizer).
//!
//! | Platform | Units passed on | Density to normalize with |
//! |---|---|---|
//! | Android | physical pixels | display density |
//! | iOS | points | 1.0 |
//! | UWP | device-independent pixels | 1.0 |

pub mod android;
pub mod ios;
pub mod uwp;

pub use android::AndroidMotionEvent;
pub use ios::{IosTouch, IosTouchPhase};
pub use uwp::{UwpPointerEvent, UwpPointerKind};
