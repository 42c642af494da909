//! Core timeline types.
//!
//! - `RunId`: unique identifier for one timeline run
//! - `RunState`: lifecycle of a run
//! - `SizeValue`: explicit or auto-sized size request
//! - `Axis`, `Thickness`: layout geometry touched by scale animations
//! - `VisualProperty`: numeric properties animated on a visual element

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a timeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl RunId {
    /// Generate a new unique run ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current state of a timeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Ticking.
    #[default]
    Running,
    /// Reached progress 1 and fired its finish callbacks.
    Finished,
    /// Stopped before completion.
    Aborted,
}

/// A size request: either an explicit number or "measure the content".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SizeValue {
    /// Unconstrained, derived from the content.
    #[default]
    Auto,
    /// Explicit size in density-independent units.
    Fixed(f64),
}

impl SizeValue {
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    pub fn fixed(&self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Fixed(v) => Some(*v),
        }
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Edge thickness for margin and padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Scale only the edges on `axis`, leaving the other two untouched.
    pub fn scaled_on(&self, axis: Axis, factor: f64) -> Self {
        match axis {
            Axis::Horizontal => Self {
                left: self.left * factor,
                right: self.right * factor,
                ..*self
            },
            Axis::Vertical => Self {
                top: self.top * factor,
                bottom: self.bottom * factor,
                ..*self
            },
        }
    }

    /// Whether any edge on `axis` is non-zero.
    pub fn has_extent_on(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.left != 0.0 || self.right != 0.0,
            Axis::Vertical => self.top != 0.0 || self.bottom != 0.0,
        }
    }
}

/// Numeric visual properties animated directly on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualProperty {
    Opacity,
    TranslationX,
    TranslationY,
    Scale,
    /// Rotation in degrees around the z axis.
    Rotation,
    /// Rotation in degrees around the y axis (flip).
    RotationY,
}

impl VisualProperty {
    /// Resting value of the property on a fresh element.
    pub fn identity(&self) -> f64 {
        match self {
            Self::Opacity | Self::Scale => 1.0,
            Self::TranslationX | Self::TranslationY | Self::Rotation | Self::RotationY => 0.0,
        }
    }
}
