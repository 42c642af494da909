//! Scale animations on width/height with deferred "auto" sizes.
//!
//! A size endpoint may be [`SizeValue::Auto`], meaning "whatever the content
//! measures". The target is measured at most once, the first time an auto
//! endpoint is resolved, and the result is reused for the rest of the build.
//! An element that has not been laid out measures as 0.
//!
//! The built group also co-scales the element's margin and padding on the
//! animated axis so borders stay attached to the resized content.
//!
//! An element whose size request was `Auto` when the animation was created
//! goes back to `Auto` when the run completes, as does any scale whose
//! target is `Auto`. The last numeric sample is only kept for elements that
//! were already fixed-size and stay that way.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use super::animation::Animation;
use super::easing::EasingFunction;
use super::group::AnimationGroup;
use super::types::{Axis, SizeValue, Thickness};
use super::visual::{SharedVisual, Visual};

/// Builder for a width or height scale animation.
pub struct ScaleAnimation<V: Visual + 'static> {
    target: SharedVisual<V>,
    axis: Axis,
    from: SizeValue,
    to: SizeValue,
    easing: EasingFunction,
    margin_basis: Option<Thickness>,
    padding_basis: Option<Thickness>,
    restore_auto: bool,
    measured: Cell<Option<f64>>,
}

impl<V: Visual + 'static> ScaleAnimation<V> {
    /// Scale `target` on `axis` from its current size request to `Auto`.
    pub fn new(target: &SharedVisual<V>, axis: Axis) -> Self {
        let from = target.borrow().size_request(axis);
        Self {
            restore_auto: from.is_auto(),
            target: Rc::clone(target),
            axis,
            from,
            to: SizeValue::Auto,
            easing: EasingFunction::Linear,
            margin_basis: None,
            padding_basis: None,
            measured: Cell::new(None),
        }
    }

    pub fn from(mut self, from: SizeValue) -> Self {
        self.from = from;
        self
    }

    pub fn to(mut self, to: SizeValue) -> Self {
        self.to = to;
        self
    }

    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Margin at full size. Defaults to the element's current margin.
    pub fn margin_basis(mut self, margin: Thickness) -> Self {
        self.margin_basis = Some(margin);
        self
    }

    /// Padding at full size. Defaults to the element's current padding.
    pub fn padding_basis(mut self, padding: Thickness) -> Self {
        self.padding_basis = Some(padding);
        self
    }

    /// Override whether completion resets the request to `Auto`. Owners
    /// whose element is naturally `Auto` but is mid-animation at a fixed
    /// size use this to keep the natural request.
    pub fn restore_auto(mut self, restore: bool) -> Self {
        self.restore_auto = restore;
        self
    }

    fn measured(&self) -> f64 {
        if let Some(size) = self.measured.get() {
            return size;
        }
        let size = self
            .target
            .borrow_mut()
            .measure(self.axis)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0);
        debug!(axis = ?self.axis, size, "measured auto size");
        self.measured.set(Some(size));
        size
    }

    fn resolve(&self, value: SizeValue) -> f64 {
        match value {
            SizeValue::Fixed(v) => v,
            SizeValue::Auto => self.measured(),
        }
    }

    /// Build the group: one size entry plus margin/padding entries on the
    /// same window, all driven by the same eased progress.
    ///
    /// When the element started out `Auto`, or the target size is `Auto`,
    /// completion resets the size request to `Auto` and restores the margin
    /// and padding bases instead of leaving the last numeric sample in place.
    pub fn build(self) -> AnimationGroup {
        let from_px = self.resolve(self.from);
        let to_px = self.resolve(self.to);
        let reference = from_px.max(to_px);
        let axis = self.axis;
        let easing = self.easing;

        let (margin, padding) = {
            let target = self.target.borrow();
            (
                self.margin_basis.unwrap_or_else(|| target.margin()),
                self.padding_basis.unwrap_or_else(|| target.padding()),
            )
        };

        let factor = move |size: f64| if reference > 0.0 { size / reference } else { 0.0 };

        let sized = Rc::clone(&self.target);
        let mut group = AnimationGroup::new().with_full(Animation::new(from_px, to_px, easing, move |v| {
            sized.borrow_mut().set_size_request(axis, SizeValue::Fixed(v));
        }));

        if margin.has_extent_on(axis) {
            let target = Rc::clone(&self.target);
            group = group.with_full(Animation::new(from_px, to_px, easing, move |v| {
                target.borrow_mut().set_margin(margin.scaled_on(axis, factor(v)));
            }));
        }

        if padding.has_extent_on(axis) {
            let target = Rc::clone(&self.target);
            group = group.with_full(Animation::new(from_px, to_px, easing, move |v| {
                target.borrow_mut().set_padding(padding.scaled_on(axis, factor(v)));
            }));
        }

        if self.restore_auto || self.to.is_auto() {
            let target = Rc::clone(&self.target);
            group = group.on_finished(move || {
                let mut target = target.borrow_mut();
                target.set_size_request(axis, SizeValue::Auto);
                target.set_margin(margin);
                target.set_padding(padding);
            });
        }

        group
    }
}
