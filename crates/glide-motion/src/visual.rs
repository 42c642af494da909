//! Visual elements animated by timelines.
//!
//! Renderers expose their views through [`Visual`]; animations hold the
//! element behind `Rc<RefCell<_>>` because every sample runs on the UI thread
//! and mutates the same element the layout pass reads.

use std::cell::RefCell;
use std::rc::Rc;

use super::animation::Animation;
use super::easing::EasingFunction;
use super::types::{Axis, SizeValue, Thickness, VisualProperty};

/// An element shared between its surface and the animations driving it.
pub type SharedVisual<V> = Rc<RefCell<V>>;

/// Properties a timeline may read and write on a rendered element.
pub trait Visual {
    fn property(&self, property: VisualProperty) -> f64;
    fn set_property(&mut self, property: VisualProperty, value: f64);

    fn size_request(&self, axis: Axis) -> SizeValue;
    fn set_size_request(&mut self, axis: Axis, value: SizeValue);

    /// Measured content size on `axis`; `None` while the element has not
    /// been laid out.
    fn measure(&mut self, axis: Axis) -> Option<f64>;

    fn margin(&self) -> Thickness;
    fn set_margin(&mut self, margin: Thickness);

    fn padding(&self) -> Thickness;
    fn set_padding(&mut self, padding: Thickness);
}

/// Headless element used by surfaces that have no renderer attached, and by
/// tests.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    pub opacity: f64,
    pub translation_x: f64,
    pub translation_y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub rotation_y: f64,
    pub width_request: SizeValue,
    pub height_request: SizeValue,
    /// Content size reported by the last layout pass.
    pub content_size: Option<(f64, f64)>,
    pub margin: Thickness,
    pub padding: Thickness,
}

impl Default for VisualElement {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translation_x: 0.0,
            translation_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            rotation_y: 0.0,
            width_request: SizeValue::Auto,
            height_request: SizeValue::Auto,
            content_size: None,
            margin: Thickness::default(),
            padding: Thickness::default(),
        }
    }
}

impl VisualElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedVisual<Self> {
        Rc::new(RefCell::new(self))
    }

    pub fn with_content_size(mut self, width: f64, height: f64) -> Self {
        self.content_size = Some((width, height));
        self
    }

    pub fn with_margin(mut self, margin: Thickness) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_padding(mut self, padding: Thickness) -> Self {
        self.padding = padding;
        self
    }
}

impl Visual for VisualElement {
    fn property(&self, property: VisualProperty) -> f64 {
        match property {
            VisualProperty::Opacity => self.opacity,
            VisualProperty::TranslationX => self.translation_x,
            VisualProperty::TranslationY => self.translation_y,
            VisualProperty::Scale => self.scale,
            VisualProperty::Rotation => self.rotation,
            VisualProperty::RotationY => self.rotation_y,
        }
    }

    fn set_property(&mut self, property: VisualProperty, value: f64) {
        match property {
            VisualProperty::Opacity => self.opacity = value,
            VisualProperty::TranslationX => self.translation_x = value,
            VisualProperty::TranslationY => self.translation_y = value,
            VisualProperty::Scale => self.scale = value,
            VisualProperty::Rotation => self.rotation = value,
            VisualProperty::RotationY => self.rotation_y = value,
        }
    }

    fn size_request(&self, axis: Axis) -> SizeValue {
        match axis {
            Axis::Horizontal => self.width_request,
            Axis::Vertical => self.height_request,
        }
    }

    fn set_size_request(&mut self, axis: Axis, value: SizeValue) {
        match axis {
            Axis::Horizontal => self.width_request = value,
            Axis::Vertical => self.height_request = value,
        }
    }

    fn measure(&mut self, axis: Axis) -> Option<f64> {
        self.content_size.map(|(w, h)| match axis {
            Axis::Horizontal => w,
            Axis::Vertical => h,
        })
    }

    fn margin(&self) -> Thickness {
        self.margin
    }

    fn set_margin(&mut self, margin: Thickness) {
        self.margin = margin;
    }

    fn padding(&self) -> Thickness {
        self.padding
    }

    fn set_padding(&mut self, padding: Thickness) {
        self.padding = padding;
    }
}

/// Animate one numeric property of `target` from `from` to `to`.
pub fn animate_property<V: Visual + 'static>(
    target: &SharedVisual<V>,
    property: VisualProperty,
    from: f64,
    to: f64,
    easing: EasingFunction,
) -> Animation {
    let target = Rc::clone(target);
    Animation::new(from, to, easing, move |value| {
        target.borrow_mut().set_property(property, value);
    })
}

/// Animate one numeric property from its current value to `to`.
pub fn animate_property_to<V: Visual + 'static>(
    target: &SharedVisual<V>,
    property: VisualProperty,
    to: f64,
    easing: EasingFunction,
) -> Animation {
    let from = target.borrow().property(property);
    animate_property(target, property, from, to, easing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_identity() {
        let element = VisualElement::new();
        for property in [
            VisualProperty::Opacity,
            VisualProperty::TranslationX,
            VisualProperty::TranslationY,
            VisualProperty::Scale,
            VisualProperty::Rotation,
            VisualProperty::RotationY,
        ] {
            assert_eq!(element.property(property), property.identity());
        }
    }

    #[test]
    fn test_animate_property_writes_through() {
        let element = VisualElement::new().shared();
        let mut fade = animate_property(&element, VisualProperty::Opacity, 0.0, 1.0, EasingFunction::Linear);
        fade.evaluate(0.25);
        assert_eq!(element.borrow().opacity, 0.25);
    }

    #[test]
    fn test_animate_property_to_starts_from_current() {
        let element = VisualElement::new().shared();
        element.borrow_mut().translation_x = -120.0;
        let mut slide = animate_property_to(&element, VisualProperty::TranslationX, 0.0, EasingFunction::Linear);
        slide.evaluate(0.0);
        assert_eq!(element.borrow().translation_x, -120.0);
        slide.evaluate(0.5);
        assert_eq!(element.borrow().translation_x, -60.0);
    }

    #[test]
    fn test_measure_unlaid_out() {
        let mut element = VisualElement::new();
        assert_eq!(element.measure(Axis::Vertical), None);
        let mut element = element.with_content_size(40.0, 90.0);
        assert_eq!(element.measure(Axis::Vertical), Some(90.0));
    }
}
