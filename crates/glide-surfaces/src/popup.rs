//! Show/hide animation for popups: fade plus an auto-measured height scale.
//!
//! Showing grows the popup from zero to its measured content height while
//! fading in. Hiding collapses it to zero while fading out, then puts the
//! height request back to `Auto` and restores the natural margin and
//! padding so the next show measures the real content again. A hidden popup
//! rests at opacity 0; hosts should skip laying it out while
//! [`PopupAnimator::is_shown`] is false.

use std::rc::Rc;

use glide_config::GlideConfig;
use glide_motion::{
    AnimationGroup, Axis, EasingFunction, FinishCallback, Result, ScaleAnimation, SharedVisual, SizeValue, Thickness, TimedOptions,
    TimelineEvent, TimelineHost, Visual, VisualElement, VisualProperty, animate_property_to,
};
use tracing::{debug, warn};

const POPUP_KEY: &str = "popup.visibility";

pub struct PopupAnimator<V: Visual + 'static = VisualElement> {
    popup: SharedVisual<V>,
    margin: Thickness,
    padding: Thickness,
    options: TimedOptions,
    easing: EasingFunction,
    shown: bool,
    timelines: TimelineHost,
}

impl<V: Visual + 'static> PopupAnimator<V> {
    /// Wrap a hidden popup. Its current margin and padding are taken as the
    /// natural ones.
    pub fn new(popup: SharedVisual<V>, config: &GlideConfig) -> Result<Self> {
        let options = TimedOptions::from_config(&config.timeline);
        options.validate()?;
        let easing: EasingFunction = config.timeline.easing.parse()?;
        let (margin, padding) = {
            let mut element = popup.borrow_mut();
            element.set_property(VisualProperty::Opacity, 0.0);
            (element.margin(), element.padding())
        };
        Ok(Self {
            popup,
            margin,
            padding,
            options,
            easing,
            shown: false,
            timelines: TimelineHost::new(),
        })
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_animating(&self) -> bool {
        self.timelines.is_running(POPUP_KEY)
    }

    /// Fade in and grow to the content height.
    pub fn show(&mut self) {
        if self.shown {
            return;
        }
        // a popup at rest after hiding has an Auto request but no height
        let from = match self.popup.borrow().size_request(Axis::Vertical) {
            SizeValue::Auto if !self.is_animating() => SizeValue::Fixed(0.0),
            current => current,
        };
        self.shown = true;
        let basis = (self.margin, self.padding);
        self.run(1.0, from, SizeValue::Auto, basis, None);
    }

    /// Fade out and collapse. The scale puts the request back to `Auto`
    /// at the end; the natural margin and padding are restored here since
    /// a hide that reverses a show starts from partial ones.
    pub fn hide(&mut self) {
        if !self.shown {
            return;
        }
        self.shown = false;
        // collapse from whatever is applied now, which is the natural
        // thickness unless a show is still in flight
        let (from, basis) = {
            let element = self.popup.borrow();
            (element.size_request(Axis::Vertical), (element.margin(), element.padding()))
        };
        let popup = Rc::clone(&self.popup);
        let (margin, padding) = (self.margin, self.padding);
        let restore = move || {
            let mut element = popup.borrow_mut();
            element.set_margin(margin);
            element.set_padding(padding);
        };
        self.run(0.0, from, SizeValue::Fixed(0.0), basis, Some(Box::new(restore)));
    }

    pub fn toggle(&mut self) {
        if self.shown { self.hide() } else { self.show() }
    }

    fn run(
        &mut self,
        opacity: f64,
        from: SizeValue,
        to: SizeValue,
        (margin, padding): (Thickness, Thickness),
        on_finished: Option<FinishCallback>,
    ) {
        debug!(opacity, ?from, ?to, "popup visibility change");
        let scale = ScaleAnimation::new(&self.popup, Axis::Vertical)
            .from(from)
            .to(to)
            .easing(self.easing)
            .margin_basis(margin)
            .padding_basis(padding)
            .restore_auto(true)
            .build();
        let mut group = AnimationGroup::new()
            .with_full(animate_property_to(&self.popup, VisualProperty::Opacity, opacity, self.easing))
            .with_full(scale);
        if let Some(finished) = on_finished {
            group = group.on_finished(finished);
        }
        if let Err(e) = self.timelines.start_timed(POPUP_KEY, group, self.options) {
            warn!(error = %e, "popup animation rejected");
        }
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.timelines.update(delta_ms);
    }

    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        self.timelines.drain_events().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn popup() -> (PopupAnimator, SharedVisual<VisualElement>) {
        let mut config = GlideConfig::default();
        config.timeline.easing = "linear".to_string();
        config.timeline.duration_ms = 160.0;
        let element = VisualElement::new()
            .with_content_size(200.0, 120.0)
            .with_margin(Thickness::new(0.0, 8.0, 0.0, 8.0))
            .shared();
        let animator = PopupAnimator::new(element.clone(), &config).unwrap();
        (animator, element)
    }

    #[test]
    fn test_show_grows_and_fades_in() {
        let (mut popup, element) = popup();
        assert_eq!(element.borrow().opacity, 0.0);

        popup.show();
        assert!(popup.is_shown());
        assert_eq!(element.borrow().height_request, SizeValue::Fixed(0.0));
        assert_eq!(element.borrow().margin.top, 0.0);

        popup.update(80.0);
        {
            let e = element.borrow();
            assert!(approx_eq(e.opacity, 0.5));
            assert_eq!(e.height_request, SizeValue::Fixed(60.0));
            assert!(approx_eq(e.margin.top, 4.0));
        }

        popup.update(80.0);
        let e = element.borrow();
        assert_eq!(e.height_request, SizeValue::Auto);
        assert_eq!(e.margin.top, 8.0);
        assert_eq!(e.opacity, 1.0);
    }

    #[test]
    fn test_hide_restores_auto() {
        let (mut popup, element) = popup();
        popup.show();
        popup.update(200.0);

        popup.hide();
        popup.update(80.0);
        assert_eq!(element.borrow().height_request, SizeValue::Fixed(60.0));

        popup.update(80.0);
        let e = element.borrow();
        assert_eq!(e.opacity, 0.0);
        assert_eq!(e.height_request, SizeValue::Auto);
        assert_eq!(e.margin, Thickness::new(0.0, 8.0, 0.0, 8.0));
        assert!(!popup.is_shown());
    }

    #[test]
    fn test_reverse_mid_flight_is_continuous() {
        let (mut popup, element) = popup();
        popup.show();
        popup.update(48.0);
        let height = element.borrow().height_request;
        let opacity = element.borrow().opacity;

        popup.hide();
        assert_eq!(element.borrow().height_request, height);
        assert_eq!(element.borrow().opacity, opacity);
        assert!(approx_eq(element.borrow().margin.top, 8.0 * 0.3));
        let aborted = popup.drain_events().iter().filter(|e| e.is_aborted()).count();
        assert_eq!(aborted, 1);
    }

    #[test]
    fn test_hide_after_reversed_show_restores_auto() {
        let (mut popup, element) = popup();
        popup.show();
        popup.update(48.0);
        popup.hide();
        popup.update(200.0);

        let e = element.borrow();
        assert_eq!(e.height_request, SizeValue::Auto);
        assert_eq!(e.margin, Thickness::new(0.0, 8.0, 0.0, 8.0));
        assert_eq!(e.opacity, 0.0);
    }

    #[test]
    fn test_repeated_show_is_noop() {
        let (mut popup, _) = popup();
        popup.show();
        popup.update(200.0);
        popup.drain_events();
        popup.show();
        assert!(popup.drain_events().is_empty());
    }
}
