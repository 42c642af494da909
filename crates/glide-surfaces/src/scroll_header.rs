//! Header that collapses as the content under it scrolls.
//!
//! The collapsed fraction follows the content's vertical scroll offset 1:1:
//! scrolling `expanded_height - collapsed_height` units collapses the header
//! fully while its title fades out. When scrolling stops with the header
//! part-way, it snaps to one end and reports the content offset the host
//! should scroll to so header and content agree again.

use std::cell::Cell;
use std::rc::Rc;

use glide_config::{GlideConfig, HeaderConfig};
use glide_motion::{
    AbortMode, Animation, AnimationGroup, Axis, EasingFunction, InteractiveDrive, MotionError, Result, SharedVisual,
    SizeValue, TimedOptions, TimelineEvent, TimelineHost, Visual, VisualElement, VisualProperty, animate_property,
};
use tracing::{debug, trace, warn};

const SNAP_KEY: &str = "header.snap";

pub struct ScrollHeader<V: Visual + 'static = VisualElement> {
    header: SharedVisual<V>,
    title: SharedVisual<V>,
    config: HeaderConfig,
    easing: EasingFunction,
    snap: TimedOptions,
    collapsed: Rc<Cell<f64>>,
    drive: InteractiveDrive,
    timelines: TimelineHost,
}

impl<V: Visual + 'static> ScrollHeader<V> {
    /// Build an expanded header. `header` gets the height request, `title`
    /// fades out as the header collapses.
    pub fn new(header: SharedVisual<V>, title: SharedVisual<V>, config: &GlideConfig) -> Result<Self> {
        let header_config = config.header.clone();
        let range = header_config.expanded_height - header_config.collapsed_height;
        if !range.is_finite() || range <= 0.0 {
            return Err(MotionError::InvalidReference(range));
        }
        let snap = TimedOptions::new(header_config.snap_duration_ms).tick_ms(config.timeline.tick_ms);
        snap.validate()?;
        let easing: EasingFunction = config.timeline.easing.parse()?;

        let collapsed = Rc::new(Cell::new(0.0));
        let follow = collapse_timeline(&header, &title, &header_config, &collapsed, 0.0, 1.0, EasingFunction::Linear);
        let mut drive = InteractiveDrive::new(follow, range)?;
        drive.set_progress(0.0);

        Ok(Self {
            header,
            title,
            config: header_config,
            easing,
            snap,
            collapsed,
            drive,
            timelines: TimelineHost::new(),
        })
    }

    fn range(&self) -> f64 {
        self.config.expanded_height - self.config.collapsed_height
    }

    /// 0 when expanded, 1 when collapsed.
    pub fn collapsed_fraction(&self) -> f64 {
        self.collapsed.get()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed.get() >= 1.0
    }

    /// Current header height.
    pub fn height(&self) -> f64 {
        self.config.expanded_height - self.collapsed.get() * self.range()
    }

    pub fn is_animating(&self) -> bool {
        self.timelines.is_running(SNAP_KEY)
    }

    /// Follow the content's scroll offset. A running snap is abandoned.
    pub fn on_scroll(&mut self, offset: f64) {
        if !offset.is_finite() {
            trace!(offset, "non-finite scroll offset ignored");
            return;
        }
        self.timelines.abort(SNAP_KEY, AbortMode::Discard);
        let fraction = self.drive.drive(offset);
        trace!(offset, fraction, "header follows scroll");
    }

    /// Scrolling stopped. A part-way header snaps collapsed when at least
    /// `snap_ratio` collapsed, expanded otherwise; the returned offset is
    /// where the content should scroll to match. `None` when already at
    /// rest at either end.
    pub fn on_scroll_ended(&mut self) -> Option<f64> {
        let fraction = self.collapsed.get();
        if fraction <= 0.0 || fraction >= 1.0 {
            return None;
        }
        let target = if fraction >= self.config.snap_ratio { 1.0 } else { 0.0 };
        self.settle(target);
        Some(target * self.range())
    }

    /// Animate back to fully expanded, e.g. on a tap on the status bar.
    /// Returns the content offset to scroll to.
    pub fn expand(&mut self) -> f64 {
        self.settle(0.0);
        0.0
    }

    fn settle(&mut self, target: f64) {
        let from = self.collapsed.get();
        debug!(from, target, "header settling");
        let timeline = collapse_timeline(&self.header, &self.title, &self.config, &self.collapsed, from, target, self.easing);
        if let Err(e) = self.timelines.start_timed(SNAP_KEY, timeline, self.snap) {
            warn!(error = %e, "header snap rejected, jumping to target");
            self.drive.set_progress(target);
        }
    }

    pub fn update(&mut self, delta_ms: f64) {
        self.timelines.update(delta_ms);
    }

    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        self.timelines.drain_events().collect()
    }
}

/// Header height, title opacity and the fraction cell, driven from one
/// collapsed fraction.
fn collapse_timeline<V: Visual + 'static>(
    header: &SharedVisual<V>,
    title: &SharedVisual<V>,
    config: &HeaderConfig,
    collapsed: &Rc<Cell<f64>>,
    from: f64,
    to: f64,
    easing: EasingFunction,
) -> AnimationGroup {
    let expanded = config.expanded_height;
    let range = config.expanded_height - config.collapsed_height;
    let element = Rc::clone(header);
    let fraction = Rc::clone(collapsed);
    AnimationGroup::new()
        .with_full(Animation::new(from, to, easing, move |f| {
            element
                .borrow_mut()
                .set_size_request(Axis::Vertical, SizeValue::Fixed(expanded - f * range));
            fraction.set(f);
        }))
        .with_full(animate_property(title, VisualProperty::Opacity, 1.0 - from, 1.0 - to, easing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn header() -> (ScrollHeader, SharedVisual<VisualElement>, SharedVisual<VisualElement>) {
        let header = VisualElement::new().shared();
        let title = VisualElement::new().shared();
        let scroll_header = ScrollHeader::new(header.clone(), title.clone(), &GlideConfig::default()).unwrap();
        (scroll_header, header, title)
    }

    fn height_of(element: &SharedVisual<VisualElement>) -> f64 {
        element.borrow().height_request.fixed().unwrap()
    }

    #[test]
    fn test_starts_expanded() {
        let (header, element, title) = header();
        assert_eq!(header.collapsed_fraction(), 0.0);
        assert_eq!(element.borrow().height_request, SizeValue::Fixed(200.0));
        assert_eq!(title.borrow().opacity, 1.0);
    }

    #[test]
    fn test_follows_scroll_offset() {
        let (mut header, element, title) = header();

        // 200 expanded, 56 collapsed: 144 units of scroll collapse it
        header.on_scroll(72.0);
        assert_eq!(header.collapsed_fraction(), 0.5);
        assert_eq!(element.borrow().height_request, SizeValue::Fixed(128.0));
        assert_eq!(title.borrow().opacity, 0.5);

        header.on_scroll(500.0);
        assert!(header.is_collapsed());
        assert_eq!(element.borrow().height_request, SizeValue::Fixed(56.0));

        // overscroll at the top
        header.on_scroll(-20.0);
        assert_eq!(header.collapsed_fraction(), 0.0);
        assert_eq!(header.height(), 200.0);
    }

    #[test]
    fn test_stop_past_ratio_snaps_collapsed() {
        let (mut header, element, _) = header();
        header.on_scroll(100.0);
        assert_eq!(header.on_scroll_ended(), Some(144.0));
        assert!(header.is_animating());
        assert!(approx_eq(height_of(&element), 200.0 - 100.0), "snap starts from the live height");

        header.update(400.0);
        assert!(!header.is_animating());
        assert!(approx_eq(header.collapsed_fraction(), 1.0));
        assert!(approx_eq(height_of(&element), 56.0));
        assert!(header.drain_events().iter().any(|e| e.is_finished()));
    }

    #[test]
    fn test_short_stop_snaps_expanded() {
        let (mut header, element, title) = header();
        header.on_scroll(40.0);
        assert_eq!(header.on_scroll_ended(), Some(0.0));
        header.update(400.0);
        assert!(approx_eq(height_of(&element), 200.0));
        assert!(approx_eq(title.borrow().opacity, 1.0));
    }

    #[test]
    fn test_rest_positions_do_not_snap() {
        let (mut header, _, _) = header();
        assert_eq!(header.on_scroll_ended(), None);
        header.on_scroll(300.0);
        assert_eq!(header.on_scroll_ended(), None);
        assert!(!header.is_animating());
    }

    #[test]
    fn test_scroll_during_snap_takes_over() {
        let (mut header, element, _) = header();
        header.on_scroll(100.0);
        header.on_scroll_ended();
        header.update(48.0);

        header.on_scroll(90.0);
        assert!(!header.is_animating());
        assert_eq!(header.collapsed_fraction(), 0.625);
        assert_eq!(element.borrow().height_request, SizeValue::Fixed(110.0));
        assert!(header.drain_events().iter().any(|e| e.is_aborted()));
    }

    #[test]
    fn test_expand_from_collapsed() {
        let (mut header, element, _) = header();
        header.on_scroll(300.0);
        assert_eq!(header.expand(), 0.0);
        header.update(400.0);
        assert!(approx_eq(height_of(&element), 200.0));
    }

    #[test]
    fn test_rejects_inverted_heights() {
        let mut config = GlideConfig::default();
        config.header.expanded_height = 40.0;
        config.header.collapsed_height = 56.0;
        let result = ScrollHeader::new(VisualElement::new().shared(), VisualElement::new().shared(), &config);
        assert!(matches!(result, Err(MotionError::InvalidReference(_))));
    }
}
