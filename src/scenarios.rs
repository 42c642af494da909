//! Scripted touch traces replayed against the surfaces.

use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Result, bail};
use glide_config::GlideConfig;
use glide_gesture::platform::android::{ACTION_DOWN, ACTION_MOVE, ACTION_UP};
use glide_gesture::platform::{AndroidMotionEvent, IosTouch, IosTouchPhase, UwpPointerEvent, UwpPointerKind};
use glide_gesture::{GestureArbiter, Point};
use glide_motion::{Thickness, TimelineEvent, VisualElement};
use glide_surfaces::{CarouselLayout, FlipTile, FlyoutMenu, PopupAnimator, ScrollHeader};
use serde::Serialize;
use tracing::info;

const FRAME_MS: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    Flyout,
    Carousel,
    Contention,
    Tile,
    Popup,
    Header,
}

impl FromStr for ScenarioKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "flyout" => Self::Flyout,
            "carousel" => Self::Carousel,
            "contention" => Self::Contention,
            "tile" => Self::Tile,
            "popup" => Self::Popup,
            "header" => Self::Header,
            other => bail!("unknown scenario '{other}' (flyout, carousel, contention, tile, popup, header)"),
        })
    }
}

/// One timeline event observed during a replay.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub time_ms: f64,
    pub surface: &'static str,
    pub event: TimelineEvent,
}

/// Everything a replay produced.
#[derive(Debug, Default)]
pub struct Trace {
    pub scenario: String,
    pub entries: Vec<TraceEntry>,
    pub notes: Vec<String>,
}

impl Trace {
    fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, time_ms: f64, surface: &'static str, events: Vec<TimelineEvent>) {
        self.entries
            .extend(events.into_iter().map(|event| TraceEntry { time_ms, surface, event }));
    }

    fn note(&mut self, note: String) {
        info!("{note}");
        self.notes.push(note);
    }
}

pub fn run(kind: ScenarioKind, config: &GlideConfig, density: f64) -> Result<Trace> {
    match kind {
        ScenarioKind::Flyout => flyout(config, density),
        ScenarioKind::Carousel => carousel(config),
        ScenarioKind::Contention => contention(config),
        ScenarioKind::Tile => tile(config),
        ScenarioKind::Popup => popup(config),
        ScenarioKind::Header => header(config),
    }
}

/// Android drag in physical pixels that reveals most of the menu, then back.
fn flyout(config: &GlideConfig, density: f64) -> Result<Trace> {
    let mut trace = Trace::new("flyout");
    let menu = VisualElement::new().shared();
    let overlay = VisualElement::new().shared();
    let mut flyout = FlyoutMenu::new(menu.clone(), overlay, GestureArbiter::shared(), config)?;

    let reveal = config.flyout.menu_width * 0.7 * density;
    let mut events = vec![AndroidMotionEvent::new(ACTION_DOWN, 0.0, 400.0, 0.0)];
    for i in 1..=12 {
        let x = reveal * i as f64 / 12.0;
        events.push(AndroidMotionEvent::new(ACTION_MOVE, x, 400.0, i as f64 * 40.0));
    }
    events.push(AndroidMotionEvent::new(ACTION_UP, reveal, 400.0, 700.0));

    for native in events.iter().filter_map(AndroidMotionEvent::to_native) {
        flyout.on_native_touch(&native, density);
    }
    trace.note(format!("released at offset {:.1}, open: {}", flyout.offset(), flyout.is_open()));

    let mut time = 700.0;
    while flyout.is_animating() {
        time += FRAME_MS;
        flyout.update(FRAME_MS);
        trace.record(time, "flyout", flyout.drain_events());
    }
    trace.note(format!("menu settled at translation {:.1}", menu.borrow().translation_x));

    if flyout.on_back_pressed() {
        while flyout.is_animating() {
            time += FRAME_MS;
            flyout.update(FRAME_MS);
            trace.record(time, "flyout", flyout.drain_events());
        }
        trace.note(format!("back pressed, offset {:.1}", flyout.offset()));
    }
    Ok(trace)
}

/// iOS fling to the next page, then a few auto-advance intervals.
fn carousel(config: &GlideConfig) -> Result<Trace> {
    let mut trace = Trace::new("carousel");
    let mut config = config.clone();
    if config.carousel.auto_advance_ms.is_none() {
        config.carousel.auto_advance_ms = Some(2000.0);
    }
    let strip = VisualElement::new().shared();
    let mut carousel = CarouselLayout::new(strip, 4, 320.0, GestureArbiter::shared(), &config)?;

    let touches = [
        IosTouch::new(IosTouchPhase::Began, Point::new(260.0, 120.0), 0.0),
        IosTouch::new(IosTouchPhase::Moved, Point::new(220.0, 122.0), 0.016),
        IosTouch::new(IosTouchPhase::Moved, Point::new(180.0, 123.0), 0.032),
        IosTouch::new(IosTouchPhase::Ended, Point::new(140.0, 123.0), 0.048),
    ];
    for native in touches.iter().filter_map(IosTouch::to_native) {
        carousel.on_native_touch(&native, glide_gesture::platform::ios::POINT_DENSITY);
    }
    trace.note(format!("after fling: page {}", carousel.current_index()));

    let mut time = 48.0;
    while time < 7000.0 {
        time += FRAME_MS;
        carousel.update(FRAME_MS);
        trace.record(time, "carousel", carousel.drain_events());
    }
    trace.note(format!("after auto-advance: page {}", carousel.current_index()));
    carousel.detach();
    Ok(trace)
}

/// A flyout and a carousel under one root: the second surface to be
/// pressed never drags while the first holds the lock.
fn contention(config: &GlideConfig) -> Result<Trace> {
    let mut trace = Trace::new("contention");
    let arbiter = Rc::new(GestureArbiter::new());
    let mut flyout = FlyoutMenu::new(
        VisualElement::new().shared(),
        VisualElement::new().shared(),
        Rc::clone(&arbiter),
        config,
    )?;
    let strip = VisualElement::new().shared();
    let mut carousel = CarouselLayout::new(strip.clone(), 3, 300.0, Rc::clone(&arbiter), config)?;

    let pointer = |kind, x, t_ms: u64| UwpPointerEvent::new(kind, Point::new(x, 200.0), t_ms * 1000).to_native();

    flyout.on_native_touch(&pointer(UwpPointerKind::Pressed, 0.0, 0), 1.0);
    flyout.on_native_touch(&pointer(UwpPointerKind::Moved, 80.0, 200), 1.0);
    let claimed = carousel.on_native_touch(&pointer(UwpPointerKind::Pressed, 200.0, 220), 1.0);
    carousel.on_native_touch(&pointer(UwpPointerKind::Moved, 120.0, 300), 1.0);
    trace.note(format!(
        "carousel claimed: {claimed}, strip at {:.1} while flyout holds the lock",
        strip.borrow().translation_x
    ));
    carousel.on_native_touch(&pointer(UwpPointerKind::Released, 120.0, 320), 1.0);
    flyout.on_native_touch(&pointer(UwpPointerKind::Released, 80.0, 600), 1.0);

    carousel.on_native_touch(&pointer(UwpPointerKind::Pressed, 200.0, 1000), 1.0);
    carousel.on_native_touch(&pointer(UwpPointerKind::Moved, 120.0, 1200), 1.0);
    carousel.on_native_touch(&pointer(UwpPointerKind::Moved, 20.0, 1500), 1.0);
    carousel.on_native_touch(&pointer(UwpPointerKind::Released, 20.0, 1800), 1.0);
    trace.note(format!("second drag: page {}", carousel.current_index()));

    let mut time = 1800.0;
    while flyout.is_animating() || carousel.is_animating() {
        time += FRAME_MS;
        flyout.update(FRAME_MS);
        carousel.update(FRAME_MS);
        trace.record(time, "flyout", flyout.drain_events());
        trace.record(time, "carousel", carousel.drain_events());
    }
    Ok(trace)
}

fn tile(config: &GlideConfig) -> Result<Trace> {
    let mut trace = Trace::new("tile");
    let mut tile = FlipTile::new(VisualElement::new().shared(), 1500.0, config.timeline.duration_ms)?
        .with_tick(config.timeline.tick_ms)?;
    tile.start();

    let mut time = 0.0;
    while time < 5000.0 {
        time += FRAME_MS;
        tile.update(FRAME_MS);
        trace.record(time, "tile", tile.drain_events());
    }
    tile.stop();
    trace.record(time, "tile", tile.drain_events());
    trace.note(format!("tile stopped showing {:?}", tile.face()));
    Ok(trace)
}

fn popup(config: &GlideConfig) -> Result<Trace> {
    let mut trace = Trace::new("popup");
    let element = VisualElement::new()
        .with_content_size(240.0, 160.0)
        .with_margin(Thickness::uniform(8.0))
        .shared();
    let mut popup = PopupAnimator::new(element.clone(), config)?;

    popup.show();
    let mut time = 0.0;
    // reverse halfway through the show
    for _ in 0..4 {
        time += FRAME_MS;
        popup.update(FRAME_MS);
    }
    trace.note(format!("mid-show height {:?}", element.borrow().height_request));
    popup.hide();
    trace.record(time, "popup", popup.drain_events());

    while popup.is_animating() {
        time += FRAME_MS;
        popup.update(FRAME_MS);
        trace.record(time, "popup", popup.drain_events());
    }
    trace.note(format!("hidden, height request {:?}", element.borrow().height_request));
    Ok(trace)
}

/// A fling that decelerates to a stop with the header part-way collapsed.
fn header(config: &GlideConfig) -> Result<Trace> {
    let mut trace = Trace::new("header");
    let element = VisualElement::new().shared();
    let mut header = ScrollHeader::new(element, VisualElement::new().shared(), config)?;

    let mut time = 0.0;
    let mut offset = 0.0;
    let mut velocity: f64 = 0.6;
    while velocity > 0.05 {
        time += FRAME_MS;
        offset += velocity * FRAME_MS;
        velocity *= 0.9;
        header.on_scroll(offset);
    }
    trace.note(format!("scroll stopped at {offset:.1}, header {:.1} tall", header.height()));

    if let Some(content_offset) = header.on_scroll_ended() {
        trace.note(format!("content should scroll to {content_offset:.1}"));
    }
    while header.is_animating() {
        time += FRAME_MS;
        header.update(FRAME_MS);
        trace.record(time, "header", header.drain_events());
    }
    trace.note(format!("header settled at {:.1}", header.height()));
    Ok(trace)
}
