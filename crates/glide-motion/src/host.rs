//! Timeline host: drives timelines from host time or from live gestures.
//!
//! Timed runs advance on a fixed tick. The host accumulates the time passed
//! to [`TimelineHost::update`] and evaluates one sample per elapsed tick,
//! so every run sees the same sample sequence regardless of frame pacing.
//!
//! ```ignore
//! let mut host = TimelineHost::new();
//! let fade = animate_property(&element, VisualProperty::Opacity, 0.0, 1.0, EasingFunction::Linear);
//! host.start_timed("popup.fade", fade, TimedOptions::new(200.0))?;
//!
//! // Each frame
//! host.update(16.0);
//! for event in host.drain_events() {
//!     // react to Finished / Aborted
//! }
//! ```
//!
//! Interactive drives have no timer: the caller maps gesture travel to
//! progress and the timeline is evaluated synchronously. Handing off to a
//! timed run reads [`InteractiveDrive::live_value`] and starts the new run
//! from there, so the first timed sample equals the last interactive one.

use glide_config::TimelineConfig;
use static_assertions::assert_not_impl_any;
use tracing::{debug, trace};

use super::error::{MotionError, Result};
use super::events::{EventQueue, TimelineEvent};
use super::group::Timeline;
use super::types::{RunId, RunState};

/// Default tick interval in milliseconds.
pub const DEFAULT_TICK_MS: f64 = 16.0;

/// Timing of one timed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedOptions {
    pub duration_ms: f64,
    pub tick_ms: f64,
    /// Restart from progress 0 after each completion until disabled.
    pub repeat: bool,
}

impl Default for TimedOptions {
    fn default() -> Self {
        Self {
            duration_ms: 250.0,
            tick_ms: DEFAULT_TICK_MS,
            repeat: false,
        }
    }
}

impl TimedOptions {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    /// Duration and tick from the `[timeline]` config section.
    pub fn from_config(config: &TimelineConfig) -> Self {
        Self {
            duration_ms: config.duration_ms,
            tick_ms: config.tick_ms,
            repeat: false,
        }
    }

    pub fn tick_ms(mut self, tick_ms: f64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tick_ms.is_finite() || self.tick_ms <= 0.0 {
            return Err(MotionError::InvalidTick(self.tick_ms));
        }
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(MotionError::InvalidDuration(self.duration_ms));
        }
        Ok(())
    }

    /// Number of ticks to reach progress 1. A zero duration completes on
    /// the first tick.
    fn total_ticks(&self) -> u64 {
        ((self.duration_ms / self.tick_ms).ceil() as u64).max(1)
    }
}

/// How [`TimelineHost::abort`] treats the stopped run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbortMode {
    /// Stop where it is; finish callbacks do not fire.
    #[default]
    Discard,
    /// Jump to progress 1 and fire finish callbacks.
    Complete,
}

#[derive(Debug)]
struct TimedRun {
    id: RunId,
    key: String,
    timeline: Timeline,
    options: TimedOptions,
    total_ticks: u64,
    ticks: u64,
    elapsed_ms: f64,
    iteration: u32,
    progress: f64,
    state: RunState,
}

impl TimedRun {
    fn sample(&mut self, progress: f64) {
        trace!(key = %self.key, progress, "timeline sample");
        self.progress = progress;
        self.timeline.evaluate(progress);
    }

    fn progress_at(&self, tick: u64) -> f64 {
        if tick >= self.total_ticks {
            1.0
        } else {
            (tick as f64 * self.options.tick_ms / self.options.duration_ms).min(1.0)
        }
    }

    /// Advance by host time, pushing lifecycle events.
    fn advance(&mut self, delta_ms: f64, events: &mut EventQueue) {
        self.elapsed_ms += delta_ms;
        while self.state == RunState::Running && self.elapsed_ms >= self.options.tick_ms {
            self.elapsed_ms -= self.options.tick_ms;
            self.ticks += 1;
            let progress = self.progress_at(self.ticks);
            self.sample(progress);

            if self.ticks < self.total_ticks {
                continue;
            }
            if self.options.repeat {
                self.iteration += 1;
                self.ticks = 0;
                events.push(TimelineEvent::Iteration {
                    run_id: self.id,
                    key: self.key.clone(),
                    iteration: self.iteration,
                });
                self.sample(0.0);
            } else {
                self.timeline.complete();
                self.state = RunState::Finished;
                debug!(key = %self.key, run = self.id.0, "timeline finished");
                events.push(TimelineEvent::Finished {
                    run_id: self.id,
                    key: self.key.clone(),
                });
            }
        }
    }
}

/// Drives timed runs, one per key, on the UI thread.
#[derive(Debug, Default)]
pub struct TimelineHost {
    /// In start order, so events are emitted deterministically.
    runs: Vec<TimedRun>,
    events: EventQueue,
}

assert_not_impl_any!(TimelineHost: Send);

impl TimelineHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timed run under `key`.
    ///
    /// Any in-flight run on the same key is aborted first (no finish
    /// callbacks). The progress-0 sample is applied before this returns.
    pub fn start_timed(
        &mut self,
        key: impl Into<String>,
        timeline: impl Into<Timeline>,
        options: TimedOptions,
    ) -> Result<RunId> {
        options.validate()?;
        let key = key.into();
        self.abort(&key, AbortMode::Discard);

        let mut run = TimedRun {
            id: RunId::new(),
            key,
            timeline: timeline.into(),
            options,
            total_ticks: options.total_ticks(),
            ticks: 0,
            elapsed_ms: 0.0,
            iteration: 0,
            progress: 0.0,
            state: RunState::Running,
        };
        debug!(
            key = %run.key,
            run = run.id.0,
            duration_ms = options.duration_ms,
            tick_ms = options.tick_ms,
            "timeline started"
        );
        run.sample(0.0);

        let id = run.id;
        self.events.push(TimelineEvent::Started {
            run_id: id,
            key: run.key.clone(),
        });
        self.runs.push(run);
        Ok(id)
    }

    /// Advance every run by `delta_ms` of host time.
    pub fn update(&mut self, delta_ms: f64) {
        if self.runs.is_empty() || !delta_ms.is_finite() || delta_ms <= 0.0 {
            return;
        }
        for run in &mut self.runs {
            run.advance(delta_ms, &mut self.events);
        }
        self.runs.retain(|run| run.state == RunState::Running);
    }

    /// Stop the run on `key`. Returns false when nothing was running.
    pub fn abort(&mut self, key: &str, mode: AbortMode) -> bool {
        let Some(index) = self.runs.iter().position(|run| run.key == key) else {
            return false;
        };
        let mut run = self.runs.remove(index);
        match mode {
            AbortMode::Discard => {
                run.state = RunState::Aborted;
                debug!(key = %run.key, run = run.id.0, progress = run.progress, "timeline aborted");
                self.events.push(TimelineEvent::Aborted {
                    run_id: run.id,
                    key: run.key,
                });
            }
            AbortMode::Complete => {
                run.timeline.complete();
                run.state = RunState::Finished;
                debug!(key = %run.key, run = run.id.0, "timeline completed on abort");
                self.events.push(TimelineEvent::Finished {
                    run_id: run.id,
                    key: run.key,
                });
            }
        }
        true
    }

    /// Abort every run, in start order.
    pub fn abort_all(&mut self, mode: AbortMode) {
        let keys: Vec<String> = self.runs.iter().map(|run| run.key.clone()).collect();
        for key in keys {
            self.abort(&key, mode);
        }
    }

    /// Turn repetition on or off for a running run. Disabling lets the
    /// current iteration finish normally.
    pub fn set_repeat(&mut self, key: &str, repeat: bool) -> bool {
        match self.runs.iter_mut().find(|run| run.key == key) {
            Some(run) => {
                run.options.repeat = repeat;
                true
            }
            None => false,
        }
    }

    fn run(&self, key: &str) -> Option<&TimedRun> {
        self.runs.iter().find(|run| run.key == key)
    }

    pub fn is_running(&self, key: &str) -> bool {
        self.run(key).is_some()
    }

    pub fn run_id(&self, key: &str) -> Option<RunId> {
        self.run(key).map(|run| run.id)
    }

    /// Progress of the last applied sample.
    pub fn progress(&self, key: &str) -> Option<f64> {
        self.run(key).map(|run| run.progress)
    }

    /// Last value the run's timeline produced.
    pub fn live_value(&self, key: &str) -> Option<f64> {
        self.run(key).and_then(|run| run.timeline.last_value())
    }

    pub fn active_count(&self) -> usize {
        self.runs.len()
    }

    pub fn has_active(&self) -> bool {
        !self.runs.is_empty()
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn pop_event(&mut self) -> Option<TimelineEvent> {
        self.events.pop()
    }

    pub fn peek_event(&self) -> Option<&TimelineEvent> {
        self.events.peek()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = TimelineEvent> + '_ {
        self.events.drain()
    }
}

/// A timeline driven directly by gesture travel.
#[derive(Debug)]
pub struct InteractiveDrive {
    timeline: Timeline,
    reference_distance: f64,
    progress: f64,
}

assert_not_impl_any!(InteractiveDrive: Send);

impl InteractiveDrive {
    /// `reference_distance` is the travel that maps to progress 1. It may be
    /// negative for drives that follow a leftward or upward drag.
    pub fn new(timeline: impl Into<Timeline>, reference_distance: f64) -> Result<Self> {
        if !reference_distance.is_finite() || reference_distance == 0.0 {
            return Err(MotionError::InvalidReference(reference_distance));
        }
        Ok(Self {
            timeline: timeline.into(),
            reference_distance,
            progress: 0.0,
        })
    }

    /// Progress for a travel of `delta`, clamped to `[0, 1]`.
    pub fn progress_for(&self, delta: f64) -> f64 {
        let p = delta / self.reference_distance;
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }

    /// Evaluate at the progress for `delta` and return it.
    pub fn drive(&mut self, delta: f64) -> f64 {
        let p = self.progress_for(delta);
        self.set_progress(p);
        p
    }

    pub fn set_progress(&mut self, progress: f64) {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.progress = p;
        self.timeline.evaluate(p);
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn reference_distance(&self) -> f64 {
        self.reference_distance
    }

    pub fn live_value(&self) -> Option<f64> {
        self.timeline.last_value()
    }

    /// Settle at progress 1 and fire finish callbacks.
    pub fn finish(mut self) {
        self.timeline.complete();
    }

    /// Give the timeline back without completing it.
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::easing::EasingFunction;
    use crate::group::AnimationGroup;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn recording(start: f64, end: f64) -> (Animation, Rc<RefCell<Vec<f64>>>) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = values.clone();
        let anim = Animation::new(start, end, EasingFunction::Linear, move |v| sink.borrow_mut().push(v));
        (anim, values)
    }

    #[test]
    fn test_options_validation() {
        assert!(TimedOptions::new(100.0).validate().is_ok());
        assert!(TimedOptions::new(0.0).validate().is_ok());
        assert_eq!(
            TimedOptions::new(100.0).tick_ms(0.0).validate(),
            Err(MotionError::InvalidTick(0.0))
        );
        assert_eq!(
            TimedOptions::new(-1.0).validate(),
            Err(MotionError::InvalidDuration(-1.0))
        );

        let mut host = TimelineHost::new();
        let (anim, values) = recording(0.0, 1.0);
        assert!(host.start_timed("bad", anim, TimedOptions::new(100.0).tick_ms(-16.0)).is_err());
        assert!(values.borrow().is_empty());
        assert_eq!(host.active_count(), 0);
    }

    #[test]
    fn test_options_from_config() {
        let config = TimelineConfig::default();
        let options = TimedOptions::from_config(&config);
        assert_eq!(options.duration_ms, config.duration_ms);
        assert_eq!(options.tick_ms, config.tick_ms);
        assert!(!options.repeat);
    }

    #[test]
    fn test_timed_run_samples_and_finishes_once() {
        let mut host = TimelineHost::new();
        let finished = Rc::new(Cell::new(0));
        let counter = finished.clone();
        let (anim, values) = recording(0.0, 100.0);
        let anim = anim.on_finished(move || counter.set(counter.get() + 1));

        let id = host.start_timed("slide", anim, TimedOptions::new(64.0)).unwrap();
        // progress 0 is applied synchronously
        assert_eq!(*values.borrow(), vec![0.0]);
        assert!(matches!(host.pop_event(), Some(TimelineEvent::Started { run_id, .. }) if run_id == id));

        host.update(16.0);
        host.update(16.0);
        assert!(approx_eq(host.progress("slide").unwrap(), 0.5));
        assert!(approx_eq(host.live_value("slide").unwrap(), 50.0));

        host.update(100.0);
        assert!(!host.is_running("slide"));
        assert_eq!(*values.borrow().last().unwrap(), 100.0);
        assert_eq!(values.borrow().len(), 5);
        assert_eq!(finished.get(), 1);

        let events: Vec<_> = host.drain_events().collect();
        assert_eq!(events, vec![TimelineEvent::Finished { run_id: id, key: "slide".into() }]);

        host.update(16.0);
        assert_eq!(finished.get(), 1);
    }

    #[test]
    fn test_last_sample_is_exactly_one() {
        let mut host = TimelineHost::new();
        let (anim, values) = recording(0.0, 1.0);
        // 100 / 16 does not divide evenly
        host.start_timed("uneven", anim, TimedOptions::new(100.0)).unwrap();
        for _ in 0..10 {
            host.update(16.0);
        }
        let values = values.borrow();
        assert_eq!(values.len(), 8);
        assert_eq!(*values.last().unwrap(), 1.0);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut host = TimelineHost::new();
        let (anim, values) = recording(3.0, 7.0);
        host.start_timed("instant", anim, TimedOptions::new(0.0)).unwrap();
        assert!(host.is_running("instant"));
        host.update(16.0);
        assert!(!host.is_running("instant"));
        assert_eq!(*values.borrow(), vec![3.0, 7.0]);
    }

    #[test]
    fn test_restart_aborts_previous_without_finish() {
        let mut host = TimelineHost::new();
        let finished = Rc::new(Cell::new(false));
        let flag = finished.clone();
        let (first, _) = recording(0.0, 1.0);
        let first = first.on_finished(move || flag.set(true));

        let first_id = host.start_timed("menu", first, TimedOptions::new(160.0)).unwrap();
        host.update(32.0);
        let (second, _) = recording(1.0, 0.0);
        let second_id = host.start_timed("menu", second, TimedOptions::new(160.0)).unwrap();

        assert!(!finished.get());
        assert_eq!(host.active_count(), 1);
        assert_eq!(host.run_id("menu"), Some(second_id));

        let events: Vec<_> = host.drain_events().collect();
        assert_eq!(events.len(), 3);
        assert!(events[1].is_aborted());
        assert_eq!(events[1].run_id(), first_id);
    }

    #[test]
    fn test_abort_then_restart_is_continuous() {
        let element = Rc::new(Cell::new(0.0));
        let mut host = TimelineHost::new();

        let sink = element.clone();
        let open = Animation::new(0.0, 100.0, EasingFunction::Linear, move |v| sink.set(v));
        host.start_timed("offset", open, TimedOptions::new(160.0)).unwrap();
        host.update(48.0);
        let observed = element.get();
        assert!(approx_eq(observed, 30.0));

        let live = host.live_value("offset").unwrap();
        assert!(host.abort("offset", AbortMode::Discard));
        assert_eq!(element.get(), observed);

        let sink = element.clone();
        let close = Animation::new(live, 0.0, EasingFunction::CubicOut, move |v| sink.set(v));
        host.start_timed("offset", close, TimedOptions::new(160.0)).unwrap();
        assert_eq!(element.get(), observed);
    }

    #[test]
    fn test_abort_complete_fires_finish() {
        let mut host = TimelineHost::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = order.clone();
        let o2 = order.clone();
        let (leaf, values) = recording(0.0, 10.0);
        let group = AnimationGroup::new()
            .with_full(leaf.on_finished(move || o1.borrow_mut().push("leaf")))
            .on_finished(move || o2.borrow_mut().push("group"));

        host.start_timed("popup", group, TimedOptions::new(200.0)).unwrap();
        host.update(16.0);
        assert!(host.abort("popup", AbortMode::Complete));
        assert_eq!(*values.borrow().last().unwrap(), 10.0);
        assert_eq!(*order.borrow(), vec!["leaf", "group"]);
        assert!(host.drain_events().last().unwrap().is_finished());
        assert!(!host.abort("popup", AbortMode::Complete));
    }

    #[test]
    fn test_repeat_until_disabled() {
        let mut host = TimelineHost::new();
        let finished = Rc::new(Cell::new(0));
        let counter = finished.clone();
        let (anim, _) = recording(0.0, 1.0);
        let anim = anim.on_finished(move || counter.set(counter.get() + 1));

        host.start_timed("pulse", anim, TimedOptions::new(32.0).repeat(true)).unwrap();
        host.update(32.0);
        host.update(32.0);
        assert!(host.is_running("pulse"));
        assert_eq!(finished.get(), 0);
        let iterations = host
            .drain_events()
            .filter(|e| matches!(e, TimelineEvent::Iteration { .. }))
            .count();
        assert_eq!(iterations, 2);

        assert!(host.set_repeat("pulse", false));
        host.update(32.0);
        assert!(!host.is_running("pulse"));
        assert_eq!(finished.get(), 1);
        assert!(!host.set_repeat("pulse", true));
    }

    #[test]
    fn test_abort_all_in_start_order() {
        let mut host = TimelineHost::new();
        for key in ["a", "b", "c"] {
            let (anim, _) = recording(0.0, 1.0);
            host.start_timed(key, anim, TimedOptions::new(100.0)).unwrap();
        }
        host.drain_events().for_each(drop);
        host.abort_all(AbortMode::Discard);
        assert!(!host.has_active());
        let keys: Vec<String> = host.drain_events().map(|e| e.key().to_string()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_interactive_drive() {
        let (anim, values) = recording(-280.0, 0.0);
        let mut drive = InteractiveDrive::new(anim, 280.0).unwrap();

        assert!(approx_eq(drive.drive(70.0), 0.25));
        assert!(approx_eq(*values.borrow().last().unwrap(), -210.0));
        assert_eq!(drive.drive(-50.0), 0.0);
        assert_eq!(drive.drive(1000.0), 1.0);
        assert_eq!(drive.live_value(), Some(0.0));

        assert!(InteractiveDrive::new(recording(0.0, 1.0).0, 0.0).is_err());
        assert!(InteractiveDrive::new(recording(0.0, 1.0).0, f64::NAN).is_err());
    }

    #[test]
    fn test_interactive_negative_reference() {
        let (anim, _) = recording(0.0, -200.0);
        let mut drive = InteractiveDrive::new(anim, -200.0).unwrap();
        assert!(approx_eq(drive.drive(-50.0), 0.25));
        assert!(approx_eq(drive.live_value().unwrap(), -50.0));
        assert_eq!(drive.drive(30.0), 0.0);
    }

    #[test]
    fn test_interactive_handoff_to_timed() {
        let value = Rc::new(Cell::new(0.0));
        let sink = value.clone();
        let mut drive = InteractiveDrive::new(
            Animation::new(0.0, 300.0, EasingFunction::Linear, move |v| sink.set(v)),
            300.0,
        )
        .unwrap();
        drive.drive(120.0);
        let live = drive.live_value().unwrap();
        drop(drive.into_timeline());

        let mut host = TimelineHost::new();
        let sink = value.clone();
        let settle = Animation::new(live, 300.0, EasingFunction::Linear, move |v| sink.set(v));
        host.start_timed("settle", settle, TimedOptions::new(64.0)).unwrap();
        assert_eq!(value.get(), live);
        assert!(approx_eq(live, 120.0));
        host.update(64.0);
        assert!(approx_eq(value.get(), 300.0));
    }
}
