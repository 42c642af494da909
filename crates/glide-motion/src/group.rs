//! Time-remapped animation groups.
//!
//! A group owns entries, each bound to a `[start, end]` window of the
//! parent's progress. Entries may overlap and nest, which lets one driver run
//! multi-phase timelines (fade during the first third, slide throughout).
//!
//! ```text
//! progress   0 ──────────── 0.33 ─────────────────── 1
//! fade       [==== 0→1 ====)
//! slide      [=================== 0→1 ==============]
//! ```
//!
//! Windows are half-open: an entry is advanced while `start <= p < end`, and
//! the terminal sample `p == 1` also belongs to windows ending at 1. Outside
//! its window an entry is skipped, so the last value it applied persists.
//! The remaining final samples and every finish callback are delivered by
//! [`Timeline::complete`] when the run ends. Final samples are applied in
//! order of window end, so when consecutive windows drive the same property
//! the latest window has the last word.

use std::fmt;

use super::animation::{Animation, FinishCallback};
use super::error::{MotionError, Result};

/// A validated `[start, end]` sub-window of the parent progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    start: f64,
    end: f64,
}

impl Window {
    /// The whole parent range.
    pub const FULL: Window = Window { start: 0.0, end: 1.0 };

    /// Create a window, rejecting anything outside `0 <= start <= end <= 1`.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        let valid = start.is_finite()
            && end.is_finite()
            && (0.0..=1.0).contains(&start)
            && (0.0..=1.0).contains(&end)
            && start <= end;
        if !valid {
            return Err(MotionError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Remap parent progress into this window, `None` when outside it.
    ///
    /// A zero-width window is a step at `start`: it reports local progress 1
    /// for every `p >= start`.
    pub fn local_progress(&self, p: f64) -> Option<f64> {
        if p.is_nan() {
            return None;
        }
        if self.start == self.end {
            return (p >= self.start).then_some(1.0);
        }
        if p >= self.start && p < self.end {
            return Some(((p - self.start) / (self.end - self.start)).clamp(0.0, 1.0));
        }
        if p == 1.0 && self.end == 1.0 {
            return Some(1.0);
        }
        None
    }

    /// Map a local progress back to the parent range.
    pub fn to_parent(&self, local: f64) -> f64 {
        self.start + (self.end - self.start) * local.clamp(0.0, 1.0)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::FULL
    }
}

/// Closed set of timeline shapes: a leaf animation or a nested group.
#[derive(Debug)]
pub enum Timeline {
    Leaf(Animation),
    Group(AnimationGroup),
}

impl Timeline {
    /// Sample the timeline at `progress`.
    pub fn evaluate(&mut self, progress: f64) {
        match self {
            Self::Leaf(animation) => animation.evaluate(progress),
            Self::Group(group) => group.evaluate(progress),
        }
    }

    /// Deliver every outstanding final sample, then fire finish callbacks
    /// depth-first in entry order. Idempotent.
    pub fn complete(&mut self) {
        self.settle(false);
        self.fire_finished();
    }

    fn settle(&mut self, force: bool) -> bool {
        match self {
            Self::Leaf(animation) => animation.settle(force),
            Self::Group(group) => group.settle(force),
        }
    }

    fn fire_finished(&mut self) {
        match self {
            Self::Leaf(animation) => animation.fire_finished(),
            Self::Group(group) => group.fire_finished(),
        }
    }

    /// Last value produced by the leaf, or by the first entry of a group that
    /// has produced one.
    pub fn last_value(&self) -> Option<f64> {
        match self {
            Self::Leaf(animation) => animation.last_value(),
            Self::Group(group) => group.entries.iter().find_map(|e| e.timeline.last_value()),
        }
    }
}

impl From<Animation> for Timeline {
    fn from(animation: Animation) -> Self {
        Self::Leaf(animation)
    }
}

impl From<AnimationGroup> for Timeline {
    fn from(group: AnimationGroup) -> Self {
        Self::Group(group)
    }
}

#[derive(Debug)]
struct GroupEntry {
    window: Window,
    timeline: Timeline,
}

/// Ordered set of windowed entries driven by one progress value.
#[derive(Default)]
pub struct AnimationGroup {
    entries: Vec<GroupEntry>,
    on_finished: Option<FinishCallback>,
}

impl AnimationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry active during `[start, end]` of the group's progress.
    pub fn add(&mut self, start: f64, end: f64, timeline: impl Into<Timeline>) -> Result<&mut Self> {
        let window = Window::new(start, end)?;
        self.entries.push(GroupEntry {
            window,
            timeline: timeline.into(),
        });
        Ok(self)
    }

    /// Builder form of [`AnimationGroup::add`].
    pub fn with(mut self, start: f64, end: f64, timeline: impl Into<Timeline>) -> Result<Self> {
        self.add(start, end, timeline)?;
        Ok(self)
    }

    /// Add an entry spanning the whole group.
    pub fn with_full(mut self, timeline: impl Into<Timeline>) -> Self {
        self.entries.push(GroupEntry {
            window: Window::FULL,
            timeline: timeline.into(),
        });
        self
    }

    /// Attach a callback fired after all entries have completed.
    pub fn on_finished(mut self, finished: impl FnOnce() + 'static) -> Self {
        self.on_finished = Some(Box::new(finished));
        self
    }

    /// Advance every entry whose window contains `progress`.
    pub fn evaluate(&mut self, progress: f64) {
        for entry in &mut self.entries {
            if let Some(local) = entry.window.local_progress(progress) {
                entry.timeline.evaluate(local);
            }
        }
    }

    /// Apply final samples in ascending window-end order. Once any entry
    /// applies a new sample, every later-ending entry re-applies its own.
    fn settle(&mut self, force: bool) -> bool {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| self.entries[a].window.end.total_cmp(&self.entries[b].window.end));

        let mut applied = force;
        for index in order {
            applied |= self.entries[index].timeline.settle(applied);
        }
        applied
    }

    fn fire_finished(&mut self) {
        for entry in &mut self.entries {
            entry.timeline.fire_finished();
        }
        if let Some(finished) = self.on_finished.take() {
            finished();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Windows of the direct entries, in order.
    pub fn windows(&self) -> impl Iterator<Item = Window> + '_ {
        self.entries.iter().map(|e| e.window)
    }
}

impl fmt::Debug for AnimationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationGroup")
            .field("entries", &self.entries)
            .field("has_finish", &self.on_finished.is_some())
            .finish()
    }
}
