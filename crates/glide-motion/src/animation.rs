//! Leaf animations: progress → eased value → callback.

use std::fmt;

use super::easing::EasingFunction;

/// Callback receiving the interpolated value of an animation.
pub type ValueCallback = Box<dyn FnMut(f64)>;

/// Callback run once when the owning run completes.
pub type FinishCallback = Box<dyn FnOnce()>;

/// A single animated value.
///
/// `evaluate(p)` hands `start + (end - start) * easing(p)` to the callback.
/// Apart from remembering the last value it produced, an animation keeps no
/// state between samples.
pub struct Animation {
    start: f64,
    end: f64,
    easing: EasingFunction,
    callback: ValueCallback,
    on_finished: Option<FinishCallback>,
    last_progress: Option<f64>,
    last_value: Option<f64>,
}

impl Animation {
    /// Create an animation from `start` to `end`.
    pub fn new(start: f64, end: f64, easing: EasingFunction, callback: impl FnMut(f64) + 'static) -> Self {
        Self {
            start,
            end,
            easing,
            callback: Box::new(callback),
            on_finished: None,
            last_progress: None,
            last_value: None,
        }
    }

    /// Attach a callback fired once when the run that drives this animation
    /// completes.
    pub fn on_finished(mut self, finished: impl FnOnce() + 'static) -> Self {
        self.on_finished = Some(Box::new(finished));
        self
    }

    /// The value this animation produces at `progress`, without side effects.
    pub fn value_at(&self, progress: f64) -> f64 {
        self.start + (self.end - self.start) * self.easing.evaluate(progress)
    }

    /// Compute the value at `progress` and pass it to the callback.
    pub fn evaluate(&mut self, progress: f64) {
        let value = self.value_at(progress);
        self.last_progress = Some(progress);
        self.last_value = Some(value);
        (self.callback)(value);
    }

    /// Apply the progress-1 sample when it is missing, or always when
    /// `force` is set. Returns whether a sample was applied.
    pub(crate) fn settle(&mut self, force: bool) -> bool {
        if force || self.last_progress != Some(1.0) {
            self.evaluate(1.0);
            true
        } else {
            false
        }
    }

    /// Fire the finish callback. It fires at most once.
    pub(crate) fn fire_finished(&mut self) {
        if let Some(finished) = self.on_finished.take() {
            finished();
        }
    }

    /// Last value handed to the callback, if any.
    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    pub fn start_value(&self) -> f64 {
        self.start
    }

    pub fn end_value(&self) -> f64 {
        self.end
    }

    pub fn easing(&self) -> EasingFunction {
        self.easing
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("easing", &self.easing)
            .field("last_value", &self.last_value)
            .field("has_finish", &self.on_finished.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Timeline;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn recording(start: f64, end: f64, easing: EasingFunction) -> (Animation, Rc<RefCell<Vec<f64>>>) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = values.clone();
        let anim = Animation::new(start, end, easing, move |v| sink.borrow_mut().push(v));
        (anim, values)
    }

    #[test]
    fn test_evaluate_matches_formula() {
        for easing in [EasingFunction::Linear, EasingFunction::CubicOut, EasingFunction::SpringIn] {
            let (mut anim, values) = recording(-40.0, 260.0, easing);
            for i in 0..=20 {
                let p = i as f64 / 20.0;
                anim.evaluate(p);
                let expected = -40.0 + (260.0 - -40.0) * easing.evaluate(p);
                assert_eq!(*values.borrow().last().unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_last_value_tracks_samples() {
        let (mut anim, _) = recording(0.0, 100.0, EasingFunction::Linear);
        assert_eq!(anim.last_value(), None);
        anim.evaluate(0.3);
        assert!((anim.last_value().unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_complete_fires_finish_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let (anim, values) = recording(0.0, 1.0, EasingFunction::Linear);
        let mut timeline: Timeline = anim.on_finished(move || counter.set(counter.get() + 1)).into();

        timeline.evaluate(0.5);
        timeline.complete();
        timeline.complete();

        assert_eq!(fired.get(), 1);
        assert_eq!(*values.borrow(), vec![0.5, 1.0]);
    }

    #[test]
    fn test_settle_skips_duplicate_final_sample() {
        let (mut anim, values) = recording(0.0, 1.0, EasingFunction::Linear);
        anim.evaluate(1.0);
        assert!(!anim.settle(false));
        assert_eq!(values.borrow().len(), 1);

        assert!(anim.settle(true));
        assert_eq!(*values.borrow(), vec![1.0, 1.0]);
    }
}
