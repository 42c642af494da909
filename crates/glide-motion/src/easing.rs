//! Easing functions for animation timing.
//!
//! Two families are provided:
//! - CSS timing functions (`Ease`, `EaseIn`, `EaseOut`, `EaseInOut`, custom
//!   cubic bezier, steps)
//! - The mobile toolkit set (`SinIn`, `CubicOut`, `BounceOut`, `SpringIn`, ...)
//!   used by the flyout, carousel and popup surfaces
//!
//! # Usage
//!
//! ```
//! use glide_motion::easing::EasingFunction;
//!
//! let ease = EasingFunction::CubicOut;
//! let progress = ease.evaluate(0.5);
//! assert!(progress > 0.5);
//!
//! let named: EasingFunction = "sin_in_out".parse().unwrap();
//! assert_eq!(named, EasingFunction::SinInOut);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

use crate::error::MotionError;

/// Overshoot used by the spring easings.
const SPRING_OVERSHOOT: f64 = 1.70158;

/// Position for stepped animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval.
    Start,
    /// Jump at the end of each interval.
    #[default]
    End,
}

/// Easing function for animation timing.
///
/// Maps linear progress in `[0, 1]` to eased progress. Input is clamped;
/// output may leave `[0, 1]` for bezier and spring curves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing.
    #[default]
    Linear,

    /// CSS `ease`, `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// CSS `ease-in`, `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out`, `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out`, `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve. x values must be in [0, 1].
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// Discrete jumps. `count` must be >= 1.
    Steps { count: u32, position: StepPosition },

    SinIn,
    SinOut,
    SinInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    BounceIn,
    BounceOut,
    /// Pulls back before accelerating forward.
    SpringIn,
    /// Overshoots the target before settling.
    SpringOut,
}

impl EasingFunction {
    /// Evaluate the easing function at the given progress.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match *self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
            Self::Steps { count, position } => stepped(count, position, t),
            Self::SinIn => 1.0 - (t * PI / 2.0).cos(),
            Self::SinOut => (t * PI / 2.0).sin(),
            Self::SinInOut => -(t * PI).cos() / 2.0 + 0.5,
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    (t * 2.0).powi(3) / 2.0
                } else {
                    ((t - 1.0) * 2.0).powi(3) / 2.0 + 1.0
                }
            }
            Self::BounceIn => 1.0 - bounce_out(1.0 - t),
            Self::BounceOut => bounce_out(t),
            Self::SpringIn => t * t * ((SPRING_OVERSHOOT + 1.0) * t - SPRING_OVERSHOOT),
            Self::SpringOut => {
                let u = t - 1.0;
                u * u * ((SPRING_OVERSHOOT + 1.0) * u + SPRING_OVERSHOOT) + 1.0
            }
        }
    }

    /// Create a custom cubic bezier easing function.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, MotionError> {
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(MotionError::InvalidEasing(format!(
                "bezier x values must be in [0, 1], got {} and {}",
                x1, x2
            )));
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// Create a stepped easing function.
    pub fn steps(count: u32, position: StepPosition) -> Result<Self, MotionError> {
        if count == 0 {
            return Err(MotionError::InvalidEasing("steps must be at least 1".into()));
        }
        Ok(Self::Steps { count, position })
    }

    /// Name accepted by [`FromStr`], `None` for parameterized curves.
    pub fn name(&self) -> Option<&'static str> {
        NAMED
            .iter()
            .find(|(_, easing)| easing == self)
            .map(|(name, _)| *name)
    }
}

const NAMED: &[(&str, EasingFunction)] = &[
    ("linear", EasingFunction::Linear),
    ("ease", EasingFunction::Ease),
    ("ease_in", EasingFunction::EaseIn),
    ("ease_out", EasingFunction::EaseOut),
    ("ease_in_out", EasingFunction::EaseInOut),
    ("sin_in", EasingFunction::SinIn),
    ("sin_out", EasingFunction::SinOut),
    ("sin_in_out", EasingFunction::SinInOut),
    ("cubic_in", EasingFunction::CubicIn),
    ("cubic_out", EasingFunction::CubicOut),
    ("cubic_in_out", EasingFunction::CubicInOut),
    ("bounce_in", EasingFunction::BounceIn),
    ("bounce_out", EasingFunction::BounceOut),
    ("spring_in", EasingFunction::SpringIn),
    ("spring_out", EasingFunction::SpringOut),
];

impl FromStr for EasingFunction {
    type Err = MotionError;

    /// Parse a snake_case easing name. Dashes are accepted in place of
    /// underscores and matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        NAMED
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, easing)| *easing)
            .ok_or_else(|| MotionError::InvalidEasing(format!("unknown easing '{}'", s)))
    }
}

/// Evaluate a cubic bezier curve at time t.
///
/// Newton-Raphson finds the curve parameter for the input x, then the y
/// coordinate at that parameter is returned.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_y(y1, y2, t)
}

fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_x(x1, x2, t) - target_x;
        if x.abs() < 1e-7 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-7 {
            break;
        }

        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }

    t
}

/// x(t) = 3(1-t)²t·x1 + 3(1-t)t²·x2 + t³
#[inline]
fn bezier_x(x1: f64, x2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

#[inline]
fn bezier_y(y1: f64, y2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f64, x2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn stepped(steps: u32, position: StepPosition, t: f64) -> f64 {
    if steps == 0 {
        return t;
    }

    let steps_f = steps as f64;

    match position {
        StepPosition::Start => (t * steps_f).ceil() / steps_f,
        StepPosition::End => (t * steps_f).floor() / steps_f,
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    const ALL_NAMED: [EasingFunction; 15] = [
        EasingFunction::Linear,
        EasingFunction::Ease,
        EasingFunction::EaseIn,
        EasingFunction::EaseOut,
        EasingFunction::EaseInOut,
        EasingFunction::SinIn,
        EasingFunction::SinOut,
        EasingFunction::SinInOut,
        EasingFunction::CubicIn,
        EasingFunction::CubicOut,
        EasingFunction::CubicInOut,
        EasingFunction::BounceIn,
        EasingFunction::BounceOut,
        EasingFunction::SpringIn,
        EasingFunction::SpringOut,
    ];

    #[test]
    fn test_linear() {
        let ease = EasingFunction::Linear;
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.25), 0.25));
        assert!(approx_eq(ease.evaluate(0.75), 0.75));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_all_named_hit_endpoints() {
        for easing in ALL_NAMED {
            assert!(approx_eq(easing.evaluate(0.0), 0.0), "{:?} at 0", easing);
            assert!(approx_eq(easing.evaluate(1.0), 1.0), "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_ease_in_out_symmetry() {
        for easing in [EasingFunction::EaseInOut, EasingFunction::SinInOut, EasingFunction::CubicInOut] {
            assert!(approx_eq(easing.evaluate(0.5), 0.5), "{:?}", easing);
            let early = easing.evaluate(0.25);
            let late = easing.evaluate(0.75);
            assert!(approx_eq(early + late, 1.0), "{:?}", easing);
        }
    }

    #[test]
    fn test_in_and_out_shapes() {
        assert!(EasingFunction::CubicIn.evaluate(0.5) < 0.5);
        assert!(EasingFunction::CubicOut.evaluate(0.5) > 0.5);
        assert!(EasingFunction::SinIn.evaluate(0.25) < 0.25);
        assert!(EasingFunction::SinOut.evaluate(0.25) > 0.25);
        assert!(EasingFunction::EaseIn.evaluate(0.25) < 0.25);
        assert!(EasingFunction::EaseOut.evaluate(0.25) > 0.25);
    }

    #[test]
    fn test_spring_overshoots() {
        assert!(EasingFunction::SpringIn.evaluate(0.2) < 0.0);
        let peak = (1..100)
            .map(|i| EasingFunction::SpringOut.evaluate(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_bounce_stays_in_range() {
        for i in 0..=100 {
            let v = EasingFunction::BounceOut.evaluate(i as f64 / 100.0);
            assert!((-EPSILON..=1.0 + EPSILON).contains(&v), "bounce_out({}) = {}", i, v);
        }
        assert!(approx_eq(
            EasingFunction::BounceIn.evaluate(0.3),
            1.0 - EasingFunction::BounceOut.evaluate(0.7)
        ));
    }

    #[test]
    fn test_custom_bezier() {
        let linear_bezier = EasingFunction::cubic_bezier(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(approx_eq(linear_bezier.evaluate(0.5), 0.5));

        assert!(EasingFunction::cubic_bezier(-0.1, 0.0, 0.5, 1.0).is_err());
        assert!(EasingFunction::cubic_bezier(0.5, 0.0, 1.5, 1.0).is_err());
    }

    #[test]
    fn test_steps() {
        let end = EasingFunction::steps(4, StepPosition::End).unwrap();
        assert!(approx_eq(end.evaluate(0.24), 0.0));
        assert!(approx_eq(end.evaluate(0.25), 0.25));
        assert!(approx_eq(end.evaluate(0.99), 0.75));
        assert!(approx_eq(end.evaluate(1.0), 1.0));

        let start = EasingFunction::steps(4, StepPosition::Start).unwrap();
        assert!(approx_eq(start.evaluate(0.01), 0.25));
        assert!(approx_eq(start.evaluate(0.76), 1.0));

        assert!(EasingFunction::steps(0, StepPosition::End).is_err());
    }

    #[test]
    fn test_clamping() {
        let ease = EasingFunction::CubicOut;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
        assert!(approx_eq(ease.evaluate(f64::NAN), 0.0));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("cubic_out".parse::<EasingFunction>().unwrap(), EasingFunction::CubicOut);
        assert_eq!("Sin-In-Out".parse::<EasingFunction>().unwrap(), EasingFunction::SinInOut);
        assert!("wobble".parse::<EasingFunction>().is_err());

        for easing in ALL_NAMED {
            let name = easing.name().unwrap();
            assert_eq!(name.parse::<EasingFunction>().unwrap(), easing);
        }
        assert_eq!(EasingFunction::Steps { count: 2, position: StepPosition::End }.name(), None);
    }

    #[test]
    fn test_default() {
        assert_eq!(EasingFunction::default(), EasingFunction::Linear);
        assert_eq!(StepPosition::default(), StepPosition::End);
    }
}
