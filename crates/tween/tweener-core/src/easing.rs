//! Easing functions: `f: [0,1] -> [0,1]` with `f(0) = 0` and `f(1) = 1`.

use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TweenError;

/// Shared handle to an easing curve.
///
/// Cloning is cheap; the same curve can back any number of animations.
#[derive(Clone)]
pub struct EasingFunction(Rc<dyn Fn(f64) -> f64>);

impl EasingFunction {
    pub fn new(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        (self.0)(t)
    }
}

impl fmt::Debug for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EasingFunction(..)")
    }
}

impl Default for EasingFunction {
    fn default() -> Self {
        Easing::default().into()
    }
}

impl From<Easing> for EasingFunction {
    fn from(easing: Easing) -> Self {
        Self::new(move |t| easing.apply(t))
    }
}

/// Built-in easing presets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
}

impl Easing {
    pub const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
    ];

    /// Evaluate the curve at normalized time `t`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => t * (2.0 - t),
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "LINEAR",
            Easing::QuadraticIn => "QUADRATIC_IN",
            Easing::QuadraticOut => "QUADRATIC_OUT",
            Easing::QuadraticInOut => "QUADRATIC_IN_OUT",
            Easing::CubicIn => "CUBIC_IN",
            Easing::CubicOut => "CUBIC_OUT",
            Easing::CubicInOut => "CUBIC_IN_OUT",
            Easing::SineIn => "SINE_IN",
            Easing::SineOut => "SINE_OUT",
            Easing::SineInOut => "SINE_IN_OUT",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Easing::ALL
            .into_iter()
            .find(|e| e.name() == upper)
            .ok_or_else(|| TweenError::UnknownEasing { name: s.to_string() })
    }
}
