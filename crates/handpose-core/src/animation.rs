#![forbid(unsafe_code)]

//! Frame-driven value smoothing.
//!
//! A [`ValueSmoother`] tweens a scalar from wherever it currently is toward a
//! target. Progress advances as `t += rate * dt`, and the value is
//! `lerp(start, target, ease(t))`. Re-targeting mid-flight restarts from the
//! current value, so repeated writes of a distant target converge
//! asymptotically rather than queueing.
//!
//! Smoothers are normally owned by a [`SmootherDriver`](driver::SmootherDriver),
//! which holds the shared rate, advances every registered smoother once per
//! frame, and reports progress as [`SmootherEvent`](events::SmootherEvent)s.

pub mod driver;
pub mod events;

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Named easing curve, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseOutCubic,
}

impl Easing {
    /// The function implementing this curve.
    #[must_use]
    pub fn function(self) -> EasingFn {
        match self {
            Easing::Linear => linear,
            Easing::EaseIn => ease_in,
            Easing::EaseOut => ease_out,
            Easing::EaseInOut => ease_in_out,
            Easing::EaseOutCubic => ease_out_cubic,
        }
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A frame-advanced animation producing a scalar.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value.
    fn value(&self) -> f32;

    /// Rewind to the start of the current play-through.
    fn reset(&mut self);

    /// Time elapsed past completion. Returns [`Duration::ZERO`] while running.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// ValueSmoother
// ---------------------------------------------------------------------------

/// Default smoothing rate: a full tween takes half a second.
pub const DEFAULT_RATE: f32 = 2.0;

/// Rate-driven tween of one scalar.
///
/// A freshly created smoother is idle (complete) at its initial value.
#[derive(Debug, Clone, Copy)]
pub struct ValueSmoother {
    start: f32,
    target: f32,
    value: f32,
    /// Normalized progress; may exceed 1.0 once complete.
    t: f32,
    rate: f32,
    easing: EasingFn,
}

impl ValueSmoother {
    /// Create an idle smoother at `initial`, advancing at `rate` per second.
    ///
    /// Non-finite or non-positive rates fall back to [`DEFAULT_RATE`].
    #[must_use]
    pub fn new(initial: f32, rate: f32) -> Self {
        Self {
            start: initial,
            target: initial,
            value: initial,
            t: 1.0,
            rate: if rate.is_finite() && rate > 0.0 {
                rate
            } else {
                DEFAULT_RATE
            },
            easing: linear,
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Begin a new tween from the current value toward `target`.
    ///
    /// Any tween in flight is truncated.
    pub fn set_target(&mut self, target: f32) {
        self.start = self.value;
        self.target = target;
        self.t = 0.0;
    }

    /// Jump straight to `value` with no interpolation.
    pub fn snap(&mut self, value: f32) {
        self.start = value;
        self.target = value;
        self.value = value;
        self.t = 1.0;
    }

    /// Value the current tween is heading toward.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Value at the start of the current tween.
    #[inline]
    #[must_use]
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Normalized progress of the current tween.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.t
    }

    /// Progress gained per second.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Animation for ValueSmoother {
    fn tick(&mut self, dt: Duration) {
        if self.is_complete() {
            return;
        }
        self.t += self.rate * dt.as_secs_f32();
        if self.t >= 1.0 {
            self.value = self.target;
        } else {
            let k = (self.easing)(self.t);
            self.value = self.start + (self.target - self.start) * k;
        }
    }

    fn is_complete(&self) -> bool {
        self.t >= 1.0
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn reset(&mut self) {
        self.t = 0.0;
        self.value = self.start;
    }

    fn overshoot(&self) -> Duration {
        if self.t > 1.0 {
            Duration::try_from_secs_f32((self.t - 1.0) / self.rate).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
