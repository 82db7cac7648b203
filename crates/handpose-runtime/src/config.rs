#![forbid(unsafe_code)]

//! Controller configuration.

use handpose_blend::{DEFAULT_HYSTERESIS, MixerConfig};
use handpose_core::animation::DEFAULT_RATE;
use handpose_core::{DriverConfig, Easing, ExecutionMode};
use serde::{Deserialize, Serialize};

/// Tuning for one [`HandPoseController`](crate::HandPoseController).
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Tween progress per second for finger channels.
    /// Default: 2.0 (half a second per full tween)
    pub smoothing_rate: f32,
    /// Dead band for finger writes.
    /// Default: 0.01
    pub hysteresis: f32,
    /// Multiplier applied to every tick's `dt`.
    /// Default: 1.0
    pub time_scale: f32,
    /// Default: linear
    pub easing: Easing,
    /// Live tweens, or immediate application while authoring.
    pub mode: ExecutionMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            smoothing_rate: DEFAULT_RATE,
            hysteresis: DEFAULT_HYSTERESIS,
            time_scale: 1.0,
            easing: Easing::Linear,
            mode: ExecutionMode::Live,
        }
    }
}

impl ControllerConfig {
    #[must_use]
    pub fn with_smoothing_rate(mut self, rate: f32) -> Self {
        self.smoothing_rate = rate;
        self
    }

    #[must_use]
    pub fn with_hysteresis(mut self, hysteresis: f32) -> Self {
        self.hysteresis = hysteresis;
        self
    }

    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Mixer settings derived from this configuration.
    #[must_use]
    pub fn mixer_config(&self) -> MixerConfig {
        MixerConfig::default()
            .with_hysteresis(self.hysteresis)
            .with_driver(
                DriverConfig::default()
                    .with_rate(self.smoothing_rate)
                    .with_time_scale(self.time_scale)
                    .with_easing(self.easing)
                    .with_mode(self.mode),
            )
    }
}
