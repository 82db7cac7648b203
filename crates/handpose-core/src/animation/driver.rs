#![forbid(unsafe_code)]

//! Per-frame smoother driver.
//!
//! A [`SmootherDriver`] owns a set of [`ValueSmoother`]s addressed by
//! [`SmootherId`] handles. Writing a target registers the smoother; each
//! [`tick`](SmootherDriver::tick) advances every registered smoother and
//! deregisters the ones that finished. All smoothers share the driver's rate,
//! but each tracks its own progress.
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use handpose_core::animation::driver::{DriverConfig, SmootherDriver};
//!
//! let mut driver = SmootherDriver::new(DriverConfig::default());
//! let weight = driver.spawn(0.0);
//! driver.set_target(weight, 1.0);
//! driver.tick(Duration::from_millis(16));
//! for event in driver.drain_events() {
//!     // apply event.value() to whatever `weight` drives
//! }
//! ```
//!
//! # Execution modes
//!
//! In [`ExecutionMode::Live`] targets are tweened. In
//! [`ExecutionMode::Editing`] a target write lands immediately and queues a
//! single `Changed` event, so authored previews update without a running
//! frame loop.
//!
//! # Failure Modes
//!
//! - Unknown or released id in `set_target`: ignored.
//! - Released while registered: the next tick reports `Completed` and
//!   deregisters it.

use std::time::Duration;

use super::events::SmootherEvent;
use super::{Animation, DEFAULT_RATE, Easing, ValueSmoother};

/// Handle to a smoother owned by a [`SmootherDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SmootherId(u32);

impl SmootherId {
    /// Slot index inside the owning driver.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether target writes are tweened or applied at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExecutionMode {
    /// Running: targets interpolate over frames.
    #[default]
    Live,
    /// Not running (authoring): targets apply immediately.
    Editing,
}

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// Tween progress per second shared by every smoother.
    /// Default: 2.0 (a full tween takes 500ms)
    pub rate: f32,
    /// Multiplier applied to each tick's delta time.
    /// Default: 1.0
    pub time_scale: f32,
    /// Curve applied to tween progress.
    /// Default: linear
    pub easing: Easing,
    /// Initial execution mode.
    pub mode: ExecutionMode,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            time_scale: 1.0,
            easing: Easing::Linear,
            mode: ExecutionMode::Live,
        }
    }
}

impl DriverConfig {
    #[must_use]
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
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
}

#[derive(Debug, Clone)]
struct Slot {
    /// `None` once released.
    smoother: Option<ValueSmoother>,
    registered: bool,
}

/// Owns smoothers and advances them once per frame.
#[derive(Debug, Clone)]
pub struct SmootherDriver {
    config: DriverConfig,
    slots: Vec<Slot>,
    /// Registered smoothers in registration order.
    active: Vec<SmootherId>,
    events: Vec<SmootherEvent>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl SmootherDriver {
    /// Create an empty driver.
    #[must_use]
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            active: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Create an idle smoother at `initial`.
    pub fn spawn(&mut self, initial: f32) -> SmootherId {
        let id = SmootherId(self.slots.len() as u32);
        let smoother =
            ValueSmoother::new(initial, self.config.rate).easing(self.config.easing.function());
        self.slots.push(Slot {
            smoother: Some(smoother),
            registered: false,
        });
        id
    }

    /// Release a smoother. Its handle stays invalid for the driver's lifetime.
    pub fn release(&mut self, id: SmootherId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.smoother = None;
            crate::trace!(id = id.index(), "released smoother");
        }
    }
}

impl Default for SmootherDriver {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

impl SmootherDriver {
    /// Point smoother `id` at `target`.
    ///
    /// Live: restarts its tween from the current value and registers it.
    /// Editing: applies `target` immediately and queues one `Changed`.
    pub fn set_target(&mut self, id: SmootherId, target: f32) {
        let mode = self.config.mode;
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return;
        };
        let Some(smoother) = slot.smoother.as_mut() else {
            return;
        };
        match mode {
            ExecutionMode::Live => {
                smoother.set_target(target);
                if !slot.registered {
                    slot.registered = true;
                    self.active.push(id);
                }
            }
            ExecutionMode::Editing => {
                smoother.snap(target);
                self.events.push(SmootherEvent::Changed { id, value: target });
            }
        }
    }

    /// Advance every registered smoother by `dt` scaled by the time scale.
    pub fn tick(&mut self, dt: Duration) {
        if self.active.is_empty() {
            return;
        }
        let span = crate::trace_span!("smoother_tick", active = self.active.len());
        let _guard = span.enter();
        let scale = if self.config.time_scale.is_finite() {
            self.config.time_scale.max(0.0)
        } else {
            1.0
        };
        // Saturate rather than overflow on huge scales.
        let scaled =
            Duration::try_from_secs_f32(dt.as_secs_f32() * scale).unwrap_or(Duration::MAX);

        let slots = &mut self.slots;
        let events = &mut self.events;
        self.active.retain(|&id| {
            let Some(slot) = slots.get_mut(id.index()) else {
                events.push(SmootherEvent::Completed { id });
                return false;
            };
            let Some(smoother) = slot.smoother.as_mut() else {
                slot.registered = false;
                events.push(SmootherEvent::Completed { id });
                return false;
            };
            smoother.tick(scaled);
            events.push(SmootherEvent::Changed {
                id,
                value: smoother.value(),
            });
            if smoother.is_complete() {
                slot.registered = false;
                events.push(SmootherEvent::Completed { id });
                return false;
            }
            true
        });
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<SmootherEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    /// Switch between tweened and immediate writes.
    pub fn set_mode(&mut self, mode: ExecutionMode) {
        if self.config.mode != mode {
            crate::debug!(?mode, "smoother driver mode changed");
        }
        self.config.mode = mode;
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl SmootherDriver {
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.config.mode
    }

    /// Shared progress rate.
    #[must_use]
    pub fn rate(&self) -> f32 {
        self.config.rate
    }

    /// The smoother behind `id`, if it has not been released.
    #[must_use]
    pub fn get(&self, id: SmootherId) -> Option<&ValueSmoother> {
        self.slots.get(id.index()).and_then(|s| s.smoother.as_ref())
    }

    /// Current value of smoother `id`.
    #[must_use]
    pub fn value(&self, id: SmootherId) -> Option<f32> {
        self.get(id).map(Animation::value)
    }

    /// Whether `id` is registered for ticking.
    #[must_use]
    pub fn is_active(&self, id: SmootherId) -> bool {
        self.slots.get(id.index()).is_some_and(|s| s.registered)
    }

    /// Number of registered smoothers.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of smoothers ever spawned, released ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_250: Duration = Duration::from_millis(250);
    const MS_500: Duration = Duration::from_millis(500);

    fn completions(events: &[SmootherEvent], id: SmootherId) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SmootherEvent::Completed { id: i } if *i == id))
            .count()
    }

    #[test]
    fn spawn_is_idle() {
        let mut driver = SmootherDriver::default();
        let id = driver.spawn(0.3);
        assert!(!driver.is_active(id));
        assert_eq!(driver.value(id), Some(0.3));
        driver.tick(MS_100);
        assert!(driver.drain_events().is_empty());
    }

    #[test]
    fn set_target_registers_once() {
        let mut driver = SmootherDriver::default();
        let id = driver.spawn(0.0);
        driver.set_target(id, 1.0);
        driver.set_target(id, 0.5);
        assert!(driver.is_active(id));
        assert_eq!(driver.active_count(), 1);
    }

    #[test]
    fn tick_emits_changed_then_completed_once() {
        let mut driver = SmootherDriver::new(DriverConfig::default().with_rate(2.0));
        let id = driver.spawn(0.0);
        driver.set_target(id, 1.0);

        driver.tick(MS_250);
        let events = driver.drain_events();
        assert_eq!(events.len(), 1);
        assert!((events[0].value().unwrap() - 0.5).abs() < 1e-4);

        driver.tick(MS_250);
        let events = driver.drain_events();
        assert_eq!(events[0], SmootherEvent::Changed { id, value: 1.0 });
        assert_eq!(completions(&events, id), 1);
        assert!(!driver.is_active(id));

        driver.tick(MS_250);
        assert!(driver.drain_events().is_empty());
    }

    #[test]
    fn smoothers_track_progress_independently() {
        let mut driver = SmootherDriver::default();
        let a = driver.spawn(0.0);
        let b = driver.spawn(0.0);
        driver.set_target(a, 1.0);
        driver.tick(MS_250);
        driver.set_target(b, 1.0);
        driver.tick(MS_250);
        assert_eq!(driver.value(a), Some(1.0));
        assert!((driver.value(b).unwrap() - 0.5).abs() < 1e-4);
        assert!(!driver.is_active(a));
        assert!(driver.is_active(b));
    }

    #[test]
    fn time_scale_scales_progress() {
        let mut driver = SmootherDriver::new(DriverConfig::default().with_time_scale(0.5));
        let id = driver.spawn(0.0);
        driver.set_target(id, 1.0);
        driver.tick(MS_500);
        assert!((driver.value(id).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn huge_time_scale_saturates_instead_of_panicking() {
        let mut driver = SmootherDriver::new(DriverConfig::default().with_time_scale(1e30));
        let id = driver.spawn(0.0);
        driver.set_target(id, 1.0);
        driver.tick(MS_16);
        assert_eq!(driver.value(id), Some(1.0));
        assert!(!driver.is_active(id));
    }

    #[test]
    fn non_finite_time_scale_falls_back_to_real_time() {
        let mut driver =
            SmootherDriver::new(DriverConfig::default().with_time_scale(f32::INFINITY));
        let id = driver.spawn(0.0);
        driver.set_target(id, 1.0);
        driver.tick(Duration::from_millis(250));
        assert!((driver.value(id).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn editing_mode_applies_immediately() {
        let mut driver =
            SmootherDriver::new(DriverConfig::default().with_mode(ExecutionMode::Editing));
        let id = driver.spawn(0.0);
        driver.set_target(id, 0.8);
        assert_eq!(driver.value(id), Some(0.8));
        assert!(!driver.is_active(id));
        let events = driver.drain_events();
        assert_eq!(events, vec![SmootherEvent::Changed { id, value: 0.8 }]);
    }

    #[test]
    fn released_while_active_completes_without_change() {
        let mut driver = SmootherDriver::default();
        let id = driver.spawn(0.0);
        driver.set_target(id, 1.0);
        driver.release(id);
        driver.tick(MS_100);
        let events = driver.drain_events();
        assert_eq!(events, vec![SmootherEvent::Completed { id }]);
        assert_eq!(driver.active_count(), 0);
        assert_eq!(driver.value(id), None);
    }

    #[test]
    fn set_target_on_released_is_ignored() {
        let mut driver = SmootherDriver::default();
        let id = driver.spawn(0.0);
        driver.release(id);
        driver.set_target(id, 1.0);
        assert_eq!(driver.active_count(), 0);
    }

    #[test]
    fn drain_clears_queue() {
        let mut driver = SmootherDriver::default();
        let id = driver.spawn(0.0);
        driver.set_target(id, 1.0);
        driver.tick(MS_100);
        assert_eq!(driver.pending_event_count(), 1);
        let _ = driver.drain_events();
        assert_eq!(driver.pending_event_count(), 0);
    }
}
