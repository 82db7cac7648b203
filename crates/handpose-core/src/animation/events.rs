#![forbid(unsafe_code)]

//! Smoother progress events.
//!
//! The [`SmootherDriver`](super::driver::SmootherDriver) queues events while
//! ticking instead of invoking closures; the owner drains them after the tick
//! and applies the new values wherever they belong.
//!
//! # Invariants
//!
//! 1. Every step of a running tween yields exactly one `Changed`.
//! 2. `Completed` fires once per tween, on the step that reaches the target.
//! 3. A smoother released mid-tween yields `Completed` without `Changed`.
//! 4. Draining clears the queue; events are never replayed.

use super::driver::SmootherId;

/// Something that happened to a driven smoother during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmootherEvent {
    /// The smoother produced a new value.
    Changed { id: SmootherId, value: f32 },
    /// The smoother reached its target and was deregistered.
    Completed { id: SmootherId },
}

impl SmootherEvent {
    /// The smoother this event refers to.
    #[must_use]
    pub fn id(&self) -> SmootherId {
        match *self {
            SmootherEvent::Changed { id, .. } | SmootherEvent::Completed { id } => id,
        }
    }

    /// The new value, for `Changed` events.
    #[must_use]
    pub fn value(&self) -> Option<f32> {
        match *self {
            SmootherEvent::Changed { value, .. } => Some(value),
            SmootherEvent::Completed { .. } => None,
        }
    }
}
