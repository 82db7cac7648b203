#![forbid(unsafe_code)]

//! Core: finger model, per-finger constraint remapping, and value smoothing.
//!
//! Everything in this crate is plain data plus frame-driven state. The blend
//! graph lives in `handpose-blend`; orchestration lives in `handpose-runtime`.

pub mod animation;
pub mod constraint;
pub mod finger;
pub mod logging;

pub use animation::driver::{DriverConfig, ExecutionMode, SmootherDriver, SmootherId};
pub use animation::events::SmootherEvent;
pub use animation::{Animation, Easing, ValueSmoother};
pub use constraint::{FingerConstraint, PoseConstraintSet};
pub use finger::{FINGER_COUNT, Finger, FingerSet, FingerValues, HandSide};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, trace_span};
