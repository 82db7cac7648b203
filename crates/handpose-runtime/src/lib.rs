#![forbid(unsafe_code)]

//! Runtime orchestration for one or two hands.
//!
//! A [`HandPoseController`] owns everything a single hand needs: the pose
//! mixer built from a [`HandDataSet`](handpose_blend::HandDataSet), the live
//! finger values, the active constraint set, a [`FingerValueSource`] to read
//! from, and an [`EvaluationBackend`] that turns the graph into a
//! [`SkeletalPose`](handpose_blend::SkeletalPose). The host calls
//! [`HandPoseController::tick`] once per frame.
//!
//! [`PoseConstraintCoordinator`] applies authored constraint sets to hands
//! through the [`ConstrainedHand`] trait.

pub mod backend;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod source;

pub use backend::{EvaluationBackend, GraphBackend};
pub use config::ControllerConfig;
pub use controller::{ControllerState, HandPoseController};
pub use coordinator::{ConstrainedHand, ConstraintMode, PoseConstraintCoordinator};
pub use error::InitError;
pub use source::{FingerValueSource, FixedFingerSource, FnFingerSource};
