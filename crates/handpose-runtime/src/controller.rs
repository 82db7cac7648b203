#![forbid(unsafe_code)]

//! Per-hand pose controller.
//!
//! # State machine
//!
//! ```text
//! Uninitialized ──initialize(Some(data))──► Ready
//!       ▲                                     │
//!       └──── rebuild failure ◄── backend invalid on tick
//! ```
//!
//! # Frame
//!
//! Each [`tick`](HandPoseController::tick) while `Ready`:
//!
//! 1. rebuild if the backend reports invalid (finger values, constraints and
//!    the current pose survive);
//! 2. re-apply the stored finger values to the active pose;
//! 3. re-assert the current pose selection;
//! 4. read the source, remap through the active constraints, store, write;
//! 5. switch to the constraint set's target pose (out of range ⇒ 0);
//! 6. advance the smoothers and evaluate.
//!
//! Steps 2 and 3 keep the graph consistent with controller state even if the
//! host rebuilt it or poked it between frames.

use std::sync::Arc;
use std::time::Duration;

use handpose_blend::{HandDataSet, HandSkeleton, PoseMixer, SkeletalPose};
use handpose_core::{ExecutionMode, FingerValues, HandSide, PoseConstraintSet};

use crate::backend::EvaluationBackend;
use crate::config::ControllerConfig;
use crate::coordinator::ConstrainedHand;
use crate::error::InitError;
use crate::source::FingerValueSource;

/// Lifecycle of a [`HandPoseController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Uninitialized,
    Ready,
}

/// Drives one hand's pose graph from a finger value source.
pub struct HandPoseController {
    side: HandSide,
    config: ControllerConfig,
    state: ControllerState,
    data_set: Option<Arc<HandDataSet>>,
    /// Host rig; when set, must contain every bone the data set animates.
    target: Option<HandSkeleton>,
    mixer: Option<PoseMixer>,
    fingers: FingerValues,
    constraints: PoseConstraintSet,
    current_pose: usize,
    visible: bool,
    source: Box<dyn FingerValueSource>,
    backend: Box<dyn EvaluationBackend>,
}

impl std::fmt::Debug for HandPoseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandPoseController")
            .field("side", &self.side)
            .field("state", &self.state)
            .field("current_pose", &self.current_pose)
            .field("fingers", &self.fingers)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl HandPoseController {
    /// Create an uninitialized controller with default configuration.
    pub fn new(
        side: HandSide,
        source: impl FingerValueSource + 'static,
        backend: impl EvaluationBackend + 'static,
    ) -> Self {
        Self {
            side,
            config: ControllerConfig::default(),
            state: ControllerState::Uninitialized,
            data_set: None,
            target: None,
            mixer: None,
            fingers: FingerValues::ZERO,
            constraints: PoseConstraintSet::free(),
            current_pose: 0,
            visible: true,
            source: Box::new(source),
            backend: Box::new(backend),
        }
    }

    /// Set the configuration used by the next build (builder).
    #[must_use]
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Bind to a host rig that must cover the data set's bones (builder).
    #[must_use]
    pub fn with_target_skeleton(mut self, skeleton: HandSkeleton) -> Self {
        self.target = Some(skeleton);
        self
    }

    /// Build the pose graph from `data_set` and become `Ready`.
    ///
    /// On failure the error is logged and the controller stays (or becomes)
    /// `Uninitialized`.
    pub fn initialize(&mut self, data_set: Option<Arc<HandDataSet>>) -> Result<(), InitError> {
        let Some(data_set) = data_set else {
            tracing::error!(
                side = self.side.as_str(),
                "no hand data set; controller stays uninitialized"
            );
            self.state = ControllerState::Uninitialized;
            return Err(InitError::MissingDefinitions);
        };
        self.data_set = Some(data_set);
        match self.build() {
            Ok(()) => {
                tracing::info!(
                    side = self.side.as_str(),
                    poses = self.mixer.as_ref().map_or(0, PoseMixer::node_count),
                    "hand pose controller ready"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    side = self.side.as_str(),
                    error = %e,
                    "hand pose controller failed to initialize"
                );
                self.state = ControllerState::Uninitialized;
                self.mixer = None;
                Err(e)
            }
        }
    }

    /// (Re)build the mixer from the stored data set, preserving finger
    /// values, constraints and the current pose where it still exists.
    fn build(&mut self) -> Result<(), InitError> {
        let data_set = self.data_set.clone().ok_or(InitError::MissingDefinitions)?;
        let skeleton = data_set.skeleton();
        if let Some(target) = &self.target
            && let Some(bone) = skeleton
                .bones
                .iter()
                .find(|b| target.bone_index(&b.name).is_none())
        {
            return Err(InitError::MissingSkeleton {
                bone: bone.name.clone(),
            });
        }

        let mut mixer = PoseMixer::build(
            data_set.definitions(),
            &data_set.finger_masks(),
            self.config.mixer_config(),
        )?;
        if self.current_pose >= mixer.node_count() {
            self.current_pose = 0;
        }
        mixer.set_current_pose(self.current_pose, &self.fingers);
        self.backend.rebuild(&mixer, skeleton);
        self.mixer = Some(mixer);
        self.state = ControllerState::Ready;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

impl HandPoseController {
    /// Advance one frame. Returns the evaluated pose while `Ready` and
    /// visible, `None` otherwise.
    pub fn tick(&mut self, dt: Duration) -> Option<SkeletalPose> {
        if self.state != ControllerState::Ready {
            return None;
        }

        if !self.backend.is_valid() {
            tracing::warn!(
                side = self.side.as_str(),
                "evaluation backend invalid; rebuilding"
            );
            if let Err(e) = self.build() {
                tracing::error!(side = self.side.as_str(), error = %e, "rebuild failed");
                self.state = ControllerState::Uninitialized;
                self.mixer = None;
                return None;
            }
        }

        let raw = self.source.read(self.side);
        let mixer = self.mixer.as_mut()?;

        mixer.refresh(&self.fingers);
        mixer.set_current_pose(self.current_pose, &self.fingers);

        self.fingers = self.constraints.remap_all(&raw);
        mixer.refresh(&self.fingers);

        let mut target = self.constraints.target_pose_index;
        if target >= mixer.node_count() {
            tracing::debug!(
                side = self.side.as_str(),
                index = target,
                count = mixer.node_count(),
                "target pose out of range; using default"
            );
            target = 0;
        }
        if target != self.current_pose {
            mixer.set_current_pose(target, &self.fingers);
            self.current_pose = target;
        }

        mixer.tick(dt);
        let pose = self.backend.evaluate(mixer);
        if self.visible { pose } else { None }
    }
}

// ---------------------------------------------------------------------------
// Control and queries
// ---------------------------------------------------------------------------

impl HandPoseController {
    /// Replace the active constraint set. Takes effect on the next tick.
    pub fn set_constraints(&mut self, set: PoseConstraintSet) {
        self.constraints = set;
    }

    /// Identity remapping, default pose.
    pub fn clear_constraints(&mut self) {
        self.constraints = PoseConstraintSet::free();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Remapped values stored by the last tick.
    #[must_use]
    pub fn finger_values(&self) -> FingerValues {
        self.fingers
    }

    #[must_use]
    pub fn constraints(&self) -> &PoseConstraintSet {
        &self.constraints
    }

    #[must_use]
    pub fn current_pose_index(&self) -> usize {
        self.current_pose
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The live mixer, once initialized.
    #[must_use]
    pub fn mixer(&self) -> Option<&PoseMixer> {
        self.mixer.as_ref()
    }

    #[must_use]
    pub fn side(&self) -> HandSide {
        self.side
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Switch between tweened and immediate finger writes. Survives rebuilds.
    pub fn set_execution_mode(&mut self, mode: ExecutionMode) {
        self.config.mode = mode;
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.set_execution_mode(mode);
        }
    }
}

impl ConstrainedHand for HandPoseController {
    fn side(&self) -> HandSide {
        self.side
    }

    fn set_constraints(&mut self, set: PoseConstraintSet) {
        HandPoseController::set_constraints(self, set);
    }

    fn clear_constraints(&mut self) {
        HandPoseController::clear_constraints(self);
    }

    fn set_visible(&mut self, visible: bool) {
        HandPoseController::set_visible(self, visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GraphBackend;
    use crate::source::FixedFingerSource;
    use handpose_blend::{AnimationClip, PoseDefinition};

    const FRAME: Duration = Duration::from_millis(16);

    fn data_set() -> Arc<HandDataSet> {
        let s = HandSkeleton::standard();
        let open = Arc::new(AnimationClip::from_curls("open", &s, FingerValues::ZERO));
        let fist = Arc::new(AnimationClip::from_curls("fist", &s, FingerValues([1.0; 5])));
        Arc::new(
            HandDataSet::new(s, open, fist.clone(), vec![PoseDefinition::fixed(fist)]).unwrap(),
        )
    }

    fn controller() -> HandPoseController {
        HandPoseController::new(HandSide::Left, FixedFingerSource::new(), GraphBackend::new())
    }

    #[test]
    fn uninitialized_tick_is_none() {
        let mut c = controller();
        assert_eq!(c.state(), ControllerState::Uninitialized);
        assert!(c.tick(FRAME).is_none());
    }

    #[test]
    fn missing_data_set_keeps_uninitialized() {
        let mut c = controller();
        assert!(matches!(
            c.initialize(None),
            Err(InitError::MissingDefinitions)
        ));
        assert_eq!(c.state(), ControllerState::Uninitialized);
        assert!(c.mixer().is_none());
    }

    #[test]
    fn initialize_reaches_ready() {
        let mut c = controller();
        c.initialize(Some(data_set())).unwrap();
        assert_eq!(c.state(), ControllerState::Ready);
        assert_eq!(c.mixer().unwrap().node_count(), 2);
        assert!(c.tick(FRAME).is_some());
    }

    #[test]
    fn target_rig_must_cover_bones() {
        let rig = HandSkeleton::new(vec![handpose_blend::BoneDef::new("wrist", None, None)])
            .unwrap();
        let mut c = controller().with_target_skeleton(rig);
        let err = c.initialize(Some(data_set())).unwrap_err();
        assert!(matches!(err, InitError::MissingSkeleton { ref bone } if bone == "palm"));
        assert_eq!(c.state(), ControllerState::Uninitialized);
    }

    #[test]
    fn hidden_hand_runs_but_returns_nothing() {
        let mut c = controller();
        c.initialize(Some(data_set())).unwrap();
        c.set_visible(false);
        assert!(c.tick(FRAME).is_none());
        assert_eq!(c.state(), ControllerState::Ready);
        c.set_visible(true);
        assert!(c.tick(FRAME).is_some());
    }

    #[test]
    fn execution_mode_reaches_mixer() {
        let mut c = controller();
        c.initialize(Some(data_set())).unwrap();
        c.set_execution_mode(ExecutionMode::Editing);
        assert_eq!(c.mixer().unwrap().execution_mode(), ExecutionMode::Editing);
        assert_eq!(c.config().mode, ExecutionMode::Editing);
    }
}
