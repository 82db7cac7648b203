#![forbid(unsafe_code)]

//! Evaluation backends.
//!
//! A backend owns whatever the host needs to turn the pose graph into bone
//! transforms each frame. Hosts can tear that state down at any time (scene
//! reloads, device loss); the controller checks [`EvaluationBackend::is_valid`]
//! every tick and rebuilds when it reports `false`.

use std::cell::RefCell;
use std::rc::Rc;

use handpose_blend::{HandSkeleton, PoseMixer, SkeletalPose};

/// Host-side evaluation of a [`PoseMixer`].
pub trait EvaluationBackend {
    /// Whether the state from the last [`rebuild`](Self::rebuild) is usable.
    fn is_valid(&self) -> bool;

    /// Bind to a freshly built mixer.
    fn rebuild(&mut self, mixer: &PoseMixer, skeleton: &HandSkeleton);

    /// Evaluate the current frame. `None` when no pose can be produced.
    fn evaluate(&mut self, mixer: &PoseMixer) -> Option<SkeletalPose>;
}

impl<B: EvaluationBackend + ?Sized> EvaluationBackend for Rc<RefCell<B>> {
    fn is_valid(&self) -> bool {
        self.borrow().is_valid()
    }

    fn rebuild(&mut self, mixer: &PoseMixer, skeleton: &HandSkeleton) {
        self.borrow_mut().rebuild(mixer, skeleton);
    }

    fn evaluate(&mut self, mixer: &PoseMixer) -> Option<SkeletalPose> {
        self.borrow_mut().evaluate(mixer)
    }
}

/// Reference backend: evaluates the arena graph directly.
#[derive(Debug, Clone, Default)]
pub struct GraphBackend {
    skeleton: Option<HandSkeleton>,
    valid: bool,
    rebuilds: u64,
    evaluations: u64,
}

impl GraphBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the bound state, as a host teardown would.
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.skeleton = None;
    }

    /// Times [`rebuild`](EvaluationBackend::rebuild) has run.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Frames evaluated successfully.
    #[must_use]
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations
    }
}

impl EvaluationBackend for GraphBackend {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn rebuild(&mut self, mixer: &PoseMixer, skeleton: &HandSkeleton) {
        tracing::debug!(
            nodes = mixer.graph().len(),
            bones = skeleton.len(),
            "graph backend rebuilt"
        );
        self.skeleton = Some(skeleton.clone());
        self.valid = true;
        self.rebuilds += 1;
    }

    fn evaluate(&mut self, mixer: &PoseMixer) -> Option<SkeletalPose> {
        if !self.valid {
            return None;
        }
        let skeleton = self.skeleton.as_ref()?;
        match mixer.evaluate(skeleton) {
            Ok(pose) => {
                self.evaluations += 1;
                Some(pose)
            }
            Err(e) => {
                tracing::warn!(error = %e, "graph evaluation failed");
                None
            }
        }
    }
}
