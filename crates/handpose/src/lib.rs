#![forbid(unsafe_code)]

//! Hand pose blending engine.
//!
//! Re-exports the commonly used types from the internal crates and offers a
//! prelude. A typical host:
//!
//! ```no_run
//! use std::time::Duration;
//! use handpose::prelude::*;
//!
//! # fn main() -> handpose::Result<()> {
//! let data = handpose::load_data_set("hand.json")?;
//! let mut hand = HandPoseController::new(
//!     HandSide::Left,
//!     FixedFingerSource::new(),
//!     GraphBackend::new(),
//! );
//! hand.initialize(Some(data))?;
//! if let Some(pose) = hand.tick(Duration::from_millis(16)) {
//!     let _ = pose.bones.len();
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

// --- Core re-exports -------------------------------------------------------

pub use handpose_core::{
    DriverConfig, Easing, ExecutionMode, FINGER_COUNT, Finger, FingerConstraint, FingerSet,
    FingerValues, HandSide, PoseConstraintSet, SmootherDriver, ValueSmoother,
};

// --- Blend re-exports ------------------------------------------------------

pub use handpose_blend::{
    AnimationClip, BlendError, BoneMask, BoneTransform, HandDataSet, HandDataSetAsset,
    HandSkeleton, MixerConfig, PoseDefinition, PoseKind, PoseMixer, PoseNode, SkeletalPose,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use handpose_runtime::{
    ConstrainedHand, ConstraintMode, ControllerConfig, ControllerState, EvaluationBackend,
    FingerValueSource, FixedFingerSource, FnFingerSource, GraphBackend, HandPoseController,
    InitError, PoseConstraintCoordinator,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// I/O failure outside asset decoding.
    Io(std::io::Error),
    /// Bad hand data or graph wiring.
    Blend(BlendError),
    /// A controller could not be initialized.
    #[cfg(feature = "runtime")]
    Init(InitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Blend(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Init(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Blend(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Init(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<BlendError> for Error {
    fn from(err: BlendError) -> Self {
        Self::Blend(err)
    }
}

#[cfg(feature = "runtime")]
impl From<InitError> for Error {
    fn from(err: InitError) -> Self {
        Self::Init(err)
    }
}

/// Standard result type for handpose APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load a JSON hand data asset, ready to share between controllers.
pub fn load_data_set(path: impl AsRef<Path>) -> Result<Arc<HandDataSet>> {
    Ok(Arc::new(HandDataSet::load(path)?))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, Finger, FingerConstraint, FingerValues, HandDataSet, HandSide, PoseConstraintSet,
        Result, SkeletalPose,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{
        ConstraintMode, ControllerConfig, FixedFingerSource, GraphBackend, HandPoseController,
        PoseConstraintCoordinator,
    };

    pub use crate::{blend, core};
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use handpose_blend as blend;
pub use handpose_core as core;
#[cfg(feature = "runtime")]
pub use handpose_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_asset_is_blend_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_data_set(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Blend(BlendError::Io(_))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn malformed_asset_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_data_set(&path).unwrap_err();
        assert!(matches!(err, Error::Blend(BlendError::Parse(_))));
    }

    #[cfg(feature = "runtime")]
    #[test]
    fn init_error_converts() {
        let mut hand =
            HandPoseController::new(HandSide::Left, FixedFingerSource::new(), GraphBackend::new());
        let err: Error = hand.initialize(None).unwrap_err().into();
        assert!(matches!(err, Error::Init(InitError::MissingDefinitions)));
        assert_eq!(err.to_string(), "no hand data set provided");
    }
}
