#![forbid(unsafe_code)]

//! Initialization errors.

use std::fmt;

use handpose_blend::BlendError;

/// Reasons a controller failed to reach `Ready`.
///
/// All of these are configuration problems. The controller logs them, stays
/// uninitialized, and does not retry on its own.
#[derive(Debug)]
pub enum InitError {
    /// No hand data set was provided.
    MissingDefinitions,
    /// The target rig lacks a bone the data set animates.
    MissingSkeleton { bone: String },
    /// The data set could not be turned into a pose graph.
    Blend(BlendError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::MissingDefinitions => write!(f, "no hand data set provided"),
            InitError::MissingSkeleton { bone } => {
                write!(f, "target skeleton has no bone named '{bone}'")
            }
            InitError::Blend(e) => write!(f, "pose graph build failed: {e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Blend(e) => Some(e),
            InitError::MissingDefinitions | InitError::MissingSkeleton { .. } => None,
        }
    }
}

impl From<BlendError> for InitError {
    fn from(e: BlendError) -> Self {
        InitError::Blend(e)
    }
}
