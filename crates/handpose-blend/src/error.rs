#![forbid(unsafe_code)]

//! Errors raised while building pose definitions and blend graphs.
//!
//! Every variant is a configuration problem: bad authored data or a wiring
//! mistake. None of them occur during per-frame evaluation of a graph that
//! was built successfully.

use std::fmt;

use crate::graph::NodeId;

/// Errors from asset loading and graph construction.
#[derive(Debug)]
pub enum BlendError {
    /// I/O failure while reading an asset file.
    Io(std::io::Error),
    /// Asset JSON could not be decoded.
    Parse(String),
    /// The skeleton is malformed (empty, bad parent links).
    InvalidSkeleton(String),
    /// A pose references a clip name that is not in the asset.
    UnknownClip { pose: String, clip: String },
    /// A dynamic pose has no closed clip.
    MissingClosedClip { pose: String },
    /// A clip's bone count disagrees with the skeleton.
    BoneCountMismatch {
        clip: String,
        expected: usize,
        found: usize,
    },
    /// A mixer was asked to build without any poses.
    NoPoses,
    /// A node handle does not exist (or does not precede its consumer).
    UnknownNode(NodeId),
}

impl fmt::Display for BlendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlendError::Io(e) => write!(f, "I/O error: {e}"),
            BlendError::Parse(msg) => write!(f, "asset parse error: {msg}"),
            BlendError::InvalidSkeleton(msg) => write!(f, "invalid skeleton: {msg}"),
            BlendError::UnknownClip { pose, clip } => {
                write!(f, "pose '{pose}' references unknown clip '{clip}'")
            }
            BlendError::MissingClosedClip { pose } => {
                write!(f, "dynamic pose '{pose}' has no closed clip")
            }
            BlendError::BoneCountMismatch {
                clip,
                expected,
                found,
            } => write!(
                f,
                "clip '{clip}' has {found} bones, skeleton has {expected}"
            ),
            BlendError::NoPoses => write!(f, "no pose definitions"),
            BlendError::UnknownNode(id) => write!(f, "unknown blend node {}", id.index()),
        }
    }
}

impl std::error::Error for BlendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlendError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BlendError {
    fn from(e: std::io::Error) -> Self {
        BlendError::Io(e)
    }
}

impl From<serde_json::Error> for BlendError {
    fn from(e: serde_json::Error) -> Self {
        BlendError::Parse(e.to_string())
    }
}

/// Result type for blend operations.
pub type BlendResult<T> = Result<T, BlendError>;
