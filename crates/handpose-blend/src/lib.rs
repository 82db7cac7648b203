#![forbid(unsafe_code)]

//! Pose blending: the skeletal data model, an arena blend graph, and the
//! per-finger / per-pose nodes built on top of it.
//!
//! # Structure
//!
//! ```text
//! PoseMixer (root Mixer, one input per pose, hard-switched 0/1)
//!  ├─ StaticPoseNode  ──► Clip
//!  └─ DynamicPoseNode ──► LayerMixer (base = open clip)
//!        ├─ thumb  channel: Mixer(open, closed) masked to thumb bones
//!        ├─ index  channel: ...
//!        └─ pinky  channel: ...
//! ```
//!
//! All nodes live in one [`BlendGraph`] arena and refer to each other by
//! [`NodeId`]. Inputs always precede the node that consumes them, so the graph
//! is acyclic by construction.

pub mod channel;
pub mod clip;
pub mod definition;
pub mod error;
pub mod graph;
pub mod mixer;
pub mod pose_node;
pub mod skeleton;

pub use channel::{DEFAULT_HYSTERESIS, FingerBlendChannel};
pub use clip::AnimationClip;
pub use definition::{
    DEFAULT_POSE_NAME, HandDataSet, HandDataSetAsset, PoseAsset, PoseDefinition, PoseKind,
};
pub use error::{BlendError, BlendResult};
pub use graph::{BlendGraph, GraphNode, Layer, MixerInput, NodeId};
pub use mixer::{MixerConfig, PoseMixer};
pub use pose_node::{DynamicPoseNode, PoseNode, StaticPoseNode};
pub use skeleton::{BoneDef, BoneMask, BoneTransform, HandSkeleton, SkeletalPose};
