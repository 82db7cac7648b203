#![forbid(unsafe_code)]

//! Pose definitions and the hand data asset.
//!
//! A [`HandDataSet`] is the resolved, validated form of a
//! [`HandDataSetAsset`] (the JSON authoring format). Its definition list
//! always starts with a synthesized `"Default"` dynamic pose built from the
//! asset's default open/closed clips; authored poses follow in order.
//!
//! # Failure Modes
//!
//! | Failure | Cause |
//! |---------|-------|
//! | `BlendError::UnknownClip` | pose or default references a missing clip |
//! | `BlendError::MissingClosedClip` | dynamic pose without `closed` |
//! | `BlendError::BoneCountMismatch` | clip size differs from skeleton |
//! | `BlendError::InvalidSkeleton` | empty skeleton or bad parent link |
//! | `BlendError::Parse` / `Io` | unreadable asset |

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use handpose_core::FINGER_COUNT;
use serde::{Deserialize, Serialize};

use crate::clip::AnimationClip;
use crate::error::{BlendError, BlendResult};
use crate::skeleton::{BoneMask, HandSkeleton};

/// Name of the synthesized pose at index 0.
pub const DEFAULT_POSE_NAME: &str = "Default";

/// Whether a pose is a fixed gesture or a per-finger open/closed blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseKind {
    Static,
    Dynamic,
}

/// A named hand shape ready to be turned into a pose node.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseDefinition {
    name: String,
    kind: PoseKind,
    open_clip: Arc<AnimationClip>,
    closed_clip: Option<Arc<AnimationClip>>,
}

impl PoseDefinition {
    /// Fixed gesture driven by a single clip.
    #[must_use]
    pub fn fixed(clip: Arc<AnimationClip>) -> Self {
        Self {
            name: clip.name.clone(),
            kind: PoseKind::Static,
            open_clip: clip,
            closed_clip: None,
        }
    }

    /// Continuous per-finger blend between `open` and `closed`.
    #[must_use]
    pub fn dynamic(open: Arc<AnimationClip>, closed: Arc<AnimationClip>) -> Self {
        let name = if open.name == closed.name {
            open.name.clone()
        } else {
            format!("{}-{}", open.name, closed.name)
        };
        Self {
            name,
            kind: PoseKind::Dynamic,
            open_clip: open,
            closed_clip: Some(closed),
        }
    }

    /// Override the derived name. An empty name keeps the derived one.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.name = name;
        }
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> PoseKind {
        self.kind
    }

    /// The open clip; for static poses, the only clip.
    #[must_use]
    pub fn open_clip(&self) -> &Arc<AnimationClip> {
        &self.open_clip
    }

    #[must_use]
    pub fn closed_clip(&self) -> Option<&Arc<AnimationClip>> {
        self.closed_clip.as_ref()
    }

    fn validate(&self, skeleton: &HandSkeleton) -> BlendResult<()> {
        if self.kind == PoseKind::Dynamic && self.closed_clip.is_none() {
            return Err(BlendError::MissingClosedClip {
                pose: self.name.clone(),
            });
        }
        for clip in std::iter::once(&self.open_clip).chain(self.closed_clip.as_ref()) {
            if clip.bones.len() != skeleton.len() {
                return Err(BlendError::BoneCountMismatch {
                    clip: clip.name.clone(),
                    expected: skeleton.len(),
                    found: clip.bones.len(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Asset format
// ---------------------------------------------------------------------------

/// One authored pose entry; clips are referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseAsset {
    /// Display name; derived from clip names when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: PoseKind,
    pub open: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<String>,
}

/// The persisted hand data asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandDataSetAsset {
    pub skeleton: HandSkeleton,
    pub clips: Vec<AnimationClip>,
    pub default_open: String,
    pub default_closed: String,
    #[serde(default)]
    pub poses: Vec<PoseAsset>,
}

impl HandDataSetAsset {
    /// Decode from JSON.
    pub fn from_json_str(json: &str) -> BlendResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as pretty JSON.
    pub fn to_json_string(&self) -> BlendResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// HandDataSet
// ---------------------------------------------------------------------------

/// Validated skeleton plus ordered pose definitions (Default first).
#[derive(Debug, Clone, PartialEq)]
pub struct HandDataSet {
    skeleton: HandSkeleton,
    definitions: Vec<PoseDefinition>,
}

impl HandDataSet {
    /// Build a data set, synthesizing the Default pose at index 0.
    pub fn new(
        skeleton: HandSkeleton,
        default_open: Arc<AnimationClip>,
        default_closed: Arc<AnimationClip>,
        poses: Vec<PoseDefinition>,
    ) -> BlendResult<Self> {
        skeleton.validate()?;
        let default =
            PoseDefinition::dynamic(default_open, default_closed).with_name(DEFAULT_POSE_NAME);
        let mut definitions = Vec::with_capacity(poses.len() + 1);
        definitions.push(default);
        definitions.extend(poses);
        for def in &definitions {
            def.validate(&skeleton)?;
        }
        tracing::debug!(count = definitions.len(), "built hand data set");
        Ok(Self {
            skeleton,
            definitions,
        })
    }

    /// Resolve clip references in an authored asset.
    pub fn from_asset(asset: HandDataSetAsset) -> BlendResult<Self> {
        let clips: HashMap<String, Arc<AnimationClip>> = asset
            .clips
            .into_iter()
            .map(|c| (c.name.clone(), Arc::new(c)))
            .collect();
        let lookup = |pose: &str, clip: &str| {
            clips
                .get(clip)
                .cloned()
                .ok_or_else(|| BlendError::UnknownClip {
                    pose: pose.to_string(),
                    clip: clip.to_string(),
                })
        };

        let default_open = lookup(DEFAULT_POSE_NAME, &asset.default_open)?;
        let default_closed = lookup(DEFAULT_POSE_NAME, &asset.default_closed)?;

        let mut poses = Vec::with_capacity(asset.poses.len());
        for entry in &asset.poses {
            let label = entry.name.as_deref().unwrap_or(&entry.open);
            let open = lookup(label, &entry.open)?;
            let def = match entry.kind {
                PoseKind::Static => PoseDefinition::fixed(open),
                PoseKind::Dynamic => {
                    let closed = entry.closed.as_deref().ok_or_else(|| {
                        BlendError::MissingClosedClip {
                            pose: label.to_string(),
                        }
                    })?;
                    PoseDefinition::dynamic(open, lookup(label, closed)?)
                }
            };
            poses.push(match &entry.name {
                Some(name) => def.with_name(name.as_str()),
                None => def,
            });
        }

        Self::new(asset.skeleton, default_open, default_closed, poses)
    }

    /// Decode and resolve a JSON asset.
    pub fn from_json_str(json: &str) -> BlendResult<Self> {
        Self::from_asset(HandDataSetAsset::from_json_str(json)?)
    }

    /// Read and resolve a JSON asset file.
    pub fn load(path: impl AsRef<Path>) -> BlendResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), poses = set.len(), "loaded hand data set");
        Ok(set)
    }

    #[must_use]
    pub fn skeleton(&self) -> &HandSkeleton {
        &self.skeleton
    }

    /// Definitions in pose-index order; index 0 is always Default.
    #[must_use]
    pub fn definitions(&self) -> &[PoseDefinition] {
        &self.definitions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Never true: Default is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Pose index of the first definition named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.name == name)
    }

    /// The per-finger bone-mask table for this skeleton.
    #[must_use]
    pub fn finger_masks(&self) -> [BoneMask; FINGER_COUNT] {
        self.skeleton.finger_masks()
    }
}
