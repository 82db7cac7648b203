#![forbid(unsafe_code)]

//! Single-frame animation clips.
//!
//! Hand poses are authored as one key per bone; a clip is that key set plus a
//! name used for lookup and pose-name derivation.

use std::f32::consts::FRAC_PI_2;

use handpose_core::FingerValues;
use serde::{Deserialize, Serialize};

use crate::skeleton::{BoneTransform, HandSkeleton, SkeletalPose};

/// A named pose sample: one transform per skeleton bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub bones: Vec<BoneTransform>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, bones: Vec<BoneTransform>) -> Self {
        Self {
            name: name.into(),
            bones,
        }
    }

    /// Clip with every finger bone curled by `curls[finger] * 90°` about X.
    ///
    /// Wrist and palm stay at identity. Handy for synthesizing open/closed
    /// pairs without authored data.
    #[must_use]
    pub fn from_curls(
        name: impl Into<String>,
        skeleton: &HandSkeleton,
        curls: FingerValues,
    ) -> Self {
        let bones = skeleton
            .bones
            .iter()
            .map(|b| match b.finger {
                Some(f) => BoneTransform::curl(curls[f] * FRAC_PI_2),
                None => BoneTransform::IDENTITY,
            })
            .collect();
        Self::new(name, bones)
    }

    /// Transform of bone `index`; identity past the clip's end.
    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> BoneTransform {
        self.bones
            .get(index)
            .copied()
            .unwrap_or(BoneTransform::IDENTITY)
    }

    /// Sample into a pose sized for `skeleton`.
    #[must_use]
    pub fn sample(&self, skeleton: &HandSkeleton) -> SkeletalPose {
        SkeletalPose {
            bones: (0..skeleton.len()).map(|i| self.bone(i)).collect(),
        }
    }
}
