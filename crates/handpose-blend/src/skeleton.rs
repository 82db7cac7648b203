#![forbid(unsafe_code)]

//! Hand skeleton, per-bone transforms, and bone masks.
//!
//! Rotations are unit quaternions stored `[x, y, z, w]`. Blending uses
//! normalized lerp with hemisphere correction, which is accurate enough for
//! the small angular spans between hand poses and is order-independent for
//! weighted sums.

use glam::{Quat, Vec4};
use handpose_core::{FINGER_COUNT, Finger, FingerSet};
use serde::{Deserialize, Serialize};

use crate::error::{BlendError, BlendResult};

// ---------------------------------------------------------------------------
// Quaternion helpers
// ---------------------------------------------------------------------------

const QUAT_IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Unit quaternion from `v`; degenerate input collapses to identity.
fn normalized(v: Vec4) -> Quat {
    v.try_normalize().map_or(Quat::IDENTITY, Quat::from_vec4)
}

fn nlerp(a: [f32; 4], b: [f32; 4], t: f32) -> Quat {
    // glam's lerp takes the short way around and renormalizes.
    let q = Quat::from_array(a).lerp(Quat::from_array(b), t);
    if q.is_finite() { q } else { Quat::IDENTITY }
}

// ---------------------------------------------------------------------------
// BoneTransform
// ---------------------------------------------------------------------------

/// Local transform of one bone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneTransform {
    /// Unit quaternion `[x, y, z, w]`.
    pub rotation: [f32; 4],
    #[serde(default)]
    pub translation: [f32; 3],
}

impl BoneTransform {
    pub const IDENTITY: BoneTransform = BoneTransform {
        rotation: QUAT_IDENTITY,
        translation: [0.0; 3],
    };

    /// Pure rotation of `radians` about the bone's local X axis (the curl axis).
    #[must_use]
    pub fn curl(radians: f32) -> Self {
        let half = radians * 0.5;
        Self {
            rotation: [half.sin(), 0.0, 0.0, half.cos()],
            translation: [0.0; 3],
        }
    }

    /// Interpolate toward `other` by `t`.
    #[must_use]
    pub fn lerp(&self, other: &BoneTransform, t: f32) -> BoneTransform {
        let mut translation = [0.0; 3];
        for (i, out) in translation.iter_mut().enumerate() {
            *out = self.translation[i] + (other.translation[i] - self.translation[i]) * t;
        }
        BoneTransform {
            rotation: nlerp(self.rotation, other.rotation, t).to_array(),
            translation,
        }
    }

    /// Apply `delta` scaled by `weight` on top of this transform.
    #[must_use]
    pub fn add_scaled(&self, delta: &BoneTransform, weight: f32) -> BoneTransform {
        let partial = nlerp(QUAT_IDENTITY, delta.rotation, weight);
        let mut translation = self.translation;
        for (i, out) in translation.iter_mut().enumerate() {
            *out += delta.translation[i] * weight;
        }
        BoneTransform {
            rotation: normalized(Vec4::from(Quat::from_array(self.rotation) * partial))
                .to_array(),
            translation,
        }
    }

    /// Rotation angle in radians, in [0, π].
    #[must_use]
    pub fn angle(&self) -> f32 {
        2.0 * self.rotation[3].abs().clamp(0.0, 1.0).acos()
    }

    /// Weighted blend of several transforms. Weights need not sum to one.
    ///
    /// Returns `None` when the total weight is not positive.
    #[must_use]
    pub fn weighted_sum<'a>(
        items: impl IntoIterator<Item = (&'a BoneTransform, f32)>,
    ) -> Option<BoneTransform> {
        let mut total = 0.0;
        let mut rot = Vec4::ZERO;
        let mut pos = [0.0f32; 3];
        let mut reference: Option<Vec4> = None;
        for (bone, w) in items {
            if w <= 0.0 {
                continue;
            }
            let q = Vec4::from_array(bone.rotation);
            let r = *reference.get_or_insert(q);
            let sign = if r.dot(q) < 0.0 { -1.0 } else { 1.0 };
            rot += q * (w * sign);
            for i in 0..3 {
                pos[i] += bone.translation[i] * w;
            }
            total += w;
        }
        if total <= 0.0 {
            return None;
        }
        for p in &mut pos {
            *p /= total;
        }
        Some(BoneTransform {
            rotation: normalized(rot).to_array(),
            translation: pos,
        })
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ---------------------------------------------------------------------------
// Skeleton
// ---------------------------------------------------------------------------

/// One bone of the hand rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneDef {
    pub name: String,
    /// Finger chain this bone belongs to; `None` for wrist and palm.
    #[serde(default)]
    pub finger: Option<Finger>,
    /// Parent bone index. Must precede this bone.
    #[serde(default)]
    pub parent: Option<usize>,
}

impl BoneDef {
    #[must_use]
    pub fn new(name: impl Into<String>, finger: Option<Finger>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            finger,
            parent,
        }
    }
}

/// Ordered bone list for one hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSkeleton {
    pub bones: Vec<BoneDef>,
}

impl HandSkeleton {
    /// Build and validate a skeleton.
    pub fn new(bones: Vec<BoneDef>) -> BlendResult<Self> {
        let skeleton = Self { bones };
        skeleton.validate()?;
        Ok(skeleton)
    }

    /// Wrist, palm, a three-bone thumb, and four bones per remaining finger.
    #[must_use]
    pub fn standard() -> Self {
        let mut bones = vec![
            BoneDef::new("wrist", None, None),
            BoneDef::new("palm", None, Some(0)),
        ];
        for finger in Finger::ALL {
            let segments: &[&str] = if finger == Finger::Thumb {
                &["metacarpal", "proximal", "distal"]
            } else {
                &["metacarpal", "proximal", "intermediate", "distal"]
            };
            let mut parent = 0;
            for segment in segments {
                let index = bones.len();
                bones.push(BoneDef {
                    name: format!("{}-{}", finger.as_str(), segment),
                    finger: Some(finger),
                    parent: Some(parent),
                });
                parent = index;
            }
        }
        Self { bones }
    }

    /// Check bone parent links.
    pub fn validate(&self) -> BlendResult<()> {
        if self.bones.is_empty() {
            return Err(BlendError::InvalidSkeleton("no bones".into()));
        }
        for (i, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent
                && parent >= i
            {
                return Err(BlendError::InvalidSkeleton(format!(
                    "bone '{}' has parent {parent} that does not precede it",
                    bone.name
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Index of the bone named `name`.
    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// All bones at identity.
    #[must_use]
    pub fn rest_pose(&self) -> SkeletalPose {
        SkeletalPose {
            bones: vec![BoneTransform::IDENTITY; self.bones.len()],
        }
    }

    /// One mask per finger, indexed by [`Finger::index`]. The masks are
    /// pairwise disjoint because each bone names at most one finger.
    #[must_use]
    pub fn finger_masks(&self) -> [BoneMask; FINGER_COUNT] {
        Finger::ALL.map(|f| BoneMask::for_fingers(self, FingerSet::from(f)))
    }
}

// ---------------------------------------------------------------------------
// BoneMask
// ---------------------------------------------------------------------------

/// Per-bone inclusion flags scoping a layer's influence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoneMask {
    bones: Vec<bool>,
}

impl BoneMask {
    /// Mask covering every bone of `skeleton`.
    #[must_use]
    pub fn all(skeleton: &HandSkeleton) -> Self {
        Self {
            bones: vec![true; skeleton.len()],
        }
    }

    /// Mask covering the bones of the given fingers.
    #[must_use]
    pub fn for_fingers(skeleton: &HandSkeleton, fingers: FingerSet) -> Self {
        Self {
            bones: skeleton
                .bones
                .iter()
                .map(|b| b.finger.is_some_and(|f| fingers.has(f)))
                .collect(),
        }
    }

    /// Whether `bone` is included. Bones past the mask's end are excluded.
    #[inline]
    #[must_use]
    pub fn contains(&self, bone: usize) -> bool {
        self.bones.get(bone).copied().unwrap_or(false)
    }

    /// Number of included bones.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bones.iter().filter(|&&b| b).count()
    }

    /// Whether no bone is in both masks.
    #[must_use]
    pub fn is_disjoint(&self, other: &BoneMask) -> bool {
        self.bones
            .iter()
            .zip(&other.bones)
            .all(|(&a, &b)| !(a && b))
    }
}

// ---------------------------------------------------------------------------
// SkeletalPose
// ---------------------------------------------------------------------------

/// Evaluated local transforms for every bone, in skeleton order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkeletalPose {
    pub bones: Vec<BoneTransform>,
}

impl SkeletalPose {
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&BoneTransform> {
        self.bones.get(index)
    }

    /// Largest per-bone rotation difference (radians) against `other`.
    #[must_use]
    pub fn max_angle_delta(&self, other: &SkeletalPose) -> f32 {
        self.bones
            .iter()
            .zip(&other.bones)
            .map(|(a, b)| (a.angle() - b.angle()).abs())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn standard_skeleton_layout() {
        let s = HandSkeleton::standard();
        assert_eq!(s.len(), 2 + 3 + 4 * 4);
        assert!(s.validate().is_ok());
        assert_eq!(s.bone_index("thumb-distal"), Some(4));
        assert_eq!(s.bones[s.bone_index("index-metacarpal").unwrap()].parent, Some(0));
    }

    #[test]
    fn finger_masks_are_disjoint_and_cover_finger_bones() {
        let s = HandSkeleton::standard();
        let masks = s.finger_masks();
        for (i, a) in masks.iter().enumerate() {
            for b in &masks[i + 1..] {
                assert!(a.is_disjoint(b));
            }
        }
        assert_eq!(masks[Finger::Thumb.index()].count(), 3);
        assert_eq!(masks[Finger::Pinky.index()].count(), 4);
        let covered: usize = masks.iter().map(BoneMask::count).sum();
        assert_eq!(covered, s.len() - 2);
        assert!(!masks[0].contains(0), "wrist belongs to no finger");
    }

    #[test]
    fn invalid_parent_rejected() {
        let bones = vec![BoneDef::new("a", None, Some(1)), BoneDef::new("b", None, None)];
        assert!(matches!(
            HandSkeleton::new(bones),
            Err(BlendError::InvalidSkeleton(_))
        ));
        assert!(HandSkeleton::new(Vec::new()).is_err());
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = BoneTransform::IDENTITY;
        let b = BoneTransform::curl(FRAC_PI_2);
        assert!(a.lerp(&b, 0.0).angle() < 1e-4);
        assert!((a.lerp(&b, 1.0).angle() - FRAC_PI_2).abs() < 1e-4);
        let mid = a.lerp(&b, 0.5).angle();
        assert!((mid - FRAC_PI_2 / 2.0).abs() < 0.02, "{mid}");
    }

    #[test]
    fn lerp_takes_short_path() {
        let a = BoneTransform::curl(0.1);
        let mut b = BoneTransform::curl(0.3);
        for c in &mut b.rotation {
            *c = -*c;
        }
        let mid = a.lerp(&b, 0.5);
        assert!((mid.angle() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn weighted_sum_single_input_is_identity_blend() {
        let b = BoneTransform::curl(1.0);
        let out = BoneTransform::weighted_sum([(&b, 1.0)]).unwrap();
        assert!((out.angle() - 1.0).abs() < 1e-5);
        assert!(BoneTransform::weighted_sum([(&b, 0.0)]).is_none());
    }

    #[test]
    fn add_scaled_composes_rotation() {
        let base = BoneTransform::curl(0.5);
        let delta = BoneTransform::curl(0.5);
        assert!((base.add_scaled(&delta, 1.0).angle() - 1.0).abs() < 1e-4);
        assert!((base.add_scaled(&delta, 0.0).angle() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn degenerate_rotations_collapse_to_identity() {
        let zero = BoneTransform {
            rotation: [0.0; 4],
            translation: [0.0; 3],
        };
        let out = BoneTransform::weighted_sum([(&zero, 1.0)]).unwrap();
        assert_eq!(out.rotation, BoneTransform::IDENTITY.rotation);

        let nan = BoneTransform {
            rotation: [f32::NAN; 4],
            translation: [0.0; 3],
        };
        let mid = BoneTransform::IDENTITY.lerp(&nan, 0.5);
        assert!(mid.rotation.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn weighted_sum_flips_opposite_hemisphere() {
        let a = BoneTransform::curl(0.4);
        let mut b = a;
        for c in &mut b.rotation {
            *c = -*c;
        }
        let out = BoneTransform::weighted_sum([(&a, 1.0), (&b, 1.0)]).unwrap();
        assert!((out.angle() - 0.4).abs() < 1e-4);
    }
}
