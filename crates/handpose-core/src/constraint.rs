#![forbid(unsafe_code)]

//! Per-finger range constraints and the sets that bundle them.
//!
//! A [`FingerConstraint`] is an affine remap of a raw curl value into an
//! allowed range, or a lock to a fixed value. A [`PoseConstraintSet`] carries
//! one constraint per finger plus the pose index that should drive the base
//! hand shape while the set is active.
//!
//! # Invariants
//!
//! 1. `remap` on an unlocked constraint is `(max - min) * value + min`.
//! 2. `remap` on a locked constraint is always `min`.
//! 3. `min <= max` is expected but not checked. An inverted range yields a
//!    negative slope, and the bounds are never reordered.

use std::ops::{Index, IndexMut};

use crate::finger::{FINGER_COUNT, Finger, FingerValues};

/// Remap rule for a single finger.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FingerConstraint {
    /// When set, the finger is pinned at `min`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub locked: bool,
    /// Lower bound of the output range, authored in [0, 1].
    pub min: f32,
    /// Upper bound of the output range.
    pub max: f32,
}

impl FingerConstraint {
    /// Identity remap: unlocked, full [0, 1] range.
    pub const FREE: FingerConstraint = FingerConstraint {
        locked: false,
        min: 0.0,
        max: 1.0,
    };

    /// Unlocked constraint over `[min, max]`.
    #[must_use]
    pub const fn range(min: f32, max: f32) -> Self {
        Self {
            locked: false,
            min,
            max,
        }
    }

    /// Constraint pinning the finger at `value`.
    #[must_use]
    pub const fn locked_at(value: f32) -> Self {
        Self {
            locked: true,
            min: value,
            max: value,
        }
    }

    /// Map a raw curl value into this constraint's range.
    #[inline]
    #[must_use]
    pub fn remap(&self, value: f32) -> f32 {
        if self.locked {
            self.min
        } else {
            (self.max - self.min) * value + self.min
        }
    }
}

impl Default for FingerConstraint {
    fn default() -> Self {
        Self::FREE
    }
}

/// Five finger constraints plus the pose they select.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoseConstraintSet {
    pub thumb: FingerConstraint,
    pub index: FingerConstraint,
    pub middle: FingerConstraint,
    pub ring: FingerConstraint,
    pub pinky: FingerConstraint,
    /// Pose to drive while this set is active. Out-of-range values are
    /// clamped to 0 by the controller.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_pose_index: usize,
}

impl PoseConstraintSet {
    /// All fingers free, default pose.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            thumb: FingerConstraint::FREE,
            index: FingerConstraint::FREE,
            middle: FingerConstraint::FREE,
            ring: FingerConstraint::FREE,
            pinky: FingerConstraint::FREE,
            target_pose_index: 0,
        }
    }

    /// Replace one finger's constraint (builder).
    #[must_use]
    pub fn with_finger(mut self, finger: Finger, constraint: FingerConstraint) -> Self {
        self[finger] = constraint;
        self
    }

    /// Set the target pose index (builder).
    #[must_use]
    pub fn with_target_pose(mut self, index: usize) -> Self {
        self.target_pose_index = index;
        self
    }

    /// Constraint at a raw finger index, `None` when out of range.
    ///
    /// Malformed authored data may carry indices past the last finger; those
    /// are ignored rather than treated as errors.
    #[must_use]
    pub fn get(&self, finger_index: usize) -> Option<&FingerConstraint> {
        Finger::from_index(finger_index).map(|f| &self[f])
    }

    /// Remap one raw value through `finger`'s constraint.
    #[inline]
    #[must_use]
    pub fn remap(&self, finger: Finger, value: f32) -> f32 {
        self[finger].remap(value)
    }

    /// Remap every finger at once.
    #[must_use]
    pub fn remap_all(&self, raw: &FingerValues) -> FingerValues {
        let mut out = [0.0; FINGER_COUNT];
        for (finger, value) in raw.iter() {
            out[finger.index()] = self.remap(finger, value);
        }
        FingerValues(out)
    }
}

impl Index<Finger> for PoseConstraintSet {
    type Output = FingerConstraint;

    fn index(&self, finger: Finger) -> &FingerConstraint {
        match finger {
            Finger::Thumb => &self.thumb,
            Finger::Index => &self.index,
            Finger::Middle => &self.middle,
            Finger::Ring => &self.ring,
            Finger::Pinky => &self.pinky,
        }
    }
}

impl IndexMut<Finger> for PoseConstraintSet {
    fn index_mut(&mut self, finger: Finger) -> &mut FingerConstraint {
        match finger {
            Finger::Thumb => &mut self.thumb,
            Finger::Index => &mut self.index,
            Finger::Middle => &mut self.middle,
            Finger::Ring => &mut self.ring,
            Finger::Pinky => &mut self.pinky,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_is_identity() {
        for v in [0.0, 0.25, 0.5, 1.0] {
            assert!((FingerConstraint::FREE.remap(v) - v).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn range_is_affine() {
        let c = FingerConstraint::range(0.2, 0.6);
        assert!((c.remap(0.0) - 0.2).abs() < 1e-6);
        assert!((c.remap(0.5) - 0.4).abs() < 1e-6);
        assert!((c.remap(1.0) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn locked_ignores_input() {
        let c = FingerConstraint {
            locked: true,
            min: 0.3,
            max: 1.0,
        };
        assert!((c.remap(0.0) - 0.3).abs() < f32::EPSILON);
        assert!((c.remap(0.9) - 0.3).abs() < f32::EPSILON);
        assert!((c.remap(1.0) - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn inverted_range_keeps_negative_slope() {
        let c = FingerConstraint::range(0.8, 0.2);
        assert!((c.remap(0.0) - 0.8).abs() < 1e-6);
        assert!((c.remap(1.0) - 0.2).abs() < 1e-6);
        assert!(c.remap(0.25) > c.remap(0.75));
    }

    #[test]
    fn set_index_covers_every_finger() {
        let mut set = PoseConstraintSet::free();
        for (i, finger) in Finger::ALL.into_iter().enumerate() {
            set[finger] = FingerConstraint::locked_at(i as f32 / 10.0);
        }
        assert!((set.thumb.min - 0.0).abs() < f32::EPSILON);
        assert!((set.pinky.min - 0.4).abs() < f32::EPSILON);
        assert!(set.get(4).is_some());
        assert!(set.get(5).is_none());
    }

    #[test]
    fn remap_all_applies_per_finger() {
        let set = PoseConstraintSet::free()
            .with_finger(Finger::Thumb, FingerConstraint::locked_at(0.3))
            .with_finger(Finger::Ring, FingerConstraint::range(0.5, 1.0));
        let out = set.remap_all(&FingerValues([0.9, 0.5, 0.6, 0.0, 1.0]));
        assert!((out[Finger::Thumb] - 0.3).abs() < 1e-6);
        assert!((out[Finger::Index] - 0.5).abs() < 1e-6);
        assert!((out[Finger::Middle] - 0.6).abs() < 1e-6);
        assert!((out[Finger::Ring] - 0.5).abs() < 1e-6);
        assert!((out[Finger::Pinky] - 1.0).abs() < 1e-6);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn set_deserializes_with_defaults() {
        let json = r#"{
            "thumb": {"locked": true, "min": 0.3, "max": 0.3},
            "index": {"min": 0.0, "max": 1.0},
            "middle": {"min": 0.0, "max": 1.0},
            "ring": {"min": 0.0, "max": 1.0},
            "pinky": {"min": 0.0, "max": 0.5}
        }"#;
        let set: PoseConstraintSet = serde_json::from_str(json).unwrap();
        assert!(set.thumb.locked);
        assert!(!set.index.locked);
        assert_eq!(set.target_pose_index, 0);
        assert!((set.pinky.remap(1.0) - 0.5).abs() < 1e-6);
    }
}
