//! Property tests for constraint remapping.

use handpose_core::{Finger, FingerConstraint, FingerValues, PoseConstraintSet};
use proptest::prelude::*;

fn constraint() -> impl Strategy<Value = FingerConstraint> {
    (any::<bool>(), 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(locked, min, max)| FingerConstraint {
        locked,
        min,
        max,
    })
}

proptest! {
    #[test]
    fn unlocked_remap_is_affine(min in 0.0f32..=1.0, max in 0.0f32..=1.0, v in 0.0f32..=1.0) {
        let c = FingerConstraint { locked: false, min, max };
        let expected = (max - min) * v + min;
        prop_assert!((c.remap(v) - expected).abs() < 1e-6);
    }

    #[test]
    fn locked_remap_is_min(min in 0.0f32..=1.0, max in 0.0f32..=1.0, v in 0.0f32..=1.0) {
        let c = FingerConstraint { locked: true, min, max };
        prop_assert_eq!(c.remap(v), min);
    }

    #[test]
    fn ordered_range_stays_inside_bounds(a in 0.0f32..=1.0, b in 0.0f32..=1.0, v in 0.0f32..=1.0) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let out = FingerConstraint::range(min, max).remap(v);
        prop_assert!(out >= min - 1e-6 && out <= max + 1e-6);
    }

    #[test]
    fn set_remap_matches_per_finger_remap(
        cs in proptest::array::uniform5(constraint()),
        raw in proptest::array::uniform5(0.0f32..=1.0),
    ) {
        let mut set = PoseConstraintSet::free();
        for (finger, c) in Finger::ALL.into_iter().zip(cs) {
            set[finger] = c;
        }
        let out = set.remap_all(&FingerValues(raw));
        for finger in Finger::ALL {
            prop_assert_eq!(out[finger], cs[finger.index()].remap(raw[finger.index()]));
        }
    }
}
