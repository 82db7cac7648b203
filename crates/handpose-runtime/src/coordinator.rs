#![forbid(unsafe_code)]

//! Applying authored constraint sets to hands.

use handpose_core::{HandSide, PoseConstraintSet};
use serde::{Deserialize, Serialize};

/// What a coordinator does to a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintMode {
    /// Hide the hand. The pose graph is left alone.
    Hide,
    /// Show the hand with identity remapping.
    #[default]
    Free,
    /// Show the hand with the set for its side.
    Constrained,
}

/// A hand that accepts constraint sets and visibility changes.
pub trait ConstrainedHand {
    fn side(&self) -> HandSide;
    fn set_constraints(&mut self, set: PoseConstraintSet);
    /// Restore identity remapping.
    fn clear_constraints(&mut self);
    fn set_visible(&mut self, visible: bool);
}

/// Holds one constraint set per side and pushes the right one to a hand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseConstraintCoordinator {
    left: PoseConstraintSet,
    right: PoseConstraintSet,
}

impl PoseConstraintCoordinator {
    #[must_use]
    pub fn new(left: PoseConstraintSet, right: PoseConstraintSet) -> Self {
        Self { left, right }
    }

    /// The same set on both sides.
    #[must_use]
    pub fn symmetric(set: PoseConstraintSet) -> Self {
        Self::new(set, set)
    }

    #[must_use]
    pub fn constraints_for(&self, side: HandSide) -> &PoseConstraintSet {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }

    pub fn set_constraints_for(&mut self, side: HandSide, set: PoseConstraintSet) {
        match side {
            HandSide::Left => self.left = set,
            HandSide::Right => self.right = set,
        }
    }

    pub fn apply_constraints<H>(&self, hand: &mut H, mode: ConstraintMode)
    where
        H: ConstrainedHand + ?Sized,
    {
        let side = hand.side();
        tracing::debug!(side = side.as_str(), ?mode, "applying constraints");
        match mode {
            ConstraintMode::Hide => hand.set_visible(false),
            ConstraintMode::Free => {
                hand.clear_constraints();
                hand.set_visible(true);
            }
            ConstraintMode::Constrained => {
                hand.set_constraints(*self.constraints_for(side));
                hand.set_visible(true);
            }
        }
    }

    /// Back to the free set, visible.
    pub fn remove_constraints<H: ConstrainedHand + ?Sized>(&self, hand: &mut H) {
        hand.clear_constraints();
        hand.set_visible(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handpose_core::{Finger, FingerConstraint};

    #[derive(Debug)]
    struct RecordingHand {
        side: HandSide,
        set: Option<PoseConstraintSet>,
        visible: bool,
        clears: usize,
    }

    impl RecordingHand {
        fn new(side: HandSide) -> Self {
            Self {
                side,
                set: None,
                visible: true,
                clears: 0,
            }
        }
    }

    impl ConstrainedHand for RecordingHand {
        fn side(&self) -> HandSide {
            self.side
        }
        fn set_constraints(&mut self, set: PoseConstraintSet) {
            self.set = Some(set);
        }
        fn clear_constraints(&mut self) {
            self.set = None;
            self.clears += 1;
        }
        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }
    }

    fn coordinator() -> PoseConstraintCoordinator {
        PoseConstraintCoordinator::new(
            PoseConstraintSet::free().with_target_pose(1),
            PoseConstraintSet::free()
                .with_finger(Finger::Thumb, FingerConstraint::locked_at(1.0))
                .with_target_pose(2),
        )
    }

    #[test]
    fn constrained_picks_the_hand_side() {
        let c = coordinator();
        let mut left = RecordingHand::new(HandSide::Left);
        let mut right = RecordingHand::new(HandSide::Right);
        c.apply_constraints(&mut left, ConstraintMode::Constrained);
        c.apply_constraints(&mut right, ConstraintMode::Constrained);
        assert_eq!(left.set.unwrap().target_pose_index, 1);
        assert_eq!(right.set.unwrap().target_pose_index, 2);
        assert!(right.set.unwrap().thumb.locked);
    }

    #[test]
    fn hide_only_touches_visibility() {
        let c = coordinator();
        let mut hand = RecordingHand::new(HandSide::Left);
        c.apply_constraints(&mut hand, ConstraintMode::Constrained);
        c.apply_constraints(&mut hand, ConstraintMode::Hide);
        assert!(!hand.visible);
        assert_eq!(hand.set.unwrap().target_pose_index, 1);
        assert_eq!(hand.clears, 0);
    }

    #[test]
    fn free_clears_and_shows() {
        let c = coordinator();
        let mut hand = RecordingHand::new(HandSide::Right);
        c.apply_constraints(&mut hand, ConstraintMode::Hide);
        c.apply_constraints(&mut hand, ConstraintMode::Free);
        assert!(hand.visible);
        assert!(hand.set.is_none());
        assert_eq!(hand.clears, 1);
    }

    #[test]
    fn remove_restores_visibility() {
        let c = coordinator();
        let mut hand = RecordingHand::new(HandSide::Left);
        c.apply_constraints(&mut hand, ConstraintMode::Constrained);
        c.apply_constraints(&mut hand, ConstraintMode::Hide);
        c.remove_constraints(&mut hand);
        assert!(hand.visible);
        assert!(hand.set.is_none());
    }
}
