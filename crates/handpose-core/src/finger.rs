#![forbid(unsafe_code)]

//! Fingers, hand sides, and per-finger value storage.

use std::fmt;
use std::ops::{Index, IndexMut};

use bitflags::bitflags;

/// Number of fingers on a hand.
pub const FINGER_COUNT: usize = 5;

/// One finger of a hand, in thumb-to-pinky order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers, ordered by [`Finger::index`].
    pub const ALL: [Finger; FINGER_COUNT] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Position of this finger in per-finger arrays (0–4).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Finger at `index`, or `None` when out of range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Finger> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name, used in logs and asset files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which hand a controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    /// The other hand.
    #[must_use]
    pub const fn opposite(self) -> HandSide {
        match self {
            HandSide::Left => HandSide::Right,
            HandSide::Right => HandSide::Left,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }
}

impl fmt::Display for HandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of fingers, used to build bone masks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FingerSet: u8 {
        const THUMB = 1 << 0;
        const INDEX = 1 << 1;
        const MIDDLE = 1 << 2;
        const RING = 1 << 3;
        const PINKY = 1 << 4;
    }
}

impl FingerSet {
    /// Whether `finger` is in the set.
    #[inline]
    #[must_use]
    pub fn has(self, finger: Finger) -> bool {
        self.contains(FingerSet::from(finger))
    }
}

impl From<Finger> for FingerSet {
    fn from(finger: Finger) -> Self {
        FingerSet::from_bits_truncate(1 << finger.index())
    }
}

/// Curl values for all five fingers (0 = extended, 1 = curled).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FingerValues(pub [f32; FINGER_COUNT]);

impl FingerValues {
    /// All fingers extended.
    pub const ZERO: FingerValues = FingerValues([0.0; FINGER_COUNT]);

    #[must_use]
    pub const fn new(values: [f32; FINGER_COUNT]) -> Self {
        Self(values)
    }

    /// Iterate `(finger, value)` pairs in finger order.
    pub fn iter(&self) -> impl Iterator<Item = (Finger, f32)> + '_ {
        Finger::ALL.iter().map(move |&f| (f, self.0[f.index()]))
    }
}

impl Index<Finger> for FingerValues {
    type Output = f32;

    fn index(&self, finger: Finger) -> &f32 {
        &self.0[finger.index()]
    }
}

impl IndexMut<Finger> for FingerValues {
    fn index_mut(&mut self, finger: Finger) -> &mut f32 {
        &mut self.0[finger.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_from_index() {
        for finger in Finger::ALL {
            assert_eq!(Finger::from_index(finger.index()), Some(finger));
        }
        assert_eq!(Finger::from_index(FINGER_COUNT), None);
    }

    #[test]
    fn finger_set_from_finger_is_single_bit() {
        let set = FingerSet::from(Finger::Ring);
        assert_eq!(set, FingerSet::RING);
        assert!(set.has(Finger::Ring));
        assert!(!set.has(Finger::Pinky));
        assert_eq!(FingerSet::all().bits().count_ones(), FINGER_COUNT as u32);
    }

    #[test]
    fn opposite_side() {
        assert_eq!(HandSide::Left.opposite(), HandSide::Right);
        assert_eq!(HandSide::Right.opposite(), HandSide::Left);
    }

    #[test]
    fn finger_values_index_by_finger() {
        let mut values = FingerValues::ZERO;
        values[Finger::Middle] = 0.6;
        assert!((values[Finger::Middle] - 0.6).abs() < f32::EPSILON);
        assert!((values.0[2] - 0.6).abs() < f32::EPSILON);
        let collected: Vec<_> = values.iter().map(|(f, _)| f).collect();
        assert_eq!(collected, Finger::ALL.to_vec());
    }
}
