#![forbid(unsafe_code)]

//! Where raw finger curl values come from.
//!
//! The controller reads five values per hand each frame. Trackers, gloves,
//! scripted input, and tests all plug in through [`FingerValueSource`].

use std::cell::RefCell;
use std::rc::Rc;

use handpose_core::{Finger, FingerValues, HandSide};

/// Supplier of raw curl values (`0.0` open, `1.0` closed).
pub trait FingerValueSource {
    /// Current raw value for one finger of one hand.
    fn get(&self, side: HandSide, finger: Finger) -> f32;

    /// All five raw values for `side`.
    fn read(&self, side: HandSide) -> FingerValues {
        FingerValues(Finger::ALL.map(|f| self.get(side, f)))
    }
}

/// Shared sources: the host keeps one handle and writes into it while the
/// controller reads through another.
impl<T: FingerValueSource + ?Sized> FingerValueSource for Rc<RefCell<T>> {
    fn get(&self, side: HandSide, finger: Finger) -> f32 {
        self.borrow().get(side, finger)
    }
}

/// Stored per-hand values, set explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedFingerSource {
    left: FingerValues,
    right: FingerValues,
}

impl FixedFingerSource {
    /// Both hands fully open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same values on both hands.
    #[must_use]
    pub fn uniform(values: FingerValues) -> Self {
        Self {
            left: values,
            right: values,
        }
    }

    pub fn set(&mut self, side: HandSide, finger: Finger, value: f32) {
        self.values_mut(side)[finger] = value;
    }

    pub fn set_all(&mut self, side: HandSide, values: FingerValues) {
        *self.values_mut(side) = values;
    }

    #[must_use]
    pub fn values(&self, side: HandSide) -> FingerValues {
        match side {
            HandSide::Left => self.left,
            HandSide::Right => self.right,
        }
    }

    fn values_mut(&mut self, side: HandSide) -> &mut FingerValues {
        match side {
            HandSide::Left => &mut self.left,
            HandSide::Right => &mut self.right,
        }
    }
}

impl FingerValueSource for FixedFingerSource {
    fn get(&self, side: HandSide, finger: Finger) -> f32 {
        self.values(side)[finger]
    }
}

/// Adapter for closures `Fn(HandSide, Finger) -> f32`.
pub struct FnFingerSource<F>(pub F);

impl<F> FnFingerSource<F>
where
    F: Fn(HandSide, Finger) -> f32,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> FingerValueSource for FnFingerSource<F>
where
    F: Fn(HandSide, Finger) -> f32,
{
    fn get(&self, side: HandSide, finger: Finger) -> f32 {
        (self.0)(side, finger)
    }
}

impl<F> std::fmt::Debug for FnFingerSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnFingerSource(..)")
    }
}
