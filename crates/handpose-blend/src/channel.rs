#![forbid(unsafe_code)]

//! Per-finger open/closed blend channel.
//!
//! A channel owns a 2-input mixer (open clip, closed clip), a fixed bone mask,
//! and a smoother in the pose mixer's driver. Writing a weight retargets the
//! smoother; smoothed values come back through driver events and are applied
//! to the mixer as `open = 1 - w`, `closed = w`.
//!
//! # Invariants
//!
//! 1. Writes within `hysteresis` of the current weight do not touch the
//!    smoother, so sensor jitter never restarts a tween.
//! 2. The mask is set at construction and never changes.

use handpose_core::{Finger, SmootherDriver, SmootherId};

use crate::error::BlendResult;
use crate::graph::{BlendGraph, NodeId};
use crate::skeleton::BoneMask;

/// Default dead band for weight writes.
pub const DEFAULT_HYSTERESIS: f32 = 0.01;

const OPEN_SLOT: usize = 0;
const CLOSED_SLOT: usize = 1;

/// Open/closed blend for one finger.
#[derive(Debug, Clone)]
pub struct FingerBlendChannel {
    finger: Finger,
    blend: NodeId,
    mask: BoneMask,
    smoother: SmootherId,
    /// Last smoothed value applied to the blend.
    weight: f32,
    hysteresis: f32,
}

impl FingerBlendChannel {
    /// Wire a new channel between `open` and `closed`, starting fully open.
    pub fn new(
        finger: Finger,
        open: NodeId,
        closed: NodeId,
        mask: BoneMask,
        hysteresis: f32,
        graph: &mut BlendGraph,
        driver: &mut SmootherDriver,
    ) -> BlendResult<Self> {
        let blend = graph.add_mixer(&[(open, 1.0), (closed, 0.0)])?;
        let smoother = driver.spawn(0.0);
        Ok(Self {
            finger,
            blend,
            mask,
            smoother,
            weight: 0.0,
            hysteresis,
        })
    }

    /// Retarget the smoothed weight. Returns whether the smoother was touched.
    pub fn set_weight(&mut self, target: f32, driver: &mut SmootherDriver) -> bool {
        if (target - self.weight).abs() <= self.hysteresis {
            return false;
        }
        driver.set_target(self.smoother, target);
        true
    }

    /// Push a smoothed value into the blend node.
    pub fn apply(&mut self, value: f32, graph: &mut BlendGraph) {
        self.weight = value;
        graph.set_input_weight(self.blend, OPEN_SLOT, 1.0 - value);
        graph.set_input_weight(self.blend, CLOSED_SLOT, value);
    }

    #[must_use]
    pub fn finger(&self) -> Finger {
        self.finger
    }

    /// The 2-input mixer feeding this channel's layer.
    #[must_use]
    pub fn blend_node(&self) -> NodeId {
        self.blend
    }

    #[must_use]
    pub fn mask(&self) -> &BoneMask {
        &self.mask
    }

    #[must_use]
    pub fn smoother(&self) -> SmootherId {
        self.smoother
    }

    /// Current smoothed weight (0 = open, 1 = closed).
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Weight the smoother is heading toward.
    #[must_use]
    pub fn target(&self, driver: &SmootherDriver) -> f32 {
        driver
            .get(self.smoother)
            .map_or(self.weight, |s| s.target())
    }
}
