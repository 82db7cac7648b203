#![forbid(unsafe_code)]

//! Playable poses.
//!
//! [`PoseNode`] is the uniform surface the mixer drives: every pose exposes
//! its output node and accepts per-finger writes. Static poses ignore finger
//! writes; dynamic poses forward them to the matching channel.

use handpose_core::{FINGER_COUNT, Finger, SmootherDriver};

use crate::channel::FingerBlendChannel;
use crate::definition::{PoseDefinition, PoseKind};
use crate::error::{BlendError, BlendResult};
use crate::graph::{BlendGraph, Layer, NodeId};
use crate::skeleton::BoneMask;

/// A fixed gesture: one clip, no finger control.
#[derive(Debug, Clone)]
pub struct StaticPoseNode {
    name: String,
    source: NodeId,
}

impl StaticPoseNode {
    pub fn new(definition: &PoseDefinition, graph: &mut BlendGraph) -> Self {
        let source = graph.add_clip(definition.open_clip().clone());
        Self {
            name: definition.name().to_string(),
            source,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped clip node.
    #[must_use]
    pub fn source(&self) -> NodeId {
        self.source
    }
}

/// Five open/closed channels layered over the open clip.
///
/// Wrist and palm come from the open clip; each finger chain is overridden by
/// exactly one channel.
#[derive(Debug, Clone)]
pub struct DynamicPoseNode {
    name: String,
    output: NodeId,
    /// Indexed by [`Finger::index`].
    channels: Vec<FingerBlendChannel>,
}

impl DynamicPoseNode {
    pub fn new(
        definition: &PoseDefinition,
        finger_masks: &[BoneMask; FINGER_COUNT],
        hysteresis: f32,
        graph: &mut BlendGraph,
        driver: &mut SmootherDriver,
    ) -> BlendResult<Self> {
        let closed_clip = definition.closed_clip().ok_or_else(|| {
            BlendError::MissingClosedClip {
                pose: definition.name().to_string(),
            }
        })?;
        let open = graph.add_clip(definition.open_clip().clone());
        let closed = graph.add_clip(closed_clip.clone());

        let mut channels = Vec::with_capacity(FINGER_COUNT);
        for finger in Finger::ALL {
            channels.push(FingerBlendChannel::new(
                finger,
                open,
                closed,
                finger_masks[finger.index()].clone(),
                hysteresis,
                graph,
                driver,
            )?);
        }
        let layers = channels
            .iter()
            .map(|ch| Layer::overriding(ch.blend_node(), ch.mask().clone()))
            .collect();
        let output = graph.add_layer_mixer(Some(open), layers)?;

        Ok(Self {
            name: definition.name().to_string(),
            output,
            channels,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layer mixer combining the channels.
    #[must_use]
    pub fn output(&self) -> NodeId {
        self.output
    }

    #[must_use]
    pub fn channel(&self, finger: Finger) -> &FingerBlendChannel {
        &self.channels[finger.index()]
    }

    pub fn channel_mut(&mut self, finger: Finger) -> &mut FingerBlendChannel {
        &mut self.channels[finger.index()]
    }

    #[must_use]
    pub fn channels(&self) -> &[FingerBlendChannel] {
        &self.channels
    }

    /// Retarget one finger's channel.
    pub fn set_finger(&mut self, finger: Finger, value: f32, driver: &mut SmootherDriver) {
        self.channels[finger.index()].set_weight(value, driver);
    }
}

/// One pose in the mixer.
#[derive(Debug, Clone)]
pub enum PoseNode {
    Static(StaticPoseNode),
    Dynamic(DynamicPoseNode),
}

impl PoseNode {
    /// Build the node matching `definition`'s kind.
    pub fn build(
        definition: &PoseDefinition,
        finger_masks: &[BoneMask; FINGER_COUNT],
        hysteresis: f32,
        graph: &mut BlendGraph,
        driver: &mut SmootherDriver,
    ) -> BlendResult<Self> {
        Ok(match definition.kind() {
            PoseKind::Static => PoseNode::Static(StaticPoseNode::new(definition, graph)),
            PoseKind::Dynamic => PoseNode::Dynamic(DynamicPoseNode::new(
                definition,
                finger_masks,
                hysteresis,
                graph,
                driver,
            )?),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            PoseNode::Static(n) => n.name(),
            PoseNode::Dynamic(n) => n.name(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PoseKind {
        match self {
            PoseNode::Static(_) => PoseKind::Static,
            PoseNode::Dynamic(_) => PoseKind::Dynamic,
        }
    }

    /// Node whose output feeds the pose mixer.
    #[must_use]
    pub fn output(&self) -> NodeId {
        match self {
            PoseNode::Static(n) => n.source(),
            PoseNode::Dynamic(n) => n.output(),
        }
    }

    /// Per-finger write. A no-op for static poses.
    pub fn set_finger(&mut self, finger: Finger, value: f32, driver: &mut SmootherDriver) {
        if let PoseNode::Dynamic(n) = self {
            n.set_finger(finger, value, driver);
        }
    }

    /// Channels of a dynamic pose; empty for static poses.
    #[must_use]
    pub fn channels(&self) -> &[FingerBlendChannel] {
        match self {
            PoseNode::Static(_) => &[],
            PoseNode::Dynamic(n) => n.channels(),
        }
    }

    #[must_use]
    pub fn channel(&self, finger: Finger) -> Option<&FingerBlendChannel> {
        self.channels().get(finger.index())
    }

    pub fn channel_mut(&mut self, finger: Finger) -> Option<&mut FingerBlendChannel> {
        match self {
            PoseNode::Static(_) => None,
            PoseNode::Dynamic(n) => Some(n.channel_mut(finger)),
        }
    }
}
