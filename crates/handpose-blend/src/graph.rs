#![forbid(unsafe_code)]

//! Arena blend graph.
//!
//! Nodes live in a single `Vec` and refer to their inputs by [`NodeId`].
//! A node may only consume nodes created before it, so the graph is acyclic
//! by construction and evaluation is a plain recursive descent.
//!
//! # Node kinds
//!
//! - [`GraphNode::Clip`]: a sampled clip.
//! - [`GraphNode::Mixer`]: weight-normalized blend of its inputs. Inputs at
//!   zero weight are skipped; all-zero yields the rest pose.
//! - [`GraphNode::LayerMixer`]: starts from `base` (or rest) and applies each
//!   layer to the bones in its mask, either overriding
//!   (`lerp(current, layer, weight)`) or additively.
//!
//! # Failure Modes
//!
//! - Wiring an input that does not exist yet: `BlendError::UnknownNode`.
//! - Weight writes to a missing node or slot: ignored, return `false`.

use std::sync::Arc;

use crate::clip::AnimationClip;
use crate::error::{BlendError, BlendResult};
use crate::skeleton::{BoneMask, BoneTransform, HandSkeleton, SkeletalPose};

/// Handle to a node in a [`BlendGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One weighted input of a [`GraphNode::Mixer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerInput {
    pub node: NodeId,
    pub weight: f32,
}

/// One masked layer of a [`GraphNode::LayerMixer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub input: NodeId,
    pub mask: BoneMask,
    pub weight: f32,
    /// Add the layer's transform on top instead of replacing.
    pub additive: bool,
}

impl Layer {
    /// Full-weight override layer.
    #[must_use]
    pub fn overriding(input: NodeId, mask: BoneMask) -> Self {
        Self {
            input,
            mask,
            weight: 1.0,
            additive: false,
        }
    }
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphNode {
    Clip(Arc<AnimationClip>),
    Mixer {
        inputs: Vec<MixerInput>,
    },
    LayerMixer {
        base: Option<NodeId>,
        layers: Vec<Layer>,
    },
}

/// Arena of blend nodes.
#[derive(Debug, Clone, Default)]
pub struct BlendGraph {
    nodes: Vec<GraphNode>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl BlendGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self, id: NodeId) -> BlendResult<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(BlendError::UnknownNode(id))
        }
    }

    fn push(&mut self, node: GraphNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add a clip source.
    pub fn add_clip(&mut self, clip: Arc<AnimationClip>) -> NodeId {
        self.push(GraphNode::Clip(clip))
    }

    /// Add a mixer over existing nodes with initial weights.
    pub fn add_mixer(&mut self, inputs: &[(NodeId, f32)]) -> BlendResult<NodeId> {
        for &(node, _) in inputs {
            self.check(node)?;
        }
        let inputs = inputs
            .iter()
            .map(|&(node, weight)| MixerInput { node, weight })
            .collect();
        Ok(self.push(GraphNode::Mixer { inputs }))
    }

    /// Add a layer mixer over existing nodes.
    pub fn add_layer_mixer(
        &mut self,
        base: Option<NodeId>,
        layers: Vec<Layer>,
    ) -> BlendResult<NodeId> {
        if let Some(base) = base {
            self.check(base)?;
        }
        for layer in &layers {
            self.check(layer.input)?;
        }
        Ok(self.push(GraphNode::LayerMixer { base, layers }))
    }
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

impl BlendGraph {
    /// Set the weight of input `slot` on mixer `mixer`.
    pub fn set_input_weight(&mut self, mixer: NodeId, slot: usize, weight: f32) -> bool {
        match self.nodes.get_mut(mixer.0) {
            Some(GraphNode::Mixer { inputs }) => match inputs.get_mut(slot) {
                Some(input) => {
                    input.weight = weight;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Weight of input `slot` on mixer `mixer`.
    #[must_use]
    pub fn input_weight(&self, mixer: NodeId, slot: usize) -> Option<f32> {
        match self.nodes.get(mixer.0) {
            Some(GraphNode::Mixer { inputs }) => inputs.get(slot).map(|i| i.weight),
            _ => None,
        }
    }

    /// Set the weight of layer `slot` on layer mixer `mixer`.
    pub fn set_layer_weight(&mut self, mixer: NodeId, slot: usize, weight: f32) -> bool {
        match self.nodes.get_mut(mixer.0) {
            Some(GraphNode::LayerMixer { layers, .. }) => match layers.get_mut(slot) {
                Some(layer) => {
                    layer.weight = weight;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl BlendGraph {
    /// Evaluate `root` into a pose for `skeleton`.
    pub fn evaluate(&self, root: NodeId, skeleton: &HandSkeleton) -> BlendResult<SkeletalPose> {
        let node = self.node(root).ok_or(BlendError::UnknownNode(root))?;
        match node {
            GraphNode::Clip(clip) => Ok(clip.sample(skeleton)),
            GraphNode::Mixer { inputs } => self.evaluate_mixer(inputs, skeleton),
            GraphNode::LayerMixer { base, layers } => {
                self.evaluate_layers(*base, layers, skeleton)
            }
        }
    }

    fn evaluate_mixer(
        &self,
        inputs: &[MixerInput],
        skeleton: &HandSkeleton,
    ) -> BlendResult<SkeletalPose> {
        let live: Vec<&MixerInput> = inputs.iter().filter(|i| i.weight > 0.0).collect();
        match live.as_slice() {
            [] => Ok(skeleton.rest_pose()),
            // A lone input passes through untouched.
            [only] => self.evaluate(only.node, skeleton),
            _ => {
                let mut sampled = Vec::with_capacity(live.len());
                for input in &live {
                    sampled.push((self.evaluate(input.node, skeleton)?, input.weight));
                }
                let bones = (0..skeleton.len())
                    .map(|b| {
                        BoneTransform::weighted_sum(
                            sampled.iter().map(|(pose, w)| (&pose.bones[b], *w)),
                        )
                        .unwrap_or(BoneTransform::IDENTITY)
                    })
                    .collect();
                Ok(SkeletalPose { bones })
            }
        }
    }

    fn evaluate_layers(
        &self,
        base: Option<NodeId>,
        layers: &[Layer],
        skeleton: &HandSkeleton,
    ) -> BlendResult<SkeletalPose> {
        let mut pose = match base {
            Some(base) => self.evaluate(base, skeleton)?,
            None => skeleton.rest_pose(),
        };
        for layer in layers {
            if layer.weight <= 0.0 || layer.mask.count() == 0 {
                continue;
            }
            let sample = self.evaluate(layer.input, skeleton)?;
            for (b, current) in pose.bones.iter_mut().enumerate() {
                if !layer.mask.contains(b) {
                    continue;
                }
                let incoming = &sample.bones[b];
                *current = if layer.additive {
                    current.add_scaled(incoming, layer.weight)
                } else if layer.weight >= 1.0 {
                    *incoming
                } else {
                    current.lerp(incoming, layer.weight)
                };
            }
        }
        Ok(pose)
    }
}
