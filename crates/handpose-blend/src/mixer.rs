#![forbid(unsafe_code)]

//! Top-level pose selection.
//!
//! A [`PoseMixer`] owns the blend graph, the smoother driver that animates
//! every finger channel, and one [`PoseNode`] per definition. The root is a
//! weighted selector over the pose outputs in pose-index order.
//!
//! # Invariants
//!
//! 1. Exactly one root input carries weight 1; every other input carries 0.
//! 2. `current_pose_index() < node_count()`.
//! 3. Switching poses is a hard cut: root weights are assigned, never
//!    interpolated. Only finger channels are smoothed.

use std::time::Duration;

use handpose_core::{
    DriverConfig, ExecutionMode, FINGER_COUNT, Finger, FingerValues, SmootherDriver,
    SmootherEvent,
};

use crate::channel::DEFAULT_HYSTERESIS;
use crate::definition::PoseDefinition;
use crate::error::{BlendError, BlendResult};
use crate::graph::{BlendGraph, NodeId};
use crate::pose_node::PoseNode;
use crate::skeleton::{BoneMask, HandSkeleton, SkeletalPose};

/// Construction parameters for a [`PoseMixer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerConfig {
    pub driver: DriverConfig,
    /// Dead band applied by every finger channel.
    pub hysteresis: f32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            driver: DriverConfig::default(),
            hysteresis: DEFAULT_HYSTERESIS,
        }
    }
}

impl MixerConfig {
    #[must_use]
    pub fn with_driver(mut self, driver: DriverConfig) -> Self {
        self.driver = driver;
        self
    }

    #[must_use]
    pub fn with_hysteresis(mut self, hysteresis: f32) -> Self {
        self.hysteresis = hysteresis;
        self
    }
}

/// Root selector over all poses of one hand.
#[derive(Debug, Clone)]
pub struct PoseMixer {
    graph: BlendGraph,
    driver: SmootherDriver,
    poses: Vec<PoseNode>,
    root: NodeId,
    current: usize,
    /// Owning (pose, finger) per smoother, indexed by `SmootherId::index`.
    bindings: Vec<Option<(usize, Finger)>>,
}

impl PoseMixer {
    /// Build one pose node per definition and select pose 0.
    pub fn build(
        definitions: &[PoseDefinition],
        finger_masks: &[BoneMask; FINGER_COUNT],
        config: MixerConfig,
    ) -> BlendResult<Self> {
        if definitions.is_empty() {
            return Err(BlendError::NoPoses);
        }
        let mut graph = BlendGraph::new();
        let mut driver = SmootherDriver::new(config.driver);
        let mut poses = Vec::with_capacity(definitions.len());
        let mut bindings = Vec::new();

        for (index, def) in definitions.iter().enumerate() {
            let node = PoseNode::build(
                def,
                finger_masks,
                config.hysteresis,
                &mut graph,
                &mut driver,
            )?;
            for channel in node.channels() {
                let slot = channel.smoother().index();
                if bindings.len() <= slot {
                    bindings.resize(slot + 1, None);
                }
                bindings[slot] = Some((index, channel.finger()));
            }
            poses.push(node);
        }

        let inputs: Vec<(NodeId, f32)> = poses
            .iter()
            .enumerate()
            .map(|(i, p)| (p.output(), if i == 0 { 1.0 } else { 0.0 }))
            .collect();
        let root = graph.add_mixer(&inputs)?;

        tracing::debug!(
            poses = poses.len(),
            nodes = graph.len(),
            smoothers = driver.len(),
            "built pose mixer"
        );
        Ok(Self {
            graph,
            driver,
            poses,
            root,
            current: 0,
            bindings,
        })
    }
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

impl PoseMixer {
    /// Hard-cut to pose `index` and push `fingers` into it.
    ///
    /// Returns `false` and changes nothing when `index` is out of range.
    pub fn set_current_pose(&mut self, index: usize, fingers: &FingerValues) -> bool {
        if index >= self.poses.len() {
            tracing::debug!(index, count = self.poses.len(), "ignoring invalid pose index");
            return false;
        }
        if index != self.current {
            tracing::debug!(
                from = self.current,
                to = index,
                pose = self.poses[index].name(),
                "switching pose"
            );
        }
        self.graph.set_input_weight(self.root, self.current, 0.0);
        self.graph.set_input_weight(self.root, index, 1.0);
        self.current = index;
        self.refresh(fingers);
        true
    }

    /// Write every finger value into the active pose.
    ///
    /// Writing the same values twice in a row leaves the same state as once.
    pub fn refresh(&mut self, fingers: &FingerValues) {
        for finger in Finger::ALL {
            self.write_finger(finger, fingers[finger]);
        }
        self.apply_events();
    }

    /// Write one finger value into the active pose.
    pub fn set_finger(&mut self, finger: Finger, value: f32) {
        self.write_finger(finger, value);
        self.apply_events();
    }

    fn write_finger(&mut self, finger: Finger, value: f32) {
        if let Some(node) = self.poses.get_mut(self.current) {
            node.set_finger(finger, value, &mut self.driver);
        }
    }

    /// Advance every channel smoother and apply the results to the graph.
    pub fn tick(&mut self, dt: Duration) {
        self.driver.tick(dt);
        self.apply_events();
    }

    /// Drain driver events into the owning channels.
    ///
    /// Returns the number of values applied.
    pub fn apply_events(&mut self) -> usize {
        let mut applied = 0;
        for event in self.driver.drain_events() {
            let SmootherEvent::Changed { id, value } = event else {
                continue;
            };
            let Some(&Some((pose, finger))) = self.bindings.get(id.index()) else {
                continue;
            };
            if let Some(channel) = self
                .poses
                .get_mut(pose)
                .and_then(|p| p.channel_mut(finger))
            {
                channel.apply(value, &mut self.graph);
                applied += 1;
            }
        }
        applied
    }

    /// Switch between tweened and immediate finger writes.
    pub fn set_execution_mode(&mut self, mode: ExecutionMode) {
        self.driver.set_mode(mode);
    }

    /// Evaluate the root against `skeleton`.
    pub fn evaluate(&self, skeleton: &HandSkeleton) -> BlendResult<SkeletalPose> {
        self.graph.evaluate(self.root, skeleton)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl PoseMixer {
    #[must_use]
    pub fn current_pose_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.poses.len()
    }

    /// Root weight of pose `index`.
    #[must_use]
    pub fn node_weight(&self, index: usize) -> Option<f32> {
        self.graph.input_weight(self.root, index)
    }

    #[must_use]
    pub fn pose(&self, index: usize) -> Option<&PoseNode> {
        self.poses.get(index)
    }

    #[must_use]
    pub fn current_pose(&self) -> &PoseNode {
        &self.poses[self.current]
    }

    #[must_use]
    pub fn poses(&self) -> &[PoseNode] {
        &self.poses
    }

    pub fn pose_names(&self) -> impl Iterator<Item = &str> {
        self.poses.iter().map(PoseNode::name)
    }

    #[must_use]
    pub fn graph(&self) -> &BlendGraph {
        &self.graph
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn driver(&self) -> &SmootherDriver {
        &self.driver
    }

    #[must_use]
    pub fn execution_mode(&self) -> ExecutionMode {
        self.driver.mode()
    }
}
