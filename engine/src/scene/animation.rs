//! Animation resources and rig binding
//!
//! Animations live in a library keyed by handle; binding one to a node
//! validates its channel targets against the node's rig before the handle
//! is attached. Binary animation formats are loaded elsewhere - the
//! library itself consumes a JSON channel description.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info};

use super::components::NodeFlags;
use super::store::Scene;

/// Handle into an [`AnimationLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimHandle(pub u32);

/// One animated channel, targeting a rig joint by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    /// Name of the joint this channel drives
    pub target: String,
}

/// A loaded animation resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Animation {
    pub name: String,
    pub channels: Vec<Channel>,
    /// Playback length in frames
    pub frame_count: u32,
}

/// Errors from animation loading and binding
#[derive(Debug, thiserror::Error)]
pub enum AnimError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown animation handle {0:?}")]
    UnknownHandle(AnimHandle),
    #[error("node {0} is not allocated")]
    InvalidNode(u32),
    #[error("animation '{0}' does not fit the rig")]
    IncompatibleRig(String),
}

impl Animation {
    /// Load an animation from a JSON channel description
    pub fn from_file(path: &Path) -> Result<Self, AnimError> {
        let content = std::fs::read_to_string(path)?;
        let anim: Animation = serde_json::from_str(&content)?;
        info!(name = %anim.name, channels = anim.channels.len(), "loaded animation");
        Ok(anim)
    }
}

/// Registry of loaded animations
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    animations: Vec<Animation>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation, returning its handle
    pub fn insert(&mut self, animation: Animation) -> AnimHandle {
        self.animations.push(animation);
        AnimHandle(self.animations.len() as u32 - 1)
    }

    pub fn get(&self, handle: AnimHandle) -> Option<&Animation> {
        self.animations.get(handle.0 as usize)
    }

    /// All registered animations with their handles
    pub fn iter(&self) -> impl Iterator<Item = (AnimHandle, &Animation)> {
        self.animations
            .iter()
            .enumerate()
            .map(|(i, a)| (AnimHandle(i as u32), a))
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

/// Collect a node's joint list: the node and its descendants in index order.
pub fn build_joint_list(scene: &Scene, root: u32) -> Vec<u32> {
    let mut joints = Vec::new();
    for node in 0..scene.node_count() {
        if !scene.is_allocated(node) {
            continue;
        }
        if node == root || scene.is_ancestor(root, node) {
            joints.push(node);
        }
    }
    joints
}

/// Bind an animation to a node's rig.
///
/// Channel targets are matched against the rig's bone names in joint-list
/// order; the first mismatch discards the handle with an error-severity
/// log. Compatible handles are attached once, setting the node's
/// ANIM_CONTROLLER flag and joints offset.
pub fn bind_animation(
    scene: &mut Scene,
    node: u32,
    handle: AnimHandle,
    library: &AnimationLibrary,
) -> Result<(), AnimError> {
    if !scene.is_allocated(node) {
        return Err(AnimError::InvalidNode(node));
    }

    let anim = library
        .get(handle)
        .ok_or(AnimError::UnknownHandle(handle))?;

    let joints = build_joint_list(scene, node);

    let mut channel_index = 0usize;
    // The scene tree carries one non-joint node above the rig
    let mut joints_offset: i32 = -1;
    for &joint in &joints {
        let i = joint as usize;
        if scene.flags[i].contains(NodeFlags::BONE) {
            let target = anim
                .channels
                .get(channel_index)
                .map(|c| c.target.as_str())
                .unwrap_or("");
            if target != scene.names[i] {
                error!(
                    animation = %anim.name,
                    joint = %scene.names[i],
                    channel = channel_index,
                    "animation does not fit rig"
                );
                return Err(AnimError::IncompatibleRig(anim.name.clone()));
            }
            channel_index += 1;
        } else {
            joints_offset += 1;
        }
    }

    let controller = &mut scene.anim_controllers[node as usize];
    controller.joints_offset = joints_offset;
    if !controller.handles.contains(&handle) {
        controller.handles.push(handle);
    }
    scene.flags[node as usize].insert(NodeFlags::ANIM_CONTROLLER);
    info!(animation = %anim.name, node, "bound animation");
    Ok(())
}
