//! Entity scene store
//!
//! Flat struct-of-arrays storage indexed by node id, plus the component
//! types that live in it and the animation resource registry.

pub mod animation;
pub mod components;
pub mod store;

pub use animation::{bind_animation, AnimError, AnimHandle, Animation, AnimationLibrary, Channel};
pub use components::{
    AnimController, BoundingVolume, Light, LightKind, NodeFlags, Transform, ViewFlags,
};
pub use store::{Scene, SceneTree, TreeNode};
