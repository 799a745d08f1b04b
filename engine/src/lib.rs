//! Scene engine core
//!
//! This crate provides the data side of the engine: the struct-of-arrays
//! scene store, camera and projection maths, input state tracking, debug
//! draw primitives, and the contracts the external renderer is driven
//! through (render targets, asynchronous readback).

pub mod core;
pub mod dev;
pub mod graphics;
pub mod input;
pub mod io;
pub mod scene;

// Re-export commonly used types
pub mod prelude {
    // Scene store types
    pub use crate::scene::{
        bind_animation, AnimController, AnimHandle, Animation, AnimationLibrary, BoundingVolume,
        Light, LightKind, NodeFlags, Scene, SceneTree, Transform, TreeNode, ViewFlags,
    };

    // Camera types
    pub use crate::core::camera::{Camera, ProjectionMode};

    // Math types
    pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

    // Graphics contracts
    pub use crate::graphics::{
        ReadbackRequest, RenderBackend, RenderTargetDesc, RenderTargetRegistry, PICKING_TARGET,
    };

    // IO types
    pub use crate::io::{load_scene, save_scene, SceneError};

    // Input types
    pub use crate::input::InputState;

    // Debug draw
    pub use crate::dev::DebugDraw;
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
