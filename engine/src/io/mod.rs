//! Scene persistence

pub mod scene;

pub use scene::{load_scene, save_scene, SceneError, SceneFile};
