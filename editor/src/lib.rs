//! ImGui-based scene editor
//!
//! Selection, GPU picking, the transform gizmo and the per-frame panel
//! orchestration, all driven through an explicit editor session context.

pub mod camera;
pub mod editor_state;
pub mod frontend;
pub mod gizmo;
pub mod overlay;
pub mod panels;
pub mod picking;
pub mod scene_operations;
pub mod selection;
pub mod settings;

pub use editor_state::{EditorContext, SceneView, TransformMode};
pub use selection::{PickMode, SelectionSet};
