//! Editor session state
//!
//! Everything the per-frame editor entry point needs lives in
//! [`EditorContext`]; there are no globals. The context is created once at
//! startup and threaded through the frontend.

use engine::prelude::{AnimationLibrary, Mat4, SceneTree, Vec2};

use crate::camera::OrbitCamera;
use crate::gizmo::Gizmo;
use crate::picking::Picking;
use crate::selection::SelectionSet;
use crate::settings::EditorSettings;

/// Active transform tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    None,
    Select,
    Translate,
    Rotate,
    Scale,
    /// Values entered through the transform panel
    TypeIn,
}

impl TransformMode {
    /// Toolbar buttons in display order with their labels
    pub const TOOLBAR: [(Self, &'static str); 4] = [
        (Self::Select, "Select [Q]"),
        (Self::Translate, "Move [W]"),
        (Self::Rotate, "Rotate [E]"),
        (Self::Scale, "Scale [R]"),
    ];
}

/// Camera matrices and viewport size for the frame being edited
#[derive(Debug, Clone, Copy)]
pub struct SceneView {
    pub view: Mat4,
    pub proj: Mat4,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

/// Window visibility and per-panel scratch state
#[derive(Debug, Default)]
pub struct UiState {
    pub scene_browser_open: bool,
    pub selection_list_open: bool,
    pub view_menu_open: bool,
    pub camera_menu_open: bool,
    /// Flat list instead of hierarchy in the scene browser
    pub list_view: bool,
    /// Hierarchy cache, rebuilt when the store reports a dirty tree
    pub tree: SceneTree,
    /// Rename buffer and the node it belongs to
    pub name_buffer: String,
    pub name_buffer_node: Option<u32>,
    /// Ctrl+D fires on release, armed while the chord is held
    pub duplicate_pending: bool,
    pub auto_load_done: bool,
    /// Mouse position at the end of the previous frame
    pub prev_mouse: (f32, f32),
}

/// All editor state threaded through the frontend each frame
pub struct EditorContext {
    pub selection: SelectionSet,
    pub picking: Picking,
    pub gizmo: Gizmo,
    pub transform_mode: TransformMode,
    pub camera: OrbitCamera,
    pub settings: EditorSettings,
    pub anim_library: AnimationLibrary,
    pub ui: UiState,
}

impl EditorContext {
    /// Create a session with persisted settings applied
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::load())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            selection: SelectionSet::new(),
            picking: Picking::new(),
            gizmo: Gizmo::default(),
            transform_mode: TransformMode::Select,
            camera: OrbitCamera::default(),
            settings,
            anim_library: AnimationLibrary::new(),
            ui: UiState {
                scene_browser_open: true,
                ..Default::default()
            },
        }
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new()
    }
}
