//! Per-frame editor orchestration
//!
//! `update_editor` is the single entry point the host application calls
//! each frame: menus and panels, keyboard shortcuts, picking, the
//! transform widget, debug overlays and finally the scene update. All
//! state lives in the [`EditorContext`].

use engine::prelude::{DebugDraw, InputState, RenderBackend, Scene};
use imgui::StyleColor;
use tracing::{debug, info};
use winit::keyboard::KeyCode;

use crate::editor_state::{EditorContext, SceneView, TransformMode};
use crate::gizmo::selection_bounds;
use crate::overlay::draw_overlays;
use crate::panels::{camera_panel, scene_browser_panel, selection_list_panel, view_panel};
use crate::scene_operations::{import_animation_dialog, open_scene_dialog, save_scene_dialog};
use crate::selection::SelectionSet;

const NAME_SUFFIX_DUPLICATE: &str = "_dup";

/// Run the editor for one frame
#[allow(clippy::too_many_arguments)]
pub fn update_editor(
    ui: &imgui::Ui,
    ctx: &mut EditorContext,
    scene: &mut Scene,
    input: &InputState,
    backend: &dyn RenderBackend,
    view: &SceneView,
    dbg: &mut DebugDraw,
    dt: f32,
) {
    if !ctx.ui.auto_load_done {
        ctx.ui.auto_load_done = true;
        if ctx.settings.auto_load_last_scene {
            if let Some(path) = ctx.settings.last_loaded_scene.clone() {
                info!(path = %path.display(), "auto-loading last scene");
                crate::scene_operations::load_scene_path(
                    &path,
                    scene,
                    &mut ctx.selection,
                    &mut ctx.settings,
                );
            }
        }
    }

    main_menu(ui, ctx, scene);
    toolbar(ui, ctx);

    let keyboard_free = !ui.io().want_capture_keyboard;
    if keyboard_free {
        transform_shortcuts(input, &mut ctx.transform_mode);

        if input.key_pressed(KeyCode::KeyP) {
            reparent_selection(scene, &ctx.selection);
        }

        if input.key_pressed(KeyCode::KeyF) {
            if let Some((centroid, min, max)) = selection_bounds(scene, ctx.selection.as_slice()) {
                ctx.camera.focus_on(centroid, max - min);
            }
        }

        handle_duplicate(scene, &mut ctx.selection, input, &mut ctx.ui.duplicate_pending);
    }

    // The widget runs before picking so its latch can gate this frame's
    // click
    let selected: Vec<u32> = ctx.selection.as_slice().to_vec();
    ctx.gizmo
        .transform_widget(scene, &selected, ctx.transform_mode, input, view, dbg);

    let ui_capture = ui.io().want_capture_mouse;
    if !input.alt_down() && !ctx.gizmo.widget_selected {
        ctx.picking.update(
            scene,
            &mut ctx.selection,
            input,
            ui_capture,
            backend,
            (view.viewport.x as u32, view.viewport.y as u32),
        );
    }

    scene_browser_panel(
        ui,
        scene,
        &mut ctx.selection,
        &mut ctx.ui,
        &mut ctx.transform_mode,
        &ctx.anim_library,
    );
    selection_list_panel(ui, scene, &mut ctx.selection, &mut ctx.ui);
    view_panel(ui, scene, &mut ctx.ui);
    camera_panel(ui, &mut ctx.camera, &mut ctx.ui);

    ctx.selection.prune(scene);
    draw_overlays(scene, &ctx.selection, view, dbg);

    if !ui_capture {
        ctx.camera.update(input, ctx.ui.prev_mouse, dt);
    }
    ctx.ui.prev_mouse = input.mouse_position;

    scene.update(dt);
}

fn main_menu(ui: &imgui::Ui, ctx: &mut EditorContext, scene: &mut Scene) {
    ui.main_menu_bar(|| {
        ui.menu("File", || {
            if ui.menu_item("Open Scene...") {
                open_scene_dialog(scene, &mut ctx.selection, &mut ctx.settings);
            }
            if ui.menu_item("Save Scene...") {
                save_scene_dialog(scene, &mut ctx.settings);
            }
            ui.separator();
            if ui.menu_item("Import Animation...") {
                import_animation_dialog(&mut ctx.anim_library, &ctx.settings);
            }
        });
        ui.menu("Window", || {
            toggle_item(ui, "Scene Browser", &mut ctx.ui.scene_browser_open);
            toggle_item(ui, "Selection List", &mut ctx.ui.selection_list_open);
            toggle_item(ui, "View", &mut ctx.ui.view_menu_open);
            toggle_item(ui, "Camera", &mut ctx.ui.camera_menu_open);
        });
    });
}

fn toggle_item(ui: &imgui::Ui, label: &str, open: &mut bool) {
    if ui.menu_item_config(label).selected(*open).build() {
        *open = !*open;
    }
}

fn toolbar(ui: &imgui::Ui, ctx: &mut EditorContext) {
    ui.window("##toolbar")
        .size([260.0, 40.0], imgui::Condition::FirstUseEver)
        .title_bar(false)
        .resizable(false)
        .build(|| {
            for (mode, label) in TransformMode::TOOLBAR {
                if state_button(ui, label, ctx.transform_mode == mode) {
                    ctx.transform_mode = mode;
                }
                ui.same_line();
            }
        });
}

/// Button that stays highlighted while its state is active
fn state_button(ui: &imgui::Ui, label: &str, active: bool) -> bool {
    let token = active.then(|| {
        ui.push_style_color(StyleColor::Button, ui.style_color(StyleColor::ButtonActive))
    });
    let clicked = ui.button(label);
    drop(token);
    clicked
}

/// Q/W/E/R tool switching
fn transform_shortcuts(input: &InputState, mode: &mut TransformMode) {
    let bindings = [
        (KeyCode::KeyQ, TransformMode::Select),
        (KeyCode::KeyW, TransformMode::Translate),
        (KeyCode::KeyE, TransformMode::Rotate),
        (KeyCode::KeyR, TransformMode::Scale),
    ];
    for (key, m) in bindings {
        if input.key_pressed(key) {
            *mode = m;
        }
    }
}

/// Parent every other selected root under the primary selection.
///
/// Nodes that already have a parent are left alone, as is any node whose
/// reparenting would make it its own ancestor.
pub fn reparent_selection(scene: &mut Scene, selection: &SelectionSet) {
    let Some(primary) = selection.primary() else {
        return;
    };

    for node in selection.iter().skip(1) {
        if !scene.is_allocated(node) || scene.parents[node as usize] != node {
            continue;
        }
        if node == primary || scene.is_ancestor(node, primary) {
            continue;
        }
        scene.set_parent(node, primary);
        debug!(node, parent = primary, "reparented");
    }
}

/// Ctrl+D duplicates the selection hierarchically. The clone fires on
/// release so holding the chord cannot spawn one copy per frame.
pub fn handle_duplicate(
    scene: &mut Scene,
    selection: &mut SelectionSet,
    input: &InputState,
    pending: &mut bool,
) {
    if input.ctrl_down() && input.key_down(KeyCode::KeyD) {
        *pending = true;
        return;
    }

    if *pending {
        *pending = false;
        let clones = scene.clone_hierarchical(selection.as_slice(), NAME_SUFFIX_DUPLICATE);
        if !clones.is_empty() {
            info!(count = clones.len(), "duplicated selection");
            selection.replace(clones);
        }
    }
}
