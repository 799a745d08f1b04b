//! Scene browser panel
//!
//! Hierarchy (or flat list) of all allocated nodes with per-node editing
//! for the primary selection: rename, transform type-in, light component
//! and animation binding. The tree view renders from the store's cached
//! hierarchy and only rebuilds when the store reports it dirty.

use engine::prelude::{LightKind, NodeFlags, Scene, TreeNode, Vec3, Vec4};
use imgui::TreeNodeFlags;
use tracing::debug;

use crate::editor_state::{TransformMode, UiState};
use crate::gizmo::apply_to_selection;
use crate::panels::anim::anim_section;
use crate::scene_operations::add_empty_node;
use crate::selection::{PickMode, SelectionSet};

/// Render the scene browser window
pub fn scene_browser_panel(
    ui: &imgui::Ui,
    scene: &mut Scene,
    selection: &mut SelectionSet,
    ui_state: &mut UiState,
    transform_mode: &mut TransformMode,
    anim_library: &engine::prelude::AnimationLibrary,
) {
    if !ui_state.scene_browser_open {
        return;
    }

    if scene.take_tree_dirty() {
        ui_state.tree = scene.build_tree();
    }

    let mut open = ui_state.scene_browser_open;
    ui.window("Scene Browser")
        .opened(&mut open)
        .size([300.0, 400.0], imgui::Condition::FirstUseEver)
        .build(|| {
            if ui.button("+") {
                let node = add_empty_node(scene);
                selection.add(node, PickMode::Normal, scene.node_count());
            }
            ui.same_line();
            ui.checkbox("List View", &mut ui_state.list_view);
            ui.separator();

            if ui_state.list_view {
                for node in 0..scene.node_count() {
                    if !scene.is_allocated(node) {
                        continue;
                    }
                    node_selectable(ui, scene, selection, node);
                }
            } else {
                let roots = ui_state.tree.roots.clone();
                for root in &roots {
                    node_tree(ui, scene, selection, root);
                }
            }

            if let Some(primary) = selection.primary() {
                if scene.is_allocated(primary) {
                    ui.separator();
                    node_editor(ui, scene, selection, ui_state, transform_mode, primary);
                    anim_section(ui, scene, primary, anim_library);
                }
            }
        });
    ui_state.scene_browser_open = open;
}

fn node_selectable(ui: &imgui::Ui, scene: &Scene, selection: &mut SelectionSet, node: u32) {
    let label = format!("{}##{}", scene.names[node as usize], node);
    if ui
        .selectable_config(&label)
        .selected(selection.contains(node))
        .build()
    {
        let mode = if ui.io().key_ctrl {
            PickMode::Add
        } else {
            PickMode::Normal
        };
        selection.add(node, mode, scene.node_count());
        debug!(node, "selected from browser");
    }
}

fn node_tree(ui: &imgui::Ui, scene: &Scene, selection: &mut SelectionSet, tree: &TreeNode) {
    if tree.children.is_empty() {
        node_selectable(ui, scene, selection, tree.node);
        return;
    }

    let mut flags = TreeNodeFlags::DEFAULT_OPEN;
    if selection.contains(tree.node) {
        flags |= TreeNodeFlags::SELECTED;
    }

    let label = format!("{}##{}", scene.names[tree.node as usize], tree.node);
    let token = ui.tree_node_config(&label).flags(flags).push();
    if ui.is_item_clicked() {
        let mode = if ui.io().key_ctrl {
            PickMode::Add
        } else {
            PickMode::Normal
        };
        selection.add(tree.node, mode, scene.node_count());
    }

    if let Some(_token) = token {
        for child in &tree.children {
            node_tree(ui, scene, selection, child);
        }
    }
}

/// Per-node editing for the primary selection
fn node_editor(
    ui: &imgui::Ui,
    scene: &mut Scene,
    selection: &SelectionSet,
    ui_state: &mut UiState,
    transform_mode: &mut TransformMode,
    node: u32,
) {
    let i = node as usize;

    if ui_state.name_buffer_node != Some(node) {
        ui_state.name_buffer = scene.names[i].clone();
        ui_state.name_buffer_node = Some(node);
    }
    if ui.input_text("Name", &mut ui_state.name_buffer).build() {
        scene.names[i] = ui_state.name_buffer.clone();
    }

    let parent = scene.parents[i];
    if parent == node {
        ui.text("Parent: (root)");
    } else {
        ui.text(format!("Parent: {}", scene.names[parent as usize]));
    }

    transform_type_in(ui, scene, selection, transform_mode, node);
    light_section(ui, scene, node);
}

/// Numeric transform entry. Edits drive the selection through the same
/// path as the widget so flags stay consistent.
fn transform_type_in(
    ui: &imgui::Ui,
    scene: &mut Scene,
    selection: &SelectionSet,
    transform_mode: &mut TransformMode,
    node: u32,
) {
    if !ui.collapsing_header("Transform", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let i = node as usize;
    let mut edited = false;

    let mut translation = scene.transforms[i].translation.to_array();
    if ui.input_float3("Translation", &mut translation).build() {
        scene.transforms[i].translation = Vec3::from_array(translation);
        edited = true;
    }

    let (rx, ry, rz) = scene.transforms[i]
        .rotation
        .to_euler(glam::EulerRot::XYZ);
    let mut euler = [rx.to_degrees(), ry.to_degrees(), rz.to_degrees()];
    if ui.input_float3("Rotation", &mut euler).build() {
        scene.transforms[i].rotation = glam::Quat::from_euler(
            glam::EulerRot::XYZ,
            euler[0].to_radians(),
            euler[1].to_radians(),
            euler[2].to_radians(),
        );
        edited = true;
    }

    let mut scale = scene.transforms[i].scale.to_array();
    if ui.input_float3("Scale", &mut scale).build() {
        scene.transforms[i].scale = Vec3::from_array(scale);
        edited = true;
    }

    if edited {
        *transform_mode = TransformMode::TypeIn;
        apply_to_selection(scene, selection.as_slice(), TransformMode::TypeIn, Vec3::ZERO);
    }
}

fn light_section(ui: &imgui::Ui, scene: &mut Scene, node: u32) {
    if !ui.collapsing_header("Light", TreeNodeFlags::empty()) {
        return;
    }

    let i = node as usize;
    let mut has_light = scene.flags[i].has_light();
    if ui.checkbox("Enabled", &mut has_light) {
        scene.flags[i].set(NodeFlags::LIGHT, has_light);
    }
    if !has_light {
        return;
    }

    const KINDS: [LightKind; 3] = [LightKind::Directional, LightKind::Point, LightKind::Spot];
    let labels = ["Directional", "Point", "Spot"];
    let mut kind_index = KINDS
        .iter()
        .position(|&k| k == scene.lights[i].kind)
        .unwrap_or(0);
    if ui.combo_simple_string("Type", &mut kind_index, &labels) {
        scene.lights[i].kind = KINDS[kind_index];
    }

    let mut colour = scene.lights[i].colour.to_array();
    if ui.color_edit3("Colour", &mut colour) {
        scene.lights[i].colour = Vec3::from_array(colour);
    }

    let mut data = scene.lights[i].data.to_array();
    let changed = match scene.lights[i].kind {
        LightKind::Directional => {
            ui.input_float("Azimuth", &mut data[0]).build()
                | ui.input_float("Zenith", &mut data[1]).build()
        }
        LightKind::Point => ui.input_float("Radius", &mut data[0]).build(),
        LightKind::Spot => {
            ui.input_float("Azimuth", &mut data[0]).build()
                | ui.input_float("Zenith", &mut data[1]).build()
                | ui.input_float("Cutoff", &mut data[2]).build()
        }
    };
    if changed {
        scene.lights[i].data = Vec4::from_array(data);
    }
}
