//! View and camera settings panels

use engine::prelude::{Scene, ViewFlags};

use crate::camera::{CameraMode, OrbitCamera};
use crate::editor_state::UiState;

/// Checkbox per debug overlay flag
pub fn view_panel(ui: &imgui::Ui, scene: &mut Scene, ui_state: &mut UiState) {
    if !ui_state.view_menu_open {
        return;
    }

    let mut open = ui_state.view_menu_open;
    ui.window("View")
        .opened(&mut open)
        .size([180.0, 220.0], imgui::Condition::FirstUseEver)
        .build(|| {
            for (flag, label) in ViewFlags::LABELLED {
                let mut on = scene.view_flags.contains(flag);
                if ui.checkbox(label, &mut on) {
                    scene.view_flags.set(flag, on);
                }
            }
        });
    ui_state.view_menu_open = open;
}

/// Camera mode selector
pub fn camera_panel(ui: &imgui::Ui, camera: &mut OrbitCamera, ui_state: &mut UiState) {
    if !ui_state.camera_menu_open {
        return;
    }

    let mut open = ui_state.camera_menu_open;
    ui.window("Camera")
        .opened(&mut open)
        .size([180.0, 100.0], imgui::Condition::FirstUseEver)
        .build(|| {
            let labels: Vec<&str> = CameraMode::ALL.iter().map(|m| m.label()).collect();
            let mut index = CameraMode::ALL
                .iter()
                .position(|&m| m == camera.mode)
                .unwrap_or(0);
            if ui.combo_simple_string("Mode", &mut index, &labels) {
                camera.mode = CameraMode::ALL[index];
            }
            ui.text(format!("Zoom: {:.1}", camera.zoom));
        });
    ui_state.camera_menu_open = open;
}
