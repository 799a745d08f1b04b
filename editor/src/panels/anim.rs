//! Animation binding and playback controls
//!
//! Shown for the primary selection inside the scene browser. Binding
//! validates the animation against the node's rig; an incompatible
//! animation is reported inline and not attached.

use engine::prelude::{bind_animation, AnimationLibrary, Scene};
use imgui::TreeNodeFlags;
use tracing::warn;

/// Render the animation section for `node`
pub fn anim_section(ui: &imgui::Ui, scene: &mut Scene, node: u32, library: &AnimationLibrary) {
    if !ui.collapsing_header("Animation", TreeNodeFlags::empty()) {
        return;
    }

    if library.is_empty() {
        ui.text_disabled("No animations imported");
        return;
    }

    let i = node as usize;

    for (handle, animation) in library.iter() {
        let bound = scene.anim_controllers[i].handles.contains(&handle);
        ui.text(&animation.name);
        ui.same_line();
        if bound {
            ui.text_disabled("bound");
        } else if ui.button(format!("Bind##{}", handle.0)) {
            if let Err(err) = bind_animation(scene, node, handle, library) {
                warn!(%err, "bind rejected");
            }
        }
    }

    let controller = &mut scene.anim_controllers[i];
    if controller.handles.is_empty() {
        return;
    }
    ui.separator();

    let names: Vec<&str> = controller
        .handles
        .iter()
        .map(|&h| library.get(h).map(|a| a.name.as_str()).unwrap_or("?"))
        .collect();
    let mut current = controller
        .current
        .and_then(|c| controller.handles.iter().position(|&h| h == c))
        .unwrap_or(0);
    if ui.combo_simple_string("Current", &mut current, &names) {
        controller.current = controller.handles.get(current).copied();
        controller.current_frame = 0;
    }
    if controller.current.is_none() {
        controller.current = controller.handles.first().copied();
    }

    if controller.playing {
        if ui.button("Stop") {
            controller.playing = false;
        }
    } else if ui.button("Play") {
        controller.playing = true;
    }
    ui.same_line();
    ui.text(format!("Frame: {}", controller.current_frame));

    ui.checkbox("Apply Root Motion", &mut controller.apply_root_motion);
}
