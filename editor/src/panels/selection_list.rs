//! Selection list panel

use engine::prelude::Scene;

use crate::editor_state::UiState;
use crate::selection::{PickMode, SelectionSet};

/// Window listing the current selection in pick order. Clicking an entry
/// collapses the selection to that node.
pub fn selection_list_panel(
    ui: &imgui::Ui,
    scene: &Scene,
    selection: &mut SelectionSet,
    ui_state: &mut UiState,
) {
    if !ui_state.selection_list_open {
        return;
    }

    let mut open = ui_state.selection_list_open;
    ui.window("Selection List")
        .opened(&mut open)
        .size([220.0, 260.0], imgui::Condition::FirstUseEver)
        .build(|| {
            if selection.is_empty() {
                ui.text_disabled("Nothing selected");
                return;
            }

            let mut clicked = None;
            for (pos, node) in selection.iter().enumerate() {
                let name = if scene.is_allocated(node) {
                    scene.names[node as usize].as_str()
                } else {
                    "(freed)"
                };
                let label = format!("{pos}: {name}##{node}");
                if ui.selectable_config(&label).selected(pos == 0).build() {
                    clicked = Some(node);
                }
            }
            if let Some(node) = clicked {
                selection.add(node, PickMode::Normal, scene.node_count());
            }
        });
    ui_state.selection_list_open = open;
}
