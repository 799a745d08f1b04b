//! File-level scene operations
//!
//! Dialog-driven save, load and import plus the small store edits the
//! menus trigger. Dialog cancellation is a silent no-op; failures log and
//! leave the scene as it was.

use std::path::Path;

use engine::prelude::{load_scene, save_scene, AnimHandle, Animation, AnimationLibrary, Scene};
use tracing::{error, info};

use crate::selection::SelectionSet;
use crate::settings::EditorSettings;

/// Allocate a fresh node from the browser's add button
pub fn add_empty_node(scene: &mut Scene) -> u32 {
    let node = scene.new_node();
    info!(node, "added empty node");
    node
}

/// Load a scene from `path`, clearing the selection and remembering the
/// path for the next session. The caller persists the settings.
pub fn load_scene_path(
    path: &Path,
    scene: &mut Scene,
    selection: &mut SelectionSet,
    settings: &mut EditorSettings,
) {
    match load_scene(path, scene) {
        Ok(()) => {
            selection.clear();
            settings.remember_scene(path);
        }
        Err(err) => error!(path = %path.display(), %err, "failed to load scene"),
    }
}

/// Prompt for a scene file and load it
pub fn open_scene_dialog(
    scene: &mut Scene,
    selection: &mut SelectionSet,
    settings: &mut EditorSettings,
) {
    let picked = rfd::FileDialog::new()
        .add_filter("scene", &["json"])
        .set_directory(&settings.project_dir)
        .pick_file();

    if let Some(path) = picked {
        load_scene_path(&path, scene, selection, settings);
        if let Err(err) = settings.save() {
            error!(%err, "failed to persist editor settings");
        }
    }
}

/// Prompt for a destination and save the scene
pub fn save_scene_dialog(scene: &Scene, settings: &mut EditorSettings) {
    let picked = rfd::FileDialog::new()
        .add_filter("scene", &["json"])
        .set_directory(&settings.project_dir)
        .save_file();

    if let Some(path) = picked {
        match save_scene(&path, scene) {
            Ok(()) => {
                settings.remember_scene(&path);
                if let Err(err) = settings.save() {
                    error!(%err, "failed to persist editor settings");
                }
            }
            Err(err) => error!(path = %path.display(), %err, "failed to save scene"),
        }
    }
}

/// Prompt for an animation file and register it in the library
pub fn import_animation_dialog(
    library: &mut AnimationLibrary,
    settings: &EditorSettings,
) -> Option<AnimHandle> {
    let picked = rfd::FileDialog::new()
        .add_filter("animation", &["json"])
        .set_directory(&settings.project_dir)
        .pick_file();

    let path = picked?;
    match Animation::from_file(&path) {
        Ok(animation) => Some(library.insert(animation)),
        Err(err) => {
            error!(path = %path.display(), %err, "failed to import animation");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::prelude::NodeFlags;

    #[test]
    fn test_add_empty_node_is_allocated_root() {
        let mut scene = Scene::new();
        let node = add_empty_node(&mut scene);

        assert!(scene.is_allocated(node));
        assert_eq!(scene.parents[node as usize], node);
        assert_eq!(scene.flags[node as usize], NodeFlags::ALLOCATED);
    }

    #[test]
    fn test_load_scene_path_updates_settings_and_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let mut scene = Scene::new();
        scene.new_node();
        save_scene(&path, &scene).unwrap();

        let mut loaded = Scene::new();
        let mut selection = SelectionSet::new();
        selection.add(0, crate::selection::PickMode::Add, 1);
        let mut settings = EditorSettings::default();
        settings.project_dir = dir.path().to_path_buf();

        load_scene_path(&path, &mut loaded, &mut selection, &mut settings);

        assert_eq!(loaded.node_count(), 1);
        assert!(selection.is_empty());
        assert_eq!(settings.last_loaded_scene, Some(path));
    }

    #[test]
    fn test_load_missing_scene_leaves_store_untouched() {
        let mut scene = Scene::new();
        scene.new_node();
        let mut selection = SelectionSet::new();
        let mut settings = EditorSettings::default();

        load_scene_path(
            Path::new("/nonexistent/scene.json"),
            &mut scene,
            &mut selection,
            &mut settings,
        );

        assert_eq!(scene.node_count(), 1);
        assert_eq!(settings.last_loaded_scene, None);
    }
}
