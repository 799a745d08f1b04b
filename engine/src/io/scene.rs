//! Scene serialization and loading
//!
//! Scenes persist as JSON. Free slots are compacted away on save, so
//! parent indices are remapped onto the surviving nodes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::scene::{AnimController, BoundingVolume, Light, NodeFlags, Scene, Transform, ViewFlags};

/// Errors that can occur during scene operations
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of one scene node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    /// Index into [`SceneFile::nodes`], self for roots
    pub parent: u32,
    pub transform: Transform,
    pub flags: NodeFlags,
    pub bounds: BoundingVolume,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<Light>,
}

/// On-disk scene representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub view_flags: ViewFlags,
}

impl SceneFile {
    /// Capture the allocated nodes of a scene
    pub fn from_scene(scene: &Scene) -> Self {
        // Free slots are dropped, so remap parents onto compacted indices
        let mut remap = HashMap::new();
        let mut order = Vec::new();
        for node in 0..scene.node_count() {
            if scene.is_allocated(node) {
                remap.insert(node, order.len() as u32);
                order.push(node);
            }
        }

        let nodes = order
            .iter()
            .map(|&old| {
                let i = old as usize;
                let parent = scene.parents[i];
                SceneNode {
                    name: scene.names[i].clone(),
                    parent: remap.get(&parent).copied().unwrap_or(remap[&old]),
                    transform: scene.transforms[i],
                    flags: scene.flags[i],
                    bounds: scene.bounding_volumes[i],
                    light: scene.flags[i].has_light().then(|| scene.lights[i]),
                }
            })
            .collect();

        Self {
            nodes,
            view_flags: scene.view_flags,
        }
    }

    /// Replace a scene's contents with this file's nodes
    pub fn apply_to(&self, scene: &mut Scene) {
        scene.clear();
        for (index, node) in self.nodes.iter().enumerate() {
            let n = scene.new_node();
            debug_assert_eq!(n as usize, index);
            let i = n as usize;
            scene.names[i] = node.name.clone();
            scene.parents[i] = node.parent.min(self.nodes.len() as u32 - 1);
            scene.transforms[i] = node.transform;
            scene.bounding_volumes[i] = node.bounds;
            scene.flags[i] = node.flags | NodeFlags::ALLOCATED;
            if let Some(light) = node.light {
                scene.lights[i] = light;
            }
            scene.anim_controllers[i] = AnimController::default();
        }
        scene.view_flags = self.view_flags;
    }
}

/// Save a scene to a JSON file
pub fn save_scene(path: &Path, scene: &Scene) -> Result<(), SceneError> {
    let file = SceneFile::from_scene(scene);
    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), nodes = file.nodes.len(), "saved scene");
    Ok(())
}

/// Load a scene from a JSON file, replacing the store's contents
pub fn load_scene(path: &Path, scene: &mut Scene) -> Result<(), SceneError> {
    let content = std::fs::read_to_string(path)?;
    let file: SceneFile = serde_json::from_str(&content)?;
    file.apply_to(scene);
    info!(path = %path.display(), nodes = file.nodes.len(), "loaded scene");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let root = scene.new_node();
        scene.names[root as usize] = "root".into();

        let child = scene.new_node();
        scene.names[child as usize] = "lamp".into();
        scene.set_parent(child, root);
        scene.transforms[child as usize].translation = Vec3::new(0.0, 2.0, 0.0);
        scene.flags[child as usize].insert(NodeFlags::LIGHT);
        scene.view_flags.insert(ViewFlags::GRID);
        scene
    }

    #[test]
    fn test_save_load_roundtrip() {
        let scene = sample_scene();
        let file = tempfile::NamedTempFile::new().unwrap();

        save_scene(file.path(), &scene).unwrap();

        let mut loaded = Scene::new();
        load_scene(file.path(), &mut loaded).unwrap();

        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.names, vec!["root", "lamp"]);
        assert_eq!(loaded.parents[1], 0);
        assert_eq!(
            loaded.transforms[1].translation,
            Vec3::new(0.0, 2.0, 0.0)
        );
        assert!(loaded.flags[1].has_light());
        assert!(loaded.view_flags.contains(ViewFlags::GRID));
    }

    #[test]
    fn test_save_compacts_free_slots() {
        let mut scene = sample_scene();
        let extra = scene.new_node();
        let child = scene.new_node();
        scene.set_parent(child, extra);
        scene.free_node(extra);

        let file = SceneFile::from_scene(&scene);
        // Freed slot is gone; the orphaned child falls back to a root link
        assert_eq!(file.nodes.len(), 3);
        let orphan = &file.nodes[2];
        assert_eq!(orphan.parent, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let mut scene = Scene::new();
        let err = load_scene(Path::new("/nonexistent/scene.json"), &mut scene).unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
