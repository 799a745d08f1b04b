//! Flat scene storage
//!
//! Nodes are indices into parallel component arrays. A slot is live when
//! its [`NodeFlags::ALLOCATED`] bit is set; freed slots are fully reset
//! before reuse. `parents[n] == n` marks a root - the self-parenting
//! sentinel never forms a cycle on its own.

use glam::Mat4;
use std::collections::HashMap;
use tracing::{debug, error};

use super::components::{AnimController, BoundingVolume, Light, NodeFlags, Transform, ViewFlags};

/// Struct-of-arrays entity scene store
#[derive(Debug, Default)]
pub struct Scene {
    /// Display name per node
    pub names: Vec<String>,
    /// Parent index per node, self for roots
    pub parents: Vec<u32>,
    /// Local transform per node
    pub transforms: Vec<Transform>,
    /// World matrix per node, refreshed by [`Scene::update`]
    pub world_matrices: Vec<Mat4>,
    /// Bounds per node
    pub bounding_volumes: Vec<BoundingVolume>,
    /// Light component per node, live when the LIGHT flag is set
    pub lights: Vec<Light>,
    /// Animation controller per node
    pub anim_controllers: Vec<AnimController>,
    /// Component membership per node
    pub flags: Vec<NodeFlags>,
    /// Debug overlay toggles
    pub view_flags: ViewFlags,
    tree_dirty: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node slots, allocated or not
    pub fn node_count(&self) -> u32 {
        self.names.len() as u32
    }

    /// Whether `node` refers to an allocated slot
    pub fn is_allocated(&self, node: u32) -> bool {
        (node as usize) < self.flags.len() && self.flags[node as usize].is_allocated()
    }

    /// Allocate a node, reusing the lowest-index free slot or appending.
    ///
    /// The returned slot is fully reset: default name, self parent,
    /// identity transform, cleared components.
    pub fn new_node(&mut self) -> u32 {
        let node = match self.flags.iter().position(|f| !f.is_allocated()) {
            Some(slot) => slot as u32,
            None => {
                let slot = self.names.len() as u32;
                self.names.push(String::new());
                self.parents.push(slot);
                self.transforms.push(Transform::default());
                self.world_matrices.push(Mat4::IDENTITY);
                self.bounding_volumes.push(BoundingVolume::default());
                self.lights.push(Light::default());
                self.anim_controllers.push(AnimController::default());
                self.flags.push(NodeFlags::NONE);
                slot
            }
        };

        self.reset_slot(node);
        self.flags[node as usize] = NodeFlags::ALLOCATED;
        self.tree_dirty = true;
        debug!(node, "allocated scene node");
        node
    }

    /// Release a node's slot for reuse. Out-of-range indices are ignored.
    pub fn free_node(&mut self, node: u32) {
        if !self.is_allocated(node) {
            return;
        }

        self.reset_slot(node);
        self.flags[node as usize] = NodeFlags::NONE;
        self.tree_dirty = true;
        debug!(node, "freed scene node");
    }

    fn reset_slot(&mut self, node: u32) {
        let i = node as usize;
        self.names[i] = format!("node_{node}");
        self.parents[i] = node;
        self.transforms[i] = Transform::default();
        self.world_matrices[i] = Mat4::IDENTITY;
        self.bounding_volumes[i] = BoundingVolume::default();
        self.lights[i] = Light::default();
        self.anim_controllers[i] = AnimController::default();
    }

    /// Remove all nodes
    pub fn clear(&mut self) {
        self.names.clear();
        self.parents.clear();
        self.transforms.clear();
        self.world_matrices.clear();
        self.bounding_volumes.clear();
        self.lights.clear();
        self.anim_controllers.clear();
        self.flags.clear();
        self.tree_dirty = true;
    }

    /// Set a node's parent.
    ///
    /// Does not chase ancestry; callers that can introduce a cycle must
    /// check [`Scene::is_ancestor`] first.
    pub fn set_parent(&mut self, child: u32, parent: u32) {
        if child as usize >= self.parents.len() || parent as usize >= self.parents.len() {
            return;
        }

        self.parents[child as usize] = parent;
        self.tree_dirty = true;
    }

    /// Whether `ancestor` is reachable from `node` through parent links.
    ///
    /// The walk is bounded by the node count so a corrupt cycle terminates.
    pub fn is_ancestor(&self, ancestor: u32, node: u32) -> bool {
        if node as usize >= self.parents.len() {
            return false;
        }

        let mut current = node;
        for _ in 0..self.parents.len() {
            let parent = self.parents[current as usize];
            if parent == current {
                return false;
            }
            if parent == ancestor {
                return true;
            }
            current = parent;
        }

        error!(node, "parent chain does not terminate");
        false
    }

    /// Clone a set of nodes, preserving their relative hierarchy.
    ///
    /// Each clone's name gets `suffix` appended. Parent links between
    /// selected nodes are remapped onto the clones; links leaving the set
    /// keep pointing at the original parents. Returns the new indices in
    /// selection order; the originals are untouched.
    pub fn clone_hierarchical(&mut self, selection: &[u32], suffix: &str) -> Vec<u32> {
        let mut remap = HashMap::new();
        let mut clones = Vec::with_capacity(selection.len());

        for &src in selection {
            if !self.is_allocated(src) {
                continue;
            }
            let clone = self.new_node();
            remap.insert(src, clone);
            clones.push(clone);
        }

        for (&src, &dst) in &remap {
            let (s, d) = (src as usize, dst as usize);
            self.names[d] = format!("{}{}", self.names[s], suffix);
            self.transforms[d] = self.transforms[s];
            self.world_matrices[d] = self.world_matrices[s];
            self.bounding_volumes[d] = self.bounding_volumes[s];
            self.lights[d] = self.lights[s];
            self.anim_controllers[d] = self.anim_controllers[s].clone();
            self.flags[d] = self.flags[s];

            let parent = self.parents[s];
            self.parents[d] = if parent == src {
                dst
            } else {
                remap.get(&parent).copied().unwrap_or(parent)
            };
        }

        self.tree_dirty = true;
        clones
    }

    /// Advance the scene one frame: recompute world matrices from the
    /// hierarchy, refresh transformed bounds and step animation playback.
    pub fn update(&mut self, _dt: f32) {
        let count = self.names.len();
        let mut resolved = vec![false; count];

        for node in 0..count {
            if self.flags[node].is_allocated() {
                self.resolve_world(node as u32, &mut resolved, 0);
            }
        }

        for node in 0..count {
            if !self.flags[node].is_allocated() {
                continue;
            }

            let bv = &mut self.bounding_volumes[node];
            let world = self.world_matrices[node];
            let (min, max) = (bv.min_extents, bv.max_extents);

            let mut t_min = glam::Vec3::splat(f32::MAX);
            let mut t_max = glam::Vec3::splat(f32::MIN);
            for i in 0..8 {
                let corner = glam::Vec3::new(
                    if i & 1 == 0 { min.x } else { max.x },
                    if i & 2 == 0 { min.y } else { max.y },
                    if i & 4 == 0 { min.z } else { max.z },
                );
                let p = world.transform_point3(corner);
                t_min = t_min.min(p);
                t_max = t_max.max(p);
            }
            bv.transformed_min_extents = t_min;
            bv.transformed_max_extents = t_max;

            let controller = &mut self.anim_controllers[node];
            if controller.playing && controller.current.is_some() {
                controller.current_frame += 1;
            }
        }
    }

    fn resolve_world(&mut self, node: u32, resolved: &mut [bool], depth: usize) -> Mat4 {
        let i = node as usize;
        if resolved[i] {
            return self.world_matrices[i];
        }

        let local = self.transforms[i].to_matrix();
        let parent = self.parents[i];

        let world = if parent == node {
            local
        } else if depth >= resolved.len() {
            error!(node, "cyclic parent chain, treating node as root");
            local
        } else {
            self.resolve_world(parent, resolved, depth + 1) * local
        };

        self.world_matrices[i] = world;
        resolved[i] = true;
        world
    }

    /// Whether cached tree views must rebuild, clearing the flag
    pub fn take_tree_dirty(&mut self) -> bool {
        std::mem::take(&mut self.tree_dirty)
    }

    /// Build a hierarchy view of the allocated nodes
    pub fn build_tree(&self) -> SceneTree {
        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        let mut roots = Vec::new();

        for node in 0..self.node_count() {
            if !self.is_allocated(node) {
                continue;
            }
            let parent = self.parents[node as usize];
            if parent == node || !self.is_allocated(parent) {
                roots.push(node);
            } else {
                children.entry(parent).or_default().push(node);
            }
        }

        SceneTree {
            roots: roots
                .into_iter()
                .map(|r| build_subtree(r, &children))
                .collect(),
        }
    }
}

/// Cached hierarchy view for tree panels
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    pub roots: Vec<TreeNode>,
}

/// One node of a [`SceneTree`]
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub node: u32,
    pub children: Vec<TreeNode>,
}

fn build_subtree(node: u32, children: &HashMap<u32, Vec<u32>>) -> TreeNode {
    TreeNode {
        node,
        children: children
            .get(&node)
            .map(|c| c.iter().map(|&n| build_subtree(n, children)).collect())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_new_node_appends_then_reuses() {
        let mut scene = Scene::new();
        let a = scene.new_node();
        let b = scene.new_node();
        assert_eq!((a, b), (0, 1));

        scene.names[a as usize] = "renamed".into();
        scene.transforms[a as usize].translation = Vec3::X;
        scene.flags[a as usize].insert(NodeFlags::LIGHT);

        scene.free_node(a);
        let reused = scene.new_node();
        assert_eq!(reused, a);

        // Reused slots come back fully reset
        assert_eq!(scene.names[a as usize], "node_0");
        assert_eq!(scene.parents[a as usize], a);
        assert_eq!(scene.transforms[a as usize], Transform::default());
        assert_eq!(scene.flags[a as usize], NodeFlags::ALLOCATED);
    }

    #[test]
    fn test_is_ancestor() {
        let mut scene = Scene::new();
        let a = scene.new_node();
        let b = scene.new_node();
        let c = scene.new_node();
        scene.set_parent(b, a);
        scene.set_parent(c, b);

        assert!(scene.is_ancestor(a, c));
        assert!(scene.is_ancestor(b, c));
        assert!(!scene.is_ancestor(c, a));
        assert!(!scene.is_ancestor(a, a));
    }

    #[test]
    fn test_reparent_guarded_by_ancestor_check_stays_acyclic() {
        let mut scene = Scene::new();
        let a = scene.new_node();
        let b = scene.new_node();
        scene.set_parent(b, a);

        // Caller-side guard: a may not be parented under its descendant b
        if !scene.is_ancestor(a, b) {
            scene.set_parent(a, b);
        }

        assert_eq!(scene.parents[a as usize], a);
        assert!(!scene.is_ancestor(a, a));
        assert!(!scene.is_ancestor(b, b));
    }

    #[test]
    fn test_world_matrix_hierarchy() {
        let mut scene = Scene::new();
        let parent = scene.new_node();
        let child = scene.new_node();
        scene.transforms[parent as usize].translation = Vec3::X;
        scene.transforms[child as usize].translation = Vec3::Y;
        scene.set_parent(child, parent);

        scene.update(0.016);

        let p = scene.world_matrices[parent as usize].w_axis.truncate();
        let c = scene.world_matrices[child as usize].w_axis.truncate();
        assert_eq!(p, Vec3::X);
        assert_eq!(c, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_world_matrix_child_stored_before_parent() {
        let mut scene = Scene::new();
        let child = scene.new_node();
        let parent = scene.new_node();
        scene.transforms[parent as usize].translation = Vec3::Z;
        scene.set_parent(child, parent);

        scene.update(0.016);

        let c = scene.world_matrices[child as usize].w_axis.truncate();
        assert_eq!(c, Vec3::Z);
    }

    #[test]
    fn test_update_refreshes_transformed_extents() {
        let mut scene = Scene::new();
        let node = scene.new_node();
        scene.transforms[node as usize].translation = Vec3::new(10.0, 0.0, 0.0);

        scene.update(0.016);

        let bv = &scene.bounding_volumes[node as usize];
        assert_eq!(bv.transformed_min_extents, Vec3::new(9.5, -0.5, -0.5));
        assert_eq!(bv.transformed_max_extents, Vec3::new(10.5, 0.5, 0.5));
    }

    #[test]
    fn test_clone_hierarchical_preserves_structure() {
        let mut scene = Scene::new();
        let parent = scene.new_node();
        let child = scene.new_node();
        scene.names[parent as usize] = "torso".into();
        scene.names[child as usize] = "arm".into();
        scene.set_parent(child, parent);
        scene.transforms[child as usize].translation = Vec3::Y;

        let clones = scene.clone_hierarchical(&[parent, child], "_cloned");
        assert_eq!(clones.len(), 2);
        let (p2, c2) = (clones[0], clones[1]);

        // Clones form the same parent/child relationship on new indices
        assert_eq!(scene.parents[c2 as usize], p2);
        assert_eq!(scene.parents[p2 as usize], p2);
        assert_eq!(scene.names[p2 as usize], "torso_cloned");
        assert_eq!(scene.names[c2 as usize], "arm_cloned");
        assert_eq!(scene.transforms[c2 as usize].translation, Vec3::Y);

        // Originals untouched
        assert_eq!(scene.parents[child as usize], parent);
        assert_eq!(scene.names[parent as usize], "torso");
    }

    #[test]
    fn test_clone_skips_stale_indices() {
        let mut scene = Scene::new();
        let a = scene.new_node();
        let clones = scene.clone_hierarchical(&[a, 99], "_cloned");
        assert_eq!(clones.len(), 1);
    }

    #[test]
    fn test_build_tree_and_dirty_flag() {
        let mut scene = Scene::new();
        let a = scene.new_node();
        let b = scene.new_node();
        let c = scene.new_node();
        scene.set_parent(b, a);

        assert!(scene.take_tree_dirty());
        assert!(!scene.take_tree_dirty());

        let tree = scene.build_tree();
        assert_eq!(tree.roots.len(), 2);
        let root_a = tree.roots.iter().find(|r| r.node == a).unwrap();
        assert_eq!(root_a.children.len(), 1);
        assert_eq!(root_a.children[0].node, b);
        assert!(tree.roots.iter().any(|r| r.node == c));

        scene.set_parent(c, a);
        assert!(scene.take_tree_dirty());
    }

    #[test]
    fn test_tree_types_reachable_through_prelude() {
        use crate::prelude::{SceneTree, TreeNode};

        let tree = SceneTree {
            roots: vec![TreeNode {
                node: 0,
                children: Vec::new(),
            }],
        };
        assert_eq!(tree.roots[0].node, 0);
    }

    #[test]
    fn test_cyclic_parents_do_not_hang_update() {
        let mut scene = Scene::new();
        let a = scene.new_node();
        let b = scene.new_node();
        // Bypass the caller-side guard to corrupt the hierarchy
        scene.set_parent(a, b);
        scene.set_parent(b, a);

        // Both update and the ancestor walk must terminate
        scene.update(0.016);
        let _ = scene.is_ancestor(a, b);
        assert!(scene.world_matrices[a as usize].is_finite());
        assert!(scene.world_matrices[b as usize].is_finite());
    }
}
