//! Selection management
//!
//! An ordered set of unique node indices. Order matters: the first entry
//! is the primary selection and becomes the target of reparent
//! operations.

use engine::prelude::{InputState, Scene};
use tracing::debug;

/// How a pick resolves into the selection, derived from modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// Replace the selection
    Normal,
    /// Append to the selection
    Add,
    /// Erase from the selection
    Remove,
}

impl PickMode {
    /// Mode implied by the currently held modifiers (Ctrl adds, Alt
    /// removes)
    pub fn from_input(input: &InputState) -> Self {
        if input.ctrl_down() {
            Self::Add
        } else if input.alt_down() {
            Self::Remove
        } else {
            Self::Normal
        }
    }
}

/// Ordered set of selected node indices
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    indices: Vec<u32>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a picked index into the selection.
    ///
    /// Indices at or past `node_count` are invalid: they clear the
    /// selection under [`PickMode::Normal`] and are ignored otherwise.
    pub fn add(&mut self, index: u32, mode: PickMode, node_count: u32) {
        let valid = index < node_count;

        match mode {
            PickMode::Normal => {
                self.indices.clear();
                if valid {
                    self.indices.push(index);
                }
            }
            PickMode::Add => {
                if valid && !self.contains(index) {
                    self.indices.push(index);
                }
            }
            PickMode::Remove => {
                if let Some(pos) = self.indices.iter().position(|&i| i == index) {
                    self.indices.remove(pos);
                }
            }
        }

        debug!(index, ?mode, count = self.indices.len(), "selection updated");
    }

    /// First selected node - the reparent target
    pub fn primary(&self) -> Option<u32> {
        self.indices.first().copied()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Replace the selection wholesale (e.g. with freshly cloned nodes)
    pub fn replace(&mut self, indices: Vec<u32>) {
        self.indices = indices;
        self.indices.dedup();
    }

    /// Drop entries whose node has been freed
    pub fn prune(&mut self, scene: &Scene) {
        self.indices.retain(|&i| scene.is_allocated(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_mode_keeps_last_valid_node() {
        let mut selection = SelectionSet::new();
        selection.add(0, PickMode::Normal, 10);
        selection.add(3, PickMode::Normal, 10);
        selection.add(7, PickMode::Normal, 10);

        assert_eq!(selection.as_slice(), &[7]);
    }

    #[test]
    fn test_normal_mode_invalid_index_clears() {
        let mut selection = SelectionSet::new();
        selection.add(3, PickMode::Normal, 10);
        selection.add(99, PickMode::Normal, 10);

        assert!(selection.is_empty());
    }

    #[test]
    fn test_add_mode_no_duplicates_preserves_order() {
        let mut selection = SelectionSet::new();
        selection.add(5, PickMode::Add, 10);
        selection.add(2, PickMode::Add, 10);
        selection.add(5, PickMode::Add, 10);
        selection.add(8, PickMode::Add, 10);

        assert_eq!(selection.as_slice(), &[5, 2, 8]);
        assert_eq!(selection.primary(), Some(5));
    }

    #[test]
    fn test_add_mode_ignores_invalid_index() {
        let mut selection = SelectionSet::new();
        selection.add(2, PickMode::Add, 10);
        selection.add(42, PickMode::Add, 10);

        assert_eq!(selection.as_slice(), &[2]);
    }

    #[test]
    fn test_remove_mode() {
        let mut selection = SelectionSet::new();
        for i in [1, 2, 3] {
            selection.add(i, PickMode::Add, 10);
        }

        selection.add(2, PickMode::Remove, 10);
        assert_eq!(selection.as_slice(), &[1, 3]);

        // Removing an absent node is a no-op
        selection.add(9, PickMode::Remove, 10);
        assert_eq!(selection.as_slice(), &[1, 3]);
    }

    #[test]
    fn test_prune_drops_freed_nodes() {
        let mut scene = Scene::new();
        let a = scene.new_node();
        let b = scene.new_node();

        let mut selection = SelectionSet::new();
        selection.add(a, PickMode::Add, scene.node_count());
        selection.add(b, PickMode::Add, scene.node_count());

        scene.free_node(a);
        selection.prune(&scene);

        assert_eq!(selection.as_slice(), &[b]);
    }
}
