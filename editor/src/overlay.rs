//! Debug overlays
//!
//! Translates the scene's view flags into debug-draw primitives each
//! frame: grid, per-node coordinate frames, bounding boxes, bone links
//! and light markers. Lights draw as screen-space quads so they keep a
//! constant size regardless of distance.

use engine::core::maths::project;
use engine::prelude::{DebugDraw, NodeFlags, Scene, Vec2, Vec4, ViewFlags};

use crate::editor_state::SceneView;
use crate::selection::SelectionSet;

const SELECTED_COLOUR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
const AABB_COLOUR: Vec4 = Vec4::new(1.0, 0.0, 1.0, 1.0);
const BONE_COLOUR: Vec4 = Vec4::new(0.0, 1.0, 1.0, 1.0);
const TRAJECTORY_COLOUR: Vec4 = Vec4::new(1.0, 0.5, 0.0, 1.0);
const LIGHT_QUAD_SIZE: f32 = 10.0;

/// Emit debug primitives for every enabled view flag
pub fn draw_overlays(
    scene: &Scene,
    selection: &SelectionSet,
    view: &SceneView,
    dbg: &mut DebugDraw,
) {
    let flags = scene.view_flags;

    if flags.contains(ViewFlags::GRID) {
        dbg.add_grid(engine::prelude::Vec3::ZERO, engine::prelude::Vec3::splat(100.0), 20);
    }

    for node in 0..scene.node_count() {
        if !scene.is_allocated(node) {
            continue;
        }
        let i = node as usize;
        let world = scene.world_matrices[i];

        if flags.contains(ViewFlags::MATRICES) {
            dbg.add_coord_space(world, 1.0);
        }

        if flags.contains(ViewFlags::AABB) {
            let bv = &scene.bounding_volumes[i];
            dbg.add_aabb(bv.transformed_min_extents, bv.transformed_max_extents, AABB_COLOUR);
        }

        if flags.contains(ViewFlags::LIGHTS) && scene.flags[i].has_light() {
            let screen = project(world.w_axis.truncate(), view.view, view.proj, view.viewport);
            // Skip lights behind the camera
            if screen.z > 0.0 && screen.z < 1.0 {
                let colour = scene.lights[i].colour.extend(1.0);
                dbg.add_quad_2d(
                    Vec2::new(screen.x, screen.y),
                    Vec2::splat(LIGHT_QUAD_SIZE),
                    colour,
                );
            }
        }

        if flags.contains(ViewFlags::BONES) && scene.flags[i].has_bone() {
            let parent = scene.parents[i];
            if parent != node && scene.is_allocated(parent) {
                let from = scene.world_matrices[parent as usize].w_axis.truncate();
                let to = world.w_axis.truncate();
                if scene.flags[i].contains(NodeFlags::ANIM_TRAJECTORY) {
                    dbg.add_coord_space(world, 0.3);
                    dbg.add_line(from, to, TRAJECTORY_COLOUR);
                } else {
                    dbg.add_line(from, to, BONE_COLOUR);
                }
            }
        }
    }

    if flags.contains(ViewFlags::SELECTED_NODE) {
        for node in selection.iter() {
            if !scene.is_allocated(node) {
                continue;
            }
            let bv = &scene.bounding_volumes[node as usize];
            dbg.add_aabb(
                bv.transformed_min_extents,
                bv.transformed_max_extents,
                SELECTED_COLOUR,
            );
        }
    }
}
