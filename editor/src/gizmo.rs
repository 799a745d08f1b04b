//! Transform widget
//!
//! Screen-space gizmo for translating, rotating and scaling the current
//! selection. Axis handles are hit-tested in 2-D against the projected
//! widget; drags are resolved by intersecting the mouse ray with a plane
//! through the widget centroid, so the per-frame delta stays in world
//! space. Debug lines visualise the handles each frame.

use engine::core::maths::{closest_point_on_line, distance, ray_vs_plane, unproject};
use engine::prelude::{DebugDraw, InputState, Mat4, NodeFlags, Quat, Scene, Vec2, Vec3, Vec4};
use tracing::trace;
use winit::event::MouseButton;

use crate::editor_state::{SceneView, TransformMode};

const AXIS_COLOURS: [Vec4; 3] = [
    Vec4::new(1.0, 0.0, 0.0, 1.0),
    Vec4::new(0.0, 1.0, 0.0, 1.0),
    Vec4::new(0.0, 0.0, 1.0, 1.0),
];
const SELECTED_COLOUR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

/// Screen-space pick distance for axis handles, in pixels
const AXIS_PICK_DISTANCE: f32 = 5.0;
/// Rotation ring radius as a fraction of the widget size
const RING_SCALE: f32 = 0.75;
/// Planar handles sit this far along each pair of axes
const PLANE_HANDLE_SCALE: f32 = 0.3;
/// Scale drags are damped relative to translate drags
const SCALE_DAMPING: f32 = 0.1;

const AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Transform widget drag state
#[derive(Debug, Default)]
pub struct Gizmo {
    /// Bitmask of the axes the active handle drives
    selected_axis: u32,
    /// Rings under the cursor this frame
    ring_hover: [bool; 3],
    /// Ring grabbed when the drag started
    ring_grabbed: [bool; 3],
    /// Ray/plane intersection per axis at the previous frame of the drag
    pre_click_axis_pos: [Vec3; 3],
    /// Direction from the centroid to the ring intersection last frame
    prev_ring_dir: [Vec3; 3],
    /// Whether the widget consumed the mouse this frame; gates picking
    pub widget_selected: bool,
}

/// Centroid and aggregate bounds of a selection.
///
/// The centroid is the unweighted average of each node's transformed
/// extent midpoint. Returns `None` for an empty or fully stale selection.
pub fn selection_bounds(scene: &Scene, selection: &[u32]) -> Option<(Vec3, Vec3, Vec3)> {
    let mut centroid = Vec3::ZERO;
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    let mut count = 0;

    for &node in selection {
        if !scene.is_allocated(node) {
            continue;
        }
        let bv = &scene.bounding_volumes[node as usize];
        centroid += (bv.transformed_min_extents + bv.transformed_max_extents) * 0.5;
        min = min.min(bv.transformed_min_extents);
        max = max.max(bv.transformed_max_extents);
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some((centroid / count as f32, min, max))
}

/// Widget size scaled with distance so it stays a constant on-screen
/// size. `None` when the point is behind the camera.
fn widget_size(point: Vec3, view: Mat4, proj: Mat4) -> Option<f32> {
    let clip = proj * view * point.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    Some(clip.z.abs() * 0.1)
}

/// Whether a point at `dist` from the ring centre hits a ring of the
/// given radius, within a 5 % band.
fn ring_hovered(dist: f32, radius: f32) -> bool {
    (dist - radius).abs() < radius * 0.05
}

/// Apply a per-frame transform delta to every selected node.
///
/// Nodes whose parent is also selected are skipped; they follow through
/// the hierarchy. Rotation deltas are encoded as a scaled axis vector and
/// pre-multiplied. Each touched node gets the TRANSFORM flag.
pub fn apply_to_selection(scene: &mut Scene, selection: &[u32], mode: TransformMode, delta: Vec3) {
    for &node in selection {
        if !scene.is_allocated(node) {
            continue;
        }
        let parent = scene.parents[node as usize];
        if parent != node && selection.contains(&parent) {
            continue;
        }

        let transform = &mut scene.transforms[node as usize];
        match mode {
            TransformMode::Translate => transform.translation += delta,
            TransformMode::Scale => transform.scale += delta * SCALE_DAMPING,
            TransformMode::Rotate => {
                transform.rotation = Quat::from_scaled_axis(delta) * transform.rotation;
            }
            // Values were written directly by the panel
            TransformMode::TypeIn => {}
            TransformMode::None | TransformMode::Select => return,
        }
        scene.flags[node as usize].insert(NodeFlags::TRANSFORM);
    }
}

impl Gizmo {
    /// Run the widget for one frame: hit-test the handles, resolve any
    /// active drag into the selection, draw the handles.
    #[allow(clippy::too_many_arguments)]
    pub fn transform_widget(
        &mut self,
        scene: &mut Scene,
        selection: &[u32],
        mode: TransformMode,
        input: &InputState,
        view: &SceneView,
        dbg: &mut DebugDraw,
    ) {
        self.widget_selected = false;
        if !matches!(
            mode,
            TransformMode::Translate | TransformMode::Rotate | TransformMode::Scale
        ) {
            return;
        }

        let Some((centroid, _, _)) = selection_bounds(scene, selection) else {
            return;
        };
        let Some(d) = widget_size(centroid, view.view, view.proj) else {
            return;
        };

        // Mouse in the same space the projection helpers use (y up)
        let (mx, my) = input.mouse_position;
        let mouse = Vec2::new(mx, view.viewport.y - my);

        let ray_origin = unproject(mouse.extend(0.0), view.view, view.proj, view.viewport);
        let ray_end = unproject(mouse.extend(1.0), view.view, view.proj, view.viewport);
        let ray_dir = (ray_end - ray_origin).normalize_or_zero();

        match mode {
            TransformMode::Rotate => {
                self.rotate_rings(scene, selection, centroid, d, input, ray_origin, ray_dir, dbg)
            }
            _ => self.axis_handles(
                scene, selection, mode, centroid, d, input, view, mouse, ray_origin, ray_dir, dbg,
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn rotate_rings(
        &mut self,
        scene: &mut Scene,
        selection: &[u32],
        centroid: Vec3,
        d: f32,
        input: &InputState,
        ray_origin: Vec3,
        ray_dir: Vec3,
        dbg: &mut DebugDraw,
    ) {
        let radius = d * RING_SCALE;
        let held = input.button_down(MouseButton::Left);
        let pressed = input.button_pressed(MouseButton::Left);

        for (i, axis) in AXES.iter().enumerate() {
            let ip = ray_vs_plane(ray_dir, ray_origin, *axis, centroid);
            self.ring_hover[i] = ring_hovered(distance(ip, centroid), radius);

            if pressed {
                self.ring_grabbed[i] = self.ring_hover[i];
                self.prev_ring_dir[i] = (ip - centroid).normalize_or_zero();
            }

            let colour = if self.ring_hover[i] || (held && self.ring_grabbed[i]) {
                SELECTED_COLOUR
            } else {
                AXIS_COLOURS[i]
            };
            dbg.add_circle(*axis, centroid, radius, colour);

            if held && self.ring_grabbed[i] {
                let dir = (ip - centroid).normalize_or_zero();
                let prev = self.prev_ring_dir[i];
                let angle = prev.cross(dir).dot(*axis).atan2(prev.dot(dir));
                self.prev_ring_dir[i] = dir;

                dbg.add_line(centroid, centroid + dir * radius, SELECTED_COLOUR);
                trace!(axis = i, angle, "rotate drag");
                apply_to_selection(scene, selection, TransformMode::Rotate, *axis * angle);
                self.widget_selected = true;
                break;
            }
        }

        if !held {
            self.ring_grabbed = [false; 3];
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn axis_handles(
        &mut self,
        scene: &mut Scene,
        selection: &[u32],
        mode: TransformMode,
        centroid: Vec3,
        d: f32,
        input: &InputState,
        view: &SceneView,
        mouse: Vec2,
        ray_origin: Vec3,
        ray_dir: Vec3,
        dbg: &mut DebugDraw,
    ) {
        use engine::core::maths::project;

        let cam_world = view.view.inverse();
        let view_right = cam_world.x_axis.truncate();
        let view_up = cam_world.y_axis.truncate();

        let held = input.button_down(MouseButton::Left);
        let origin_screen = project(centroid, view.view, view.proj, view.viewport);
        let tips: Vec<Vec3> = AXES
            .iter()
            .map(|&a| project(centroid + a * d, view.view, view.proj, view.viewport))
            .collect();

        if !held {
            self.selected_axis = 0;

            // Planar handles first so they are reachable between the axes.
            // Each joint arc is hit-tested as the screen-space segment
            // between the two adjacent axis points.
            let pairs = [(0usize, 1usize), (0, 2), (1, 2)];
            for (a, b) in pairs {
                let pa = project(
                    centroid + AXES[a] * d * PLANE_HANDLE_SCALE,
                    view.view,
                    view.proj,
                    view.viewport,
                );
                let pb = project(
                    centroid + AXES[b] * d * PLANE_HANDLE_SCALE,
                    view.view,
                    view.proj,
                    view.viewport,
                );
                let cp = closest_point_on_line(
                    Vec3::new(pa.x, pa.y, 0.0),
                    Vec3::new(pb.x, pb.y, 0.0),
                    mouse.extend(0.0),
                );
                if distance(cp, mouse.extend(0.0)) < AXIS_PICK_DISTANCE {
                    self.selected_axis = (1 << a) | (1 << b);
                    break;
                }
            }

            if self.selected_axis == 0 {
                for i in 0..3 {
                    let start = Vec3::new(origin_screen.x, origin_screen.y, 0.0);
                    let end = Vec3::new(tips[i].x, tips[i].y, 0.0);
                    let cp = closest_point_on_line(start, end, mouse.extend(0.0));
                    if distance(cp, mouse.extend(0.0)) < AXIS_PICK_DISTANCE {
                        self.selected_axis = 1 << i;
                        break;
                    }
                }
            }

            // Seed the drag planes so the first held frame has a reference
            for i in 0..3 {
                let reference = if i == 1 { view_right } else { view_up };
                let normal = AXES[i].cross(reference).normalize_or_zero();
                self.pre_click_axis_pos[i] = ray_vs_plane(ray_dir, ray_origin, normal, centroid);
            }
        } else if self.selected_axis != 0 {
            // A planar handle sets a two-axis mask, but only the first
            // masked axis drives the drag. Combining both axes would
            // change the interactive feel.
            let mut move_delta = Vec3::ZERO;
            for i in 0..3 {
                if self.selected_axis & (1 << i) == 0 {
                    continue;
                }
                let reference = if i == 1 { view_right } else { view_up };
                let normal = AXES[i].cross(reference).normalize_or_zero();
                let cp = ray_vs_plane(ray_dir, ray_origin, normal, centroid);
                move_delta = AXES[i] * (cp - self.pre_click_axis_pos[i]).dot(AXES[i]);
                self.pre_click_axis_pos[i] = cp;
                break;
            }

            trace!(?mode, ?move_delta, "axis drag");
            apply_to_selection(scene, selection, mode, move_delta);
            self.widget_selected = true;
        }

        // Handle visuals: axis lines in 3-D, tips in 2-D
        for i in 0..3 {
            let colour = if self.selected_axis & (1 << i) != 0 {
                SELECTED_COLOUR
            } else {
                AXIS_COLOURS[i]
            };
            dbg.add_line(centroid, centroid + AXES[i] * d, colour);

            let tip = Vec2::new(tips[i].x, tips[i].y);
            if mode == TransformMode::Scale {
                dbg.add_quad_2d(tip, Vec2::splat(6.0), colour);
            } else {
                let back = (Vec2::new(origin_screen.x, origin_screen.y) - tip)
                    .normalize_or_zero()
                    * 8.0;
                let side = Vec2::new(-back.y, back.x) * 0.5;
                dbg.add_line_2d(tip, tip + back + side, colour);
                dbg.add_line_2d(tip, tip + back - side, colour);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::prelude::Transform;

    fn scene_with(positions: &[Vec3]) -> (Scene, Vec<u32>) {
        let mut scene = Scene::new();
        let nodes = positions
            .iter()
            .map(|&p| {
                let n = scene.new_node();
                scene.transforms[n as usize] = Transform::from_translation(p);
                n
            })
            .collect();
        scene.update(0.016);
        (scene, nodes)
    }

    #[test]
    fn test_ring_hit_tolerance() {
        let radius = 3.0;
        assert!(ring_hovered(radius, radius));
        assert!(ring_hovered(radius * 1.04, radius));
        assert!(!ring_hovered(radius * 1.2, radius));
        assert!(!ring_hovered(radius * 0.8, radius));
    }

    #[test]
    fn test_selection_centroid_averages_midpoints() {
        let (scene, nodes) = scene_with(&[Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);
        let (centroid, min, max) = selection_bounds(&scene, &nodes).unwrap();

        assert_eq!(centroid, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(max, Vec3::new(4.5, 0.5, 0.5));
    }

    #[test]
    fn test_selection_bounds_empty() {
        let scene = Scene::new();
        assert!(selection_bounds(&scene, &[]).is_none());
        assert!(selection_bounds(&scene, &[7]).is_none());
    }

    #[test]
    fn test_widget_size_behind_camera() {
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let view = Mat4::IDENTITY;

        assert!(widget_size(Vec3::new(0.0, 0.0, -10.0), view, proj).is_some());
        assert!(widget_size(Vec3::new(0.0, 0.0, 10.0), view, proj).is_none());
    }

    #[test]
    fn test_translate_applies_once_to_independent_nodes() {
        let (mut scene, nodes) = scene_with(&[Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]);

        apply_to_selection(&mut scene, &nodes, TransformMode::Translate, Vec3::Y);

        assert_eq!(scene.transforms[0].translation, Vec3::Y);
        assert_eq!(
            scene.transforms[1].translation,
            Vec3::new(4.0, 1.0, 0.0)
        );
        assert!(scene.flags[0].contains(NodeFlags::TRANSFORM));
    }

    #[test]
    fn test_selected_child_of_selected_parent_untouched() {
        let (mut scene, nodes) = scene_with(&[Vec3::ZERO, Vec3::X]);
        scene.set_parent(nodes[1], nodes[0]);

        apply_to_selection(&mut scene, &nodes, TransformMode::Translate, Vec3::Y);

        assert_eq!(scene.transforms[0].translation, Vec3::Y);
        // The child keeps its local transform and follows via the hierarchy
        assert_eq!(scene.transforms[1].translation, Vec3::X);
    }

    #[test]
    fn test_scale_delta_is_damped() {
        let (mut scene, nodes) = scene_with(&[Vec3::ZERO]);

        apply_to_selection(&mut scene, &nodes, TransformMode::Scale, Vec3::splat(1.0));

        assert_eq!(scene.transforms[0].scale, Vec3::splat(1.1));
    }

    #[test]
    fn test_rotate_premultiplies() {
        let (mut scene, nodes) = scene_with(&[Vec3::ZERO]);
        scene.transforms[0].rotation = Quat::from_rotation_x(0.5);

        let delta = Vec3::Y * 0.25;
        apply_to_selection(&mut scene, &nodes, TransformMode::Rotate, delta);

        let expected = Quat::from_scaled_axis(delta) * Quat::from_rotation_x(0.5);
        let got = scene.transforms[0].rotation;
        assert!((got.dot(expected).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_widget_skips_empty_selection() {
        let mut scene = Scene::new();
        let mut gizmo = Gizmo::default();
        let input = InputState::new();
        let mut dbg = DebugDraw::new();
        let view = SceneView {
            view: Mat4::IDENTITY,
            proj: Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0),
            viewport: Vec2::new(800.0, 600.0),
        };

        gizmo.transform_widget(
            &mut scene,
            &[],
            TransformMode::Translate,
            &input,
            &view,
            &mut dbg,
        );
        assert!(!gizmo.widget_selected);
        assert!(dbg.lines_3d().is_empty());
    }

    #[test]
    fn test_widget_draws_handles_for_visible_selection() {
        let (mut scene, nodes) = scene_with(&[Vec3::new(0.0, 0.0, -10.0)]);
        let mut gizmo = Gizmo::default();
        let input = InputState::new();
        let mut dbg = DebugDraw::new();
        let view = SceneView {
            view: Mat4::IDENTITY,
            proj: Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0),
            viewport: Vec2::new(800.0, 600.0),
        };

        gizmo.transform_widget(
            &mut scene,
            &nodes,
            TransformMode::Translate,
            &input,
            &view,
            &mut dbg,
        );
        // Three axis lines plus two 2-D arrow strokes per tip
        assert_eq!(dbg.lines_3d().len(), 3);
        assert_eq!(dbg.lines_2d().len(), 6);
    }

    #[test]
    fn test_planar_handle_hit_tests_as_segment() {
        use engine::core::maths::project;

        let (mut scene, nodes) = scene_with(&[Vec3::new(0.0, 0.0, -10.0)]);
        let mut gizmo = Gizmo::default();
        let mut dbg = DebugDraw::new();
        let view = SceneView {
            view: Mat4::IDENTITY,
            proj: Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0),
            viewport: Vec2::new(800.0, 600.0),
        };

        let (centroid, _, _) = selection_bounds(&scene, &nodes).unwrap();
        let d = widget_size(centroid, view.view, view.proj).unwrap();
        let pa = project(
            centroid + Vec3::X * d * PLANE_HANDLE_SCALE,
            view.view,
            view.proj,
            view.viewport,
        );
        let pb = project(
            centroid + Vec3::Y * d * PLANE_HANDLE_SCALE,
            view.view,
            view.proj,
            view.viewport,
        );

        // A point midway along the arc segment is far from both endpoints
        // but must still select the XY plane
        let mid = (Vec2::new(pa.x, pa.y) + Vec2::new(pb.x, pb.y)) * 0.5;
        let mut input = InputState::new();
        input.set_mouse_position(mid.x, view.viewport.y - mid.y);

        gizmo.transform_widget(
            &mut scene,
            &nodes,
            TransformMode::Translate,
            &input,
            &view,
            &mut dbg,
        );
        assert_eq!(gizmo.selected_axis, 0b011);
    }

    #[test]
    fn test_rotate_mode_draws_rings() {
        let (mut scene, nodes) = scene_with(&[Vec3::new(0.0, 0.0, -10.0)]);
        let mut gizmo = Gizmo::default();
        let input = InputState::new();
        let mut dbg = DebugDraw::new();
        let view = SceneView {
            view: Mat4::IDENTITY,
            proj: Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0),
            viewport: Vec2::new(800.0, 600.0),
        };

        gizmo.transform_widget(
            &mut scene,
            &nodes,
            TransformMode::Rotate,
            &input,
            &view,
            &mut dbg,
        );
        // 32 segments per ring, three rings
        assert_eq!(dbg.lines_3d().len(), 96);
    }
}
