//! Editor camera controllers

use engine::prelude::{InputState, Mat4, Quat, Vec2, Vec3};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// How the viewport camera is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Orbit around a focus point
    Modelling,
    /// Free-look WASD flight
    Fly,
}

impl CameraMode {
    pub const ALL: [Self; 2] = [Self::Modelling, Self::Fly];

    pub fn label(self) -> &'static str {
        match self {
            Self::Modelling => "Modelling",
            Self::Fly => "Fly",
        }
    }
}

/// Orbit camera state for the modelling mode
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits and looks at
    pub focus: Vec3,
    /// Distance from the focus point
    pub zoom: f32,
    /// Pitch and yaw in radians
    pub rotation: Vec2,
    pub mode: CameraMode,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            zoom: 10.0,
            rotation: Vec2::new(-0.5, 0.5),
            mode: CameraMode::Modelling,
        }
    }
}

const ROTATE_SPEED: f32 = 0.005;
const FLY_SPEED: f32 = 10.0;

impl OrbitCamera {
    /// World matrix of the camera
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.focus)
            * Mat4::from_quat(self.orientation())
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.zoom))
    }

    /// View matrix, the inverse of the camera's world matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    fn orientation(&self) -> Quat {
        Quat::from_rotation_y(self.rotation.y) * Quat::from_rotation_x(self.rotation.x)
    }

    /// Centre the camera on a point, zooming out far enough to frame the
    /// given extents
    pub fn focus_on(&mut self, position: Vec3, extents: Vec3) {
        self.focus = position;
        self.zoom = extents.length().max(1.0) * 2.0;
    }

    /// Drive the camera from input. Orbit mode rotates with the right
    /// button and zooms with the wheel; fly mode moves the focus with
    /// WASD along the view axes.
    pub fn update(&mut self, input: &InputState, prev_mouse: (f32, f32), dt: f32) {
        let (mx, my) = input.mouse_position;
        let delta = Vec2::new(mx - prev_mouse.0, my - prev_mouse.1);

        if input.button_down(MouseButton::Right) {
            self.rotation.y -= delta.x * ROTATE_SPEED;
            self.rotation.x -= delta.y * ROTATE_SPEED;
        }

        match self.mode {
            CameraMode::Modelling => {
                self.zoom = (self.zoom - input.wheel_delta).max(0.1);
            }
            CameraMode::Fly => {
                let orientation = self.orientation();
                let forward = orientation * Vec3::NEG_Z;
                let right = orientation * Vec3::X;

                let mut movement = Vec3::ZERO;
                if input.key_down(KeyCode::KeyW) {
                    movement += forward;
                }
                if input.key_down(KeyCode::KeyS) {
                    movement -= forward;
                }
                if input.key_down(KeyCode::KeyD) {
                    movement += right;
                }
                if input.key_down(KeyCode::KeyA) {
                    movement -= right;
                }
                self.focus += movement * FLY_SPEED * dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_is_inverse_of_world() {
        let camera = OrbitCamera {
            focus: Vec3::new(1.0, 2.0, 3.0),
            zoom: 5.0,
            rotation: Vec2::new(0.3, -0.7),
            mode: CameraMode::Modelling,
        };

        let identity = camera.world_matrix() * camera.view_matrix();
        let diff: f32 = (identity - Mat4::IDENTITY).to_cols_array().iter().map(|v| v.abs()).sum();
        assert!(diff < 1e-4);
    }

    #[test]
    fn test_focus_on_frames_extents() {
        let mut camera = OrbitCamera::default();
        camera.focus_on(Vec3::new(5.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 4.0));

        assert_eq!(camera.focus, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(camera.zoom, 10.0);
    }

    #[test]
    fn test_wheel_zooms_in_modelling_mode() {
        let mut camera = OrbitCamera::default();
        let mut input = InputState::new();
        input.add_wheel_delta(2.0);

        let start = camera.zoom;
        camera.update(&input, input.mouse_position, 0.016);
        assert_eq!(camera.zoom, start - 2.0);
    }
}
