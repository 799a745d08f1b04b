//! Camera component and utilities
//!
//! Provides perspective and orthographic projection parameters and the
//! view-matrix calculation the editor projects through.

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Camera that defines projection parameters for rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    /// Field of view in radians (for perspective projection)
    pub fov_y_radians: f32,
    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Near clipping plane distance
    pub z_near: f32,
    /// Far clipping plane distance
    pub z_far: f32,
    /// Projection mode (perspective or orthographic)
    pub projection_mode: ProjectionMode,
}

/// Projection mode for the camera
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ProjectionMode {
    /// Perspective projection with depth
    Perspective,
    /// Orthographic projection (parallel)
    Orthographic {
        /// Height of the orthographic view
        height: f32,
    },
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a perspective camera
    ///
    /// # Arguments
    /// * `fov_y_degrees` - Vertical field of view in degrees
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance
    /// * `z_far` - Far clipping plane distance
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_radians: fov_y_degrees.to_radians(),
            aspect_ratio,
            z_near,
            z_far,
            projection_mode: ProjectionMode::Perspective,
        }
    }

    /// Create an orthographic camera
    pub fn orthographic(height: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_radians: 0.0, // Not used for orthographic
            aspect_ratio,
            z_near,
            z_far,
            projection_mode: ProjectionMode::Orthographic { height },
        }
    }

    /// Calculate the projection matrix for this camera
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => Mat4::perspective_rh(
                self.fov_y_radians,
                self.aspect_ratio,
                self.z_near,
                self.z_far,
            ),
            ProjectionMode::Orthographic { height } => {
                let half_height = height * 0.5;
                let half_width = half_height * self.aspect_ratio;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.z_near,
                    self.z_far,
                )
            }
        }
    }

    /// Calculate the view matrix from the camera's world matrix
    ///
    /// The view matrix is the inverse of the camera's world transform
    pub fn view_matrix(camera_world: &Mat4) -> Mat4 {
        camera_world.inverse()
    }

    /// Update the aspect ratio (useful when the viewport resizes)
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}
