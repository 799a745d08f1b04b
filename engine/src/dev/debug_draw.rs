//! Immediate-mode debug drawing
//!
//! Primitives accumulate into line buffers the renderer drains each
//! frame; nothing persists between frames.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A coloured 3-D line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Vec3,
    pub end: Vec3,
    pub colour: Vec4,
}

/// A coloured 2-D line segment in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    pub start: Vec2,
    pub end: Vec2,
    pub colour: Vec4,
}

/// Per-frame debug primitive buffers
#[derive(Debug, Default)]
pub struct DebugDraw {
    lines_3d: Vec<Line3>,
    lines_2d: Vec<Line2>,
}

const CIRCLE_SEGMENTS: u32 = 32;

impl DebugDraw {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a world-space line
    pub fn add_line(&mut self, start: Vec3, end: Vec3, colour: Vec4) {
        self.lines_3d.push(Line3 { start, end, colour });
    }

    /// Add a screen-space line
    pub fn add_line_2d(&mut self, start: Vec2, end: Vec2, colour: Vec4) {
        self.lines_2d.push(Line2 { start, end, colour });
    }

    /// Add a circle of the given radius lying in the plane of `normal`
    pub fn add_circle(&mut self, normal: Vec3, centre: Vec3, radius: f32, colour: Vec4) {
        let (u, v) = normal.normalize_or_zero().any_orthonormal_pair();

        let mut prev = centre + u * radius;
        for i in 1..=CIRCLE_SEGMENTS {
            let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            let point = centre + (u * angle.cos() + v * angle.sin()) * radius;
            self.add_line(prev, point, colour);
            prev = point;
        }
    }

    /// Add a screen-space quad outline centred at `centre`
    pub fn add_quad_2d(&mut self, centre: Vec2, size: Vec2, colour: Vec4) {
        let half = size * 0.5;
        let corners = [
            centre + Vec2::new(-half.x, -half.y),
            centre + Vec2::new(half.x, -half.y),
            centre + Vec2::new(half.x, half.y),
            centre + Vec2::new(-half.x, half.y),
        ];
        for i in 0..4 {
            self.add_line_2d(corners[i], corners[(i + 1) % 4], colour);
        }
    }

    /// Add a world-space axis-aligned box outline
    pub fn add_aabb(&mut self, min: Vec3, max: Vec3, colour: Vec4) {
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        for (a, b) in edges {
            self.add_line(corners[a], corners[b], colour);
        }
    }

    /// Draw a world matrix as an RGB coordinate frame
    pub fn add_coord_space(&mut self, matrix: Mat4, size: f32) {
        let origin = matrix.w_axis.truncate();
        let axes = [
            (matrix.x_axis.truncate(), Vec4::new(1.0, 0.0, 0.0, 1.0)),
            (matrix.y_axis.truncate(), Vec4::new(0.0, 1.0, 0.0, 1.0)),
            (matrix.z_axis.truncate(), Vec4::new(0.0, 0.0, 1.0, 1.0)),
        ];
        for (axis, colour) in axes {
            self.add_line(origin, origin + axis.normalize_or_zero() * size, colour);
        }
    }

    /// Draw a grid on the XZ plane centred at `centre`
    pub fn add_grid(&mut self, centre: Vec3, size: Vec3, divisions: u32) {
        let colour = Vec4::new(0.3, 0.3, 0.3, 1.0);
        let half = size * 0.5;
        for i in 0..=divisions {
            let t = i as f32 / divisions as f32;
            let x = centre.x - half.x + size.x * t;
            let z = centre.z - half.z + size.z * t;
            self.add_line(
                Vec3::new(x, centre.y, centre.z - half.z),
                Vec3::new(x, centre.y, centre.z + half.z),
                colour,
            );
            self.add_line(
                Vec3::new(centre.x - half.x, centre.y, z),
                Vec3::new(centre.x + half.x, centre.y, z),
                colour,
            );
        }
    }

    /// World-space lines accumulated this frame
    pub fn lines_3d(&self) -> &[Line3] {
        &self.lines_3d
    }

    /// Screen-space lines accumulated this frame
    pub fn lines_2d(&self) -> &[Line2] {
        &self.lines_2d
    }

    /// Drop all accumulated primitives; the renderer calls this after
    /// drawing them
    pub fn clear(&mut self) {
        self.lines_3d.clear();
        self.lines_2d.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_has_twelve_edges() {
        let mut dbg = DebugDraw::new();
        dbg.add_aabb(Vec3::ZERO, Vec3::ONE, Vec4::ONE);
        assert_eq!(dbg.lines_3d().len(), 12);
    }

    #[test]
    fn test_circle_closes() {
        let mut dbg = DebugDraw::new();
        dbg.add_circle(Vec3::Y, Vec3::ZERO, 2.0, Vec4::ONE);

        let lines = dbg.lines_3d();
        assert_eq!(lines.len(), 32);
        // Segments chain, and the last closes back to the first
        assert!((lines.last().unwrap().end - lines[0].start).length() < 1e-3);
        for line in lines {
            assert!((line.start.length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut dbg = DebugDraw::new();
        dbg.add_line(Vec3::ZERO, Vec3::X, Vec4::ONE);
        dbg.add_quad_2d(Vec2::ZERO, Vec2::ONE, Vec4::ONE);
        assert!(!dbg.lines_3d().is_empty());
        assert!(!dbg.lines_2d().is_empty());

        dbg.clear();
        assert!(dbg.lines_3d().is_empty());
        assert!(dbg.lines_2d().is_empty());
    }
}
