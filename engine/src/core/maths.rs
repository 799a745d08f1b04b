//! Projection and intersection utilities
//!
//! Pure geometric helpers shared by the transform widget and the debug
//! overlays: world/screen projection, ray-plane intersection and closest
//! point on a segment. All functions assume well-formed camera matrices.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Project a world-space point to screen space.
///
/// Returns screen coordinates with the origin at the bottom-left and
/// z carrying normalised device depth (0 at the near plane).
pub fn project(point: Vec3, view: Mat4, proj: Mat4, viewport: Vec2) -> Vec3 {
    let clip = proj * view * point.extend(1.0);
    let ndc = clip / clip.w;

    Vec3::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (ndc.y * 0.5 + 0.5) * viewport.y,
        ndc.z,
    )
}

/// Unproject a screen-space point (with depth in 0..1) back to world space.
pub fn unproject(screen: Vec3, view: Mat4, proj: Mat4, viewport: Vec2) -> Vec3 {
    let inv = (proj * view).inverse();

    let ndc = Vec4::new(
        screen.x / viewport.x * 2.0 - 1.0,
        screen.y / viewport.y * 2.0 - 1.0,
        screen.z,
        1.0,
    );

    let world = inv * ndc;
    world.truncate() / world.w
}

/// Intersect a ray with a plane, returning the intersection point.
///
/// The plane is given by a normal and any point on it. A ray parallel to
/// the plane returns the ray origin.
pub fn ray_vs_plane(ray_dir: Vec3, ray_origin: Vec3, plane_normal: Vec3, plane_point: Vec3) -> Vec3 {
    let denom = ray_dir.dot(plane_normal);
    if denom.abs() < f32::EPSILON {
        return ray_origin;
    }

    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    ray_origin + ray_dir * t
}

/// Closest point to `p` on the segment `l1`-`l2`.
pub fn closest_point_on_line(l1: Vec3, l2: Vec3, p: Vec3) -> Vec3 {
    let v = l2 - l1;
    let len_sq = v.length_squared();
    if len_sq < f32::EPSILON {
        return l1;
    }

    let t = ((p - l1).dot(v) / len_sq).clamp(0.0, 1.0);
    l1 + v * t
}

/// Euclidean distance between two points.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).length()
}
