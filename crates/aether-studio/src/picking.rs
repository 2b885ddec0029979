//! Screen-to-world picking against a camera-facing plane.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::FlyCamera;

/// Maps a cursor position to the world point where its view ray meets the plane
/// `distance` units in front of the camera (normal = camera front).
///
/// `cursor` and `viewport` are in physical pixels, top-left origin. A degenerate
/// viewport or a ray parallel to the plane yields the plane's anchor point.
pub fn screen_to_world(cursor: Vec2, viewport: Vec2, camera: &FlyCamera, distance: f32) -> Vec3 {
    let front = camera.front();
    let anchor = camera.position + front * distance;

    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return anchor;
    }

    let view_proj = camera.projection_matrix(viewport.x / viewport.y) * camera.view_matrix();
    let Some((origin, dir)) = cursor_ray(cursor, viewport, view_proj) else {
        return anchor;
    };

    let denom = dir.dot(front);
    if denom.abs() <= f32::EPSILON {
        return anchor;
    }
    let t = (anchor - origin).dot(front) / denom;
    origin + dir * t
}

/// Ray from the near plane through the cursor, as (origin, unit direction).
fn cursor_ray(cursor: Vec2, viewport: Vec2, view_proj: Mat4) -> Option<(Vec3, Vec3)> {
    let ndc = Vec2::new(
        2.0 * cursor.x / viewport.x - 1.0,
        1.0 - 2.0 * cursor.y / viewport.y,
    );
    let inv = view_proj.inverse();
    let near = inv.project_point3(ndc.extend(0.0));
    let far = inv.project_point3(ndc.extend(1.0));
    let dir = (far - near).try_normalize()?;
    near.is_finite().then_some((near, dir))
}
