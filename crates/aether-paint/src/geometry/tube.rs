use std::f32::consts::TAU;

use glam::Vec3;

use super::mesh::{Mesh, Vertex};

/// Reference axis for ring frames.
const WORLD_UP: Vec3 = Vec3::Y;

/// Used instead of `WORLD_UP` when the tangent is this close to parallel with it.
const SECONDARY_AXIS: Vec3 = Vec3::X;

/// |cos| between tangent and `WORLD_UP` above which `SECONDARY_AXIS` is used.
const PARALLEL_THRESHOLD: f32 = 0.99;

/// Extrudes a closed-section, open-ended tube along `points`.
///
/// Emits `ring_segments` vertices per control point, evenly spaced around the
/// local tangent at `radius`, each with an outward unit normal. Consecutive
/// rings are joined by two triangles per segment, wound counter-clockwise when
/// seen from outside.
///
/// Output sizes for `n >= 2` points and `s` segments: `n * s` vertices and
/// `(n - 1) * s * 2` triangles. Fewer than two points, or zero segments,
/// produce an empty mesh.
pub fn generate_tube(points: &[Vec3], radius: f32, ring_segments: u32) -> Mesh {
    if points.len() < 2 || ring_segments == 0 {
        return Mesh::default();
    }

    let segments = ring_segments as usize;
    let mut mesh = Mesh {
        vertices: Vec::with_capacity(points.len() * segments),
        indices: Vec::with_capacity((points.len() - 1) * segments * 6),
    };

    for (&center, tangent) in points.iter().zip(tangents(points)) {
        let (right, up) = ring_frame(tangent);
        for j in 0..segments {
            let angle = TAU * j as f32 / segments as f32;
            let normal = right * angle.cos() + up * angle.sin();
            mesh.vertices.push(Vertex::new(center + normal * radius, normal));
        }
    }

    for ring in 0..points.len() as u32 - 1 {
        let base = ring * ring_segments;
        let next = base + ring_segments;
        for j in 0..ring_segments {
            let k = (j + 1) % ring_segments;
            let (a, b, c, d) = (base + j, base + k, next + k, next + j);
            mesh.indices.extend_from_slice(&[a, c, b, a, d, c]);
        }
    }

    mesh
}

/// Per-point travel direction.
///
/// Each point looks toward its successor; the last point reuses the previous
/// segment's direction. Zero-length segments inherit the nearest valid
/// direction so coincident samples never produce a degenerate frame.
fn tangents(points: &[Vec3]) -> Vec<Vec3> {
    let segments: Vec<Option<Vec3>> = points
        .windows(2)
        .map(|w| (w[1] - w[0]).try_normalize())
        .collect();

    let mut carry = segments.iter().flatten().copied().next().unwrap_or(Vec3::Z);
    let mut out: Vec<Vec3> = segments
        .iter()
        .map(|seg| {
            if let Some(dir) = seg {
                carry = *dir;
            }
            carry
        })
        .collect();
    out.push(carry);
    out
}

/// Orthonormal `(right, up)` pair perpendicular to a unit `tangent`.
fn ring_frame(tangent: Vec3) -> (Vec3, Vec3) {
    let reference = if tangent.dot(WORLD_UP).abs() > PARALLEL_THRESHOLD {
        SECONDARY_AXIS
    } else {
        WORLD_UP
    };
    let right = tangent.cross(reference).normalize();
    let up = right.cross(tangent);
    (right, up)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn line(n: usize, dir: Vec3) -> Vec<Vec3> {
        (0..n).map(|i| dir * i as f32).collect()
    }

    // ── sizes ─────────────────────────────────────────────────────────────

    #[test]
    fn vertex_and_triangle_counts() {
        for n in 2..6 {
            for s in [3u32, 8, 12] {
                let mesh = generate_tube(&line(n, Vec3::X), 0.5, s);
                assert_eq!(mesh.vertex_count(), n * s as usize);
                assert_eq!(mesh.triangle_count(), (n - 1) * s as usize * 2);
            }
        }
    }

    #[test]
    fn fewer_than_two_points_is_empty() {
        assert!(generate_tube(&[], 1.0, 8).is_empty());
        let one = generate_tube(&[Vec3::ONE], 1.0, 8);
        assert!(one.vertices.is_empty());
        assert!(one.indices.is_empty());
    }

    #[test]
    fn zero_segments_is_empty() {
        assert!(generate_tube(&line(3, Vec3::X), 1.0, 0).is_empty());
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = generate_tube(&line(4, Vec3::Z), 0.1, 7);
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }

    // ── ring geometry ─────────────────────────────────────────────────────

    #[test]
    fn ring_vertices_sit_at_radius_with_unit_normals() {
        let pts = vec![Vec3::ZERO, Vec3::new(1.0, 0.5, 0.0), Vec3::new(2.0, 0.0, 1.0)];
        let radius = 0.25;
        let mesh = generate_tube(&pts, radius, 10);

        for (ring, center) in pts.iter().enumerate() {
            for v in &mesh.vertices[ring * 10..(ring + 1) * 10] {
                assert_abs_diff_eq!((v.position() - *center).length(), radius, epsilon = 1e-5);
                assert_abs_diff_eq!(v.normal().length(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn normals_are_perpendicular_to_segment() {
        let mesh = generate_tube(&line(3, Vec3::new(1.0, 1.0, 0.0)), 0.2, 8);
        let tangent = Vec3::new(1.0, 1.0, 0.0).normalize();
        for v in &mesh.vertices {
            assert_abs_diff_eq!(v.normal().dot(tangent), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn last_ring_reuses_previous_direction() {
        let pts = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0)];
        let mesh = generate_tube(&pts, 0.1, 6);
        for v in &mesh.vertices[12..18] {
            assert_abs_diff_eq!(v.normal().dot(Vec3::Z), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn vertical_tangent_uses_secondary_axis() {
        let mesh = generate_tube(&line(3, Vec3::Y), 0.3, 8);
        for v in &mesh.vertices {
            assert!(v.position().is_finite());
            assert_abs_diff_eq!(v.normal().length(), 1.0, epsilon = 1e-5);
            assert_abs_diff_eq!(v.normal().dot(Vec3::Y), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn coincident_points_stay_finite() {
        let pts = vec![Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
        let mesh = generate_tube(&pts, 0.1, 6);
        assert_eq!(mesh.vertex_count(), 30);
        assert!(mesh.vertices.iter().all(|v| v.position().is_finite() && v.normal().is_finite()));
    }

    #[test]
    fn all_coincident_points_stay_finite() {
        let mesh = generate_tube(&[Vec3::ONE; 3], 0.1, 4);
        assert!(mesh.vertices.iter().all(|v| v.normal().is_finite()));
    }

    // ── winding ───────────────────────────────────────────────────────────

    #[test]
    fn triangles_face_outward() {
        let mesh = generate_tube(&line(4, Vec3::new(0.3, 0.2, 1.0)), 0.5, 12);
        for [a, b, c] in mesh.triangles() {
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            let outward = a.normal() + b.normal() + c.normal();
            assert!(face.dot(outward) > 0.0);
        }
    }
}
