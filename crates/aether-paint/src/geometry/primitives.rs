use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use super::mesh::{Mesh, Vertex};

/// Unit cube centered at the origin (extent `[-0.5, 0.5]`).
///
/// Faces carry flat normals, so corners are duplicated: 24 vertices, 36 indices.
pub fn unit_cube() -> Mesh {
    // (normal, u, v) with u x v = normal so quads wind counter-clockwise from outside.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut mesh = Mesh {
        vertices: Vec::with_capacity(24),
        indices: Vec::with_capacity(36),
    };

    for (normal, u, v) in FACES {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * 0.5;
            mesh.vertices.push(Vertex::new(position, normal));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

/// UV sphere of radius 0.5 centered at the origin, Y up.
///
/// `stacks` is clamped to at least 2 and `sectors` to at least 3.
/// Produces `(stacks + 1) * (sectors + 1)` vertices; the pole bands emit one
/// triangle per sector, every other band two.
pub fn unit_sphere(stacks: u32, sectors: u32) -> Mesh {
    const RADIUS: f32 = 0.5;

    let stacks = stacks.max(2);
    let sectors = sectors.max(3);

    let mut mesh = Mesh {
        vertices: Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize),
        indices: Vec::with_capacity((6 * sectors * (stacks - 1)) as usize),
    };

    for i in 0..=stacks {
        let phi = FRAC_PI_2 - PI * i as f32 / stacks as f32;
        let (y, ring) = (phi.sin(), phi.cos());
        for j in 0..=sectors {
            let theta = TAU * j as f32 / sectors as f32;
            let normal = Vec3::new(ring * theta.cos(), y, -ring * theta.sin());
            mesh.vertices.push(Vertex::new(normal * RADIUS, normal));
        }
    }

    for i in 0..stacks {
        let k1 = i * (sectors + 1);
        let k2 = k1 + sectors + 1;
        for j in 0..sectors {
            let (a, b) = (k1 + j, k2 + j);
            if i != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_outward(mesh: &Mesh) {
        for [a, b, c] in mesh.triangles() {
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            let centroid = (a.position() + b.position() + c.position()) / 3.0;
            assert!(face.dot(centroid) > 0.0, "inward-facing triangle at {centroid:?}");
        }
    }

    #[test]
    fn cube_counts_and_extent() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.indices.len(), 36);
        for v in &cube.vertices {
            assert_abs_diff_eq!(v.position().abs().max_element(), 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn cube_faces_point_outward() {
        assert_outward(&unit_cube());
    }

    #[test]
    fn sphere_counts() {
        let sphere = unit_sphere(8, 16);
        assert_eq!(sphere.vertex_count(), 9 * 17);
        assert_eq!(sphere.indices.len(), 6 * 16 * 7);
    }

    #[test]
    fn sphere_vertices_on_surface() {
        for v in &unit_sphere(6, 12).vertices {
            assert_abs_diff_eq!(v.position().length(), 0.5, epsilon = 1e-5);
            assert_abs_diff_eq!(v.normal().length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn sphere_faces_point_outward() {
        assert_outward(&unit_sphere(6, 12));
    }

    #[test]
    fn sphere_resolution_is_clamped() {
        let sphere = unit_sphere(0, 0);
        assert_eq!(sphere.vertex_count(), 3 * 4);
        assert_eq!(sphere.indices.len(), 6 * 3);
    }
}
