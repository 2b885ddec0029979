//! Geometry generation.
//!
//! Pure functions from control points to vertex data. Degenerate input never
//! fails: it yields unchanged points or an empty mesh, which callers treat as
//! "nothing to draw".

mod mesh;
mod primitives;
mod smooth;
mod tube;

pub use mesh::{Mesh, Vertex};
pub use primitives::{unit_cube, unit_sphere};
pub use smooth::{smooth, SmoothingFilter};
pub use tube::generate_tube;

/// Tunables for derived geometry, owned by the stroke store.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeometrySettings {
    /// Low-pass filter applied to closing strokes and by `smooth_current`.
    pub smoothing: SmoothingFilter,

    /// Smooth a stroke once when it is committed.
    pub smooth_on_commit: bool,

    /// Vertices per tube ring.
    pub ring_segments: u32,

    /// Tube radius per unit of brush size.
    pub tube_radius_scale: f32,

    /// Instanced mesh scale per unit of brush size.
    pub instance_scale: f32,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            smoothing: SmoothingFilter::default(),
            smooth_on_commit: true,
            ring_segments: 12,
            tube_radius_scale: 0.02,
            instance_scale: 0.1,
        }
    }
}

impl GeometrySettings {
    #[inline]
    pub fn tube_radius(&self, size: f32) -> f32 {
        size * self.tube_radius_scale
    }

    #[inline]
    pub fn instance_size(&self, size: f32) -> f32 {
        size * self.instance_scale
    }

    /// Builds the tube mesh for `points` drawn at brush `size`.
    pub fn tube_for(&self, points: &[glam::Vec3], size: f32) -> Mesh {
        generate_tube(points, self.tube_radius(size), self.ring_segments)
    }
}
