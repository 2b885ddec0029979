use std::borrow::Cow;

use glam::Mat4;

use crate::geometry::Mesh;
use crate::material::Material;
use crate::stroke::Point;

/// Base mesh drawn once per instance by instanced styles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BaseMesh {
    Cube,
    Sphere,
}

/// Geometry of one draw command.
///
/// Point and mesh data borrow from the store where possible; instance
/// transforms and preview meshes are computed per frame and owned.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive<'a> {
    /// Connected line strip, identity model transform.
    LineStrip(&'a [Point]),
    /// One point primitive per entry, identity model transform.
    Points(&'a [Point]),
    /// One `mesh` instance per model matrix.
    Instanced {
        mesh: BaseMesh,
        transforms: Vec<Mat4>,
    },
    /// World-space indexed triangle mesh, identity model transform.
    Mesh(Cow<'a, Mesh>),
}

impl Primitive<'_> {
    /// Vertices, instances or indices the primitive would emit. Zero means nothing to draw.
    pub fn element_count(&self) -> usize {
        match self {
            Primitive::LineStrip(p) | Primitive::Points(p) => p.len(),
            Primitive::Instanced { transforms, .. } => transforms.len(),
            Primitive::Mesh(m) => m.indices.len(),
        }
    }
}

/// Renderer-agnostic draw command for one stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd<'a> {
    pub primitive: Primitive<'a>,
    pub material: Material,
    /// Set for the open stroke: frozen style and size, live brush material.
    pub preview: bool,
}
