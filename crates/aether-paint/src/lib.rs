//! Aether paint crate.
//!
//! Owns the stroke data model and everything that turns control points into
//! renderable primitives:
//! - `stroke` / `brush` / `material` / `style`: the value types
//! - `geometry`: smoothing, tube extrusion and the instanced base meshes
//! - `store`: committed strokes, the open stroke and the redo buffer
//! - `dispatch`: per-frame translation of the store into a renderer-agnostic draw list
//!
//! Nothing here touches the GPU. Renderers consume [`DrawList`].

pub mod brush;
pub mod dispatch;
pub mod geometry;
pub mod material;
pub mod store;
pub mod stroke;
pub mod style;

pub use brush::Brush;
pub use dispatch::{dispatch, BaseMesh, DrawCmd, DrawList, Primitive};
pub use geometry::{GeometrySettings, Mesh, Vertex};
pub use material::Material;
pub use store::StrokeStore;
pub use stroke::{Point, Stroke};
pub use style::Style;
