//! Shared GPU types and utilities used by the stroke renderers.

use std::num::NonZeroU64;

use aether_paint::{Material, Vertex};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

// ── uniforms ──────────────────────────────────────────────────────────────

/// Per-frame camera + light block (176 bytes), bind group 0.
///
///  offset   0  view         mat4x4
///  offset  64  proj         mat4x4
///  offset 128  viewer_pos   vec4 (w unused)
///  offset 144  light_pos    vec4 (w unused)
///  offset 160  light_color  vec4
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub viewer_pos: [f32; 4],
    pub light_pos: [f32; 4],
    pub light_color: [f32; 4],
}

impl CameraUniform {
    pub(super) fn new(view: Mat4, proj: Mat4, viewer_pos: Vec3, light: &super::Lighting) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            viewer_pos: viewer_pos.extend(1.0).to_array(),
            light_pos: light.position.extend(1.0).to_array(),
            light_color: light.color.extend(1.0).to_array(),
        }
    }
}

/// Per-stroke material block (64 bytes), bind group 1 with a dynamic offset.
///
///  offset  0  ambient    vec4
///  offset 16  diffuse    vec4
///  offset 32  specular   vec4
///  offset 48  shininess  vec4 (.x only)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(m: &Material) -> Self {
        Self {
            ambient: m.ambient.to_array(),
            diffuse: m.diffuse.to_array(),
            specular: m.specular.to_array(),
            shininess: Vec4::new(m.shininess, 0.0, 0.0, 0.0).to_array(),
        }
    }
}

pub(super) fn uniform_size<T>() -> NonZeroU64 {
    // Uniform structs here are all non-empty.
    NonZeroU64::new(std::mem::size_of::<T>() as u64).unwrap_or(NonZeroU64::MIN)
}

/// Rounds `size` up to the next multiple of `alignment` (a power of two).
pub(super) fn align_to(size: u64, alignment: u64) -> u64 {
    debug_assert!(alignment.is_power_of_two());
    (size + alignment - 1) & !(alignment - 1)
}

// ── vertex layouts ────────────────────────────────────────────────────────

/// Position-only vertex for lines and points.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct SimpleVertex {
    pub position: [f32; 3],
}

impl SimpleVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SimpleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const MESH_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3  // normal
];

/// Layout of [`aether_paint::Vertex`] (position + normal).
pub(super) fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRS,
    }
}

/// Per-instance model matrix (64 bytes), four column attributes at locations 2..=5.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Mat4> for InstanceRaw {
    fn from(m: &Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

impl InstanceRaw {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

// ── pipeline state ────────────────────────────────────────────────────────

pub(super) fn depth_state(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}

pub(super) fn primitive_state(topology: wgpu::PrimitiveTopology) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        // Tubes are open-ended; their inside is visible through the ends.
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

// ── shaders ───────────────────────────────────────────────────────────────

/// Parses and validates WGSL before it reaches the device.
///
/// wgpu reports shader errors through the device error handler, which panics
/// by default; validating up front lets a bad shader disable one family only.
pub(super) fn validate_wgsl(source: &str) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| e.as_inner().to_string())?;
    Ok(())
}

/// Validates and creates a shader module, logging and returning `None` on rejection.
pub(super) fn create_shader(
    device: &wgpu::Device,
    label: &'static str,
    source: &str,
) -> Option<wgpu::ShaderModule> {
    if let Err(msg) = validate_wgsl(source) {
        log::error!("{label} rejected; affected strokes will not be drawn:\n{msg}");
        return None;
    }
    Some(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 176);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 64);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
        assert_eq!(std::mem::size_of::<SimpleVertex>(), 12);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn align_rounds_up_to_power_of_two() {
        assert_eq!(align_to(64, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(0, 256), 0);
    }

    #[test]
    fn material_uniform_packs_shininess_in_x() {
        let m = Material::from_color(Vec4::new(1.0, 0.5, 0.0, 1.0));
        let u = MaterialUniform::from(&m);
        assert_eq!(u.diffuse, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(u.shininess[0], m.shininess);
    }

    #[test]
    fn bundled_shaders_validate() {
        assert_eq!(validate_wgsl(include_str!("shaders/simple.wgsl")), Ok(()));
        assert_eq!(validate_wgsl(include_str!("shaders/mesh.wgsl")), Ok(()));
    }

    #[test]
    fn broken_shader_is_rejected() {
        assert!(validate_wgsl("@vertex fn vs_main() -> @builtin(position) vec4<f32> { return 1; }").is_err());
        assert!(validate_wgsl("fn (").is_err());
    }
}
