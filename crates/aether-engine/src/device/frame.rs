/// A single acquired frame.
///
/// Short-lived: holding the surface texture blocks acquisition of the next one.
/// The depth view is a cheap handle onto the depth texture owned by [`super::Gpu`].
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
