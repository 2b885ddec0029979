//! Stroke rendering.
//!
//! [`StrokeRenderer`] consumes the per-frame [`DrawList`] produced by
//! `aether_paint::dispatch` and owns every GPU resource needed to draw it. Three
//! families, each with its own vertex layout and buffers:
//! - simple: Freehand line strips and Points (position only, unlit)
//! - instanced: Cube and Sphere (base mesh + per-instance model matrix)
//! - tube: world-space indexed meshes (position + normal)
//!
//! All strokes are drawn in a single pass, in list order, with depth testing.
//! Bind group 0 is the camera/light block; bind group 1 is the stroke material,
//! selected per draw with a dynamic offset into one uniform arena.

mod batch;
mod buffer;
mod common;
mod instanced;
mod simple;
mod tube;

use aether_paint::{dispatch, DrawList, StrokeStore};
use glam::{Mat4, Vec3};

use crate::render::{RenderCtx, RenderTarget};

use batch::{BatchItem, StrokeBatch};
use buffer::GpuBuffer;
use common::{align_to, uniform_size, CameraUniform, MaterialUniform};
use instanced::InstancedFamily;
use simple::SimpleFamily;
use tube::TubeFamily;

/// Point light used by the lit families.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lighting {
    /// World-space light position.
    pub position: Vec3,
    /// Linear RGB light color.
    pub color: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 10.0, 5.0),
            color: Vec3::ONE,
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    pub lighting: Lighting,
    /// Latitude bands of the instanced sphere.
    pub sphere_stacks: u32,
    /// Longitude segments of the instanced sphere.
    pub sphere_sectors: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            lighting: Lighting::default(),
            sphere_stacks: 12,
            sphere_sectors: 16,
        }
    }
}

/// Camera matrices and eye position for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraParams {
    pub view: Mat4,
    pub projection: Mat4,
    pub viewer_pos: Vec3,
}

/// Attachment formats a pipeline was built for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct PipelineKey {
    surface_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
}

/// Layouts and the camera binding shared by every family.
struct SharedBindings {
    material_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    camera_ubo: GpuBuffer,
    camera_bind_group: wgpu::BindGroup,
    /// Byte distance between materials in the arena.
    material_stride: u64,
}

/// Render Resource Manager for strokes.
///
/// GPU objects are created lazily on the first frame and rebuilt when the
/// attachment formats change. Buffers are released when the renderer drops.
pub struct StrokeRenderer {
    config: RendererConfig,
    batch: StrokeBatch,

    shared: Option<SharedBindings>,
    material_arena: Option<GpuBuffer>,
    material_bind_group: Option<wgpu::BindGroup>,

    simple: SimpleFamily,
    instanced: InstancedFamily,
    tube: TubeFamily,

    warned_skipped: bool,
}

impl Default for StrokeRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

impl StrokeRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            batch: StrokeBatch::default(),
            shared: None,
            material_arena: None,
            material_bind_group: None,
            simple: SimpleFamily::default(),
            instanced: InstancedFamily::new(config.sphere_stacks, config.sphere_sectors),
            tube: TubeFamily::default(),
            warned_skipped: false,
        }
    }

    pub fn lighting(&self) -> Lighting {
        self.config.lighting
    }

    pub fn set_lighting(&mut self, lighting: Lighting) {
        self.config.lighting = lighting;
    }

    /// Dispatches `store` and draws the result: committed strokes in commit
    /// order, then the open stroke's preview.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        store: &StrokeStore,
        camera: &CameraParams,
    ) {
        let list = dispatch(store);
        self.render(ctx, target, &list, camera);
    }

    /// Uploads `list` and records one render pass drawing it.
    ///
    /// The target must already be cleared; color and depth are loaded.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        list: &DrawList<'_>,
        camera: &CameraParams,
    ) {
        self.batch.build(list);
        if self.batch.is_empty() {
            return;
        }

        self.ensure_shared(ctx);
        let Some(shared) = self.shared.as_ref() else { return };

        let key = PipelineKey {
            surface_format: ctx.surface_format,
            depth_format: ctx.depth_format,
        };
        self.simple.ensure_pipeline(ctx, key, &shared.pipeline_layout);
        self.instanced.ensure_pipeline(ctx, key, &shared.pipeline_layout);
        self.tube.ensure_pipeline(ctx, key, &shared.pipeline_layout);

        let uniform = CameraUniform::new(
            camera.view,
            camera.projection,
            camera.viewer_pos,
            &self.config.lighting,
        );
        ctx.queue
            .write_buffer(shared.camera_ubo.buffer(), 0, bytemuck::bytes_of(&uniform));

        self.upload_materials(ctx);
        self.simple.upload(ctx, &self.batch);
        self.instanced.upload(ctx, &self.batch);
        self.tube.upload(ctx, &self.batch);

        let skipped = self.record_pass(target);
        if skipped > 0 && !self.warned_skipped {
            log::warn!("{skipped} stroke draw(s) skipped: their style family is unavailable");
            self.warned_skipped = true;
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_shared(&mut self, ctx: &RenderCtx<'_>) {
        if self.shared.is_some() {
            return;
        }

        let camera_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("aether camera bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(uniform_size::<CameraUniform>()),
                },
                count: None,
            }],
        });

        let material_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("aether material bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(uniform_size::<MaterialUniform>()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("aether stroke pipeline layout"),
            bind_group_layouts: &[&camera_layout, &material_layout],
            immediate_size: 0,
        });

        let camera_ubo = GpuBuffer::new(
            ctx.device,
            "aether camera ubo",
            wgpu::BufferUsages::UNIFORM,
            std::mem::size_of::<CameraUniform>() as u64,
        );

        let camera_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("aether camera bind group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.buffer().as_entire_binding(),
            }],
        });

        let alignment = u64::from(ctx.device.limits().min_uniform_buffer_offset_alignment);
        let material_stride =
            align_to(std::mem::size_of::<MaterialUniform>() as u64, alignment);

        self.shared = Some(SharedBindings {
            material_layout,
            pipeline_layout,
            camera_ubo,
            camera_bind_group,
            material_stride,
        });
        self.material_arena = None;
        self.material_bind_group = None;
    }

    fn upload_materials(&mut self, ctx: &RenderCtx<'_>) {
        let Some(shared) = self.shared.as_ref() else { return };
        let bytes = self.batch.material_bytes(shared.material_stride);

        let arena = self.material_arena.get_or_insert_with(|| {
            GpuBuffer::new(
                ctx.device,
                "aether material arena",
                wgpu::BufferUsages::UNIFORM,
                bytes.len() as u64,
            )
        });
        let grown = arena.upload(ctx.device, ctx.queue, &bytes);

        if grown || self.material_bind_group.is_none() {
            self.material_bind_group =
                Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("aether material bind group"),
                    layout: &shared.material_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: arena.buffer(),
                            offset: 0,
                            size: Some(uniform_size::<MaterialUniform>()),
                        }),
                    }],
                }));
        }
    }

    /// Records the stroke pass. Returns how many items were skipped.
    fn record_pass(&self, target: &mut RenderTarget<'_>) -> usize {
        let Some(shared) = self.shared.as_ref() else { return 0 };
        let Some(material_bind_group) = self.material_bind_group.as_ref() else { return 0 };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("aether stroke pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, &shared.camera_bind_group, &[]);

        let mut skipped = 0;
        for item in &self.batch.items {
            let ready = match item {
                BatchItem::Lines { .. } | BatchItem::Points { .. } => self.simple.is_ready(),
                BatchItem::Instanced { .. } => self.instanced.is_ready(),
                BatchItem::Tube { .. } => self.tube.is_ready(),
            };
            if !ready {
                skipped += 1;
                continue;
            }

            let offset = (u64::from(item.material()) * shared.material_stride) as u32;
            rpass.set_bind_group(1, material_bind_group, &[offset]);

            match item {
                BatchItem::Lines { vertices, .. } => {
                    self.simple.draw(&mut rpass, vertices.clone(), false)
                }
                BatchItem::Points { vertices, .. } => {
                    self.simple.draw(&mut rpass, vertices.clone(), true)
                }
                BatchItem::Instanced { mesh, instances, .. } => {
                    self.instanced.draw(&mut rpass, *mesh, instances.clone())
                }
                BatchItem::Tube { indices, .. } => self.tube.draw(&mut rpass, indices.clone()),
            }
        }
        skipped
    }
}
