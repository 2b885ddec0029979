use aether_paint::geometry::{unit_cube, unit_sphere};
use aether_paint::{BaseMesh, Mesh};

use crate::render::RenderCtx;

use super::batch::StrokeBatch;
use super::buffer::GpuBuffer;
use super::common::{
    alpha_blend, create_shader, depth_state, mesh_vertex_layout, primitive_state, InstanceRaw,
};
use super::PipelineKey;

/// One base mesh with its own instance buffer.
///
/// Cube and sphere each get a complete set, so switching styles between draws
/// never rewrites shared geometry.
struct InstancedMesh {
    name: &'static str,
    vbo: GpuBuffer,
    ibo: GpuBuffer,
    index_count: u32,
    instances: Option<GpuBuffer>,
}

impl InstancedMesh {
    fn new(
        device: &wgpu::Device,
        name: &'static str,
        labels: [&'static str; 2],
        mesh: &Mesh,
    ) -> Self {
        let [vbo_label, ibo_label] = labels;
        Self {
            name,
            vbo: GpuBuffer::with_contents(
                device,
                vbo_label,
                wgpu::BufferUsages::VERTEX,
                bytemuck::cast_slice(&mesh.vertices),
            ),
            ibo: GpuBuffer::with_contents(
                device,
                ibo_label,
                wgpu::BufferUsages::INDEX,
                bytemuck::cast_slice(&mesh.indices),
            ),
            index_count: mesh.indices.len() as u32,
            instances: None,
        }
    }

    fn upload(&mut self, ctx: &RenderCtx<'_>, label: &'static str, data: &[InstanceRaw]) {
        if data.is_empty() {
            return;
        }
        let buffer = self.instances.get_or_insert_with(|| {
            GpuBuffer::new(ctx.device, label, wgpu::BufferUsages::VERTEX, 0)
        });
        if buffer.upload(ctx.device, ctx.queue, bytemuck::cast_slice(data)) {
            log::debug!("{} instance buffer now {} bytes", self.name, buffer.capacity());
        }
    }
}

/// Cube and Sphere family: lit base meshes positioned by per-instance model matrices.
pub(super) struct InstancedFamily {
    sphere_stacks: u32,
    sphere_sectors: u32,

    key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    cube: Option<InstancedMesh>,
    sphere: Option<InstancedMesh>,
    disabled: bool,
}

impl InstancedFamily {
    pub(super) fn new(sphere_stacks: u32, sphere_sectors: u32) -> Self {
        Self {
            sphere_stacks,
            sphere_sectors,
            key: None,
            pipeline: None,
            cube: None,
            sphere: None,
            disabled: false,
        }
    }

    pub(super) fn is_ready(&self) -> bool {
        !self.disabled && self.pipeline.is_some()
    }

    pub(super) fn ensure_pipeline(
        &mut self,
        ctx: &RenderCtx<'_>,
        key: PipelineKey,
        layout: &wgpu::PipelineLayout,
    ) {
        if self.disabled || (self.key == Some(key) && self.pipeline.is_some()) {
            return;
        }

        let Some(shader) = create_shader(
            ctx.device,
            "aether instanced mesh shader",
            include_str!("shaders/mesh.wgsl"),
        ) else {
            self.disabled = true;
            return;
        };

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("aether instanced pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_instanced"),
                compilation_options: Default::default(),
                buffers: &[mesh_vertex_layout(), InstanceRaw::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive_state(wgpu::PrimitiveTopology::TriangleList),
            depth_stencil: Some(depth_state(key.depth_format)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline = Some(pipeline);
        self.key = Some(key);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.cube.is_none() {
            self.cube = Some(InstancedMesh::new(
                ctx.device,
                "cube",
                ["aether cube vbo", "aether cube ibo"],
                &unit_cube(),
            ));
        }
        if self.sphere.is_none() {
            self.sphere = Some(InstancedMesh::new(
                ctx.device,
                "sphere",
                ["aether sphere vbo", "aether sphere ibo"],
                &unit_sphere(self.sphere_stacks, self.sphere_sectors),
            ));
        }
    }

    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, batch: &StrokeBatch) {
        if !self.is_ready() {
            return;
        }
        self.ensure_static_buffers(ctx);

        if let Some(cube) = self.cube.as_mut() {
            cube.upload(ctx, "aether cube instances", batch.instances(BaseMesh::Cube));
        }
        if let Some(sphere) = self.sphere.as_mut() {
            sphere.upload(ctx, "aether sphere instances", batch.instances(BaseMesh::Sphere));
        }
    }

    pub(super) fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        mesh: BaseMesh,
        instances: std::ops::Range<u32>,
    ) {
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let target = match mesh {
            BaseMesh::Cube => self.cube.as_ref(),
            BaseMesh::Sphere => self.sphere.as_ref(),
        };
        let Some(target) = target else { return };
        let Some(instance_vbo) = target.instances.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, target.vbo.buffer().slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.buffer().slice(..));
        rpass.set_index_buffer(target.ibo.buffer().slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..target.index_count, 0, instances);
    }
}
