use crate::render::RenderCtx;

use super::batch::StrokeBatch;
use super::buffer::GpuBuffer;
use super::common::{alpha_blend, create_shader, depth_state, mesh_vertex_layout, primitive_state};
use super::PipelineKey;

/// Tube family: world-space indexed meshes, re-uploaded every frame.
#[derive(Default)]
pub(super) struct TubeFamily {
    key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    vbo: Option<GpuBuffer>,
    ibo: Option<GpuBuffer>,
    disabled: bool,
}

impl TubeFamily {
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
            "aether tube shader",
            include_str!("shaders/mesh.wgsl"),
        ) else {
            self.disabled = true;
            return;
        };

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("aether tube pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_world"),
                compilation_options: Default::default(),
                buffers: &[mesh_vertex_layout()],
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

    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, batch: &StrokeBatch) {
        if batch.tube_indices.is_empty() || !self.is_ready() {
            return;
        }

        let vbo = self.vbo.get_or_insert_with(|| {
            GpuBuffer::new(ctx.device, "aether tube vbo", wgpu::BufferUsages::VERTEX, 0)
        });
        vbo.upload(ctx.device, ctx.queue, bytemuck::cast_slice(&batch.tube_vertices));

        let ibo = self.ibo.get_or_insert_with(|| {
            GpuBuffer::new(ctx.device, "aether tube ibo", wgpu::BufferUsages::INDEX, 0)
        });
        ibo.upload(ctx.device, ctx.queue, bytemuck::cast_slice(&batch.tube_indices));
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, indices: std::ops::Range<u32>) {
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.buffer().slice(..));
        rpass.set_index_buffer(ibo.buffer().slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(indices, 0, 0..1);
    }
}
