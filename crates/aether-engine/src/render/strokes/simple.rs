use crate::render::RenderCtx;

use super::batch::StrokeBatch;
use super::buffer::GpuBuffer;
use super::common::{alpha_blend, create_shader, depth_state, primitive_state, SimpleVertex};
use super::PipelineKey;

/// Freehand and Points family: position-only vertices, unlit.
///
/// Lines and points are 1 px wide; wgpu exposes no portable line width or point size.
#[derive(Default)]
pub(super) struct SimpleFamily {
    key: Option<PipelineKey>,
    line_pipeline: Option<wgpu::RenderPipeline>,
    point_pipeline: Option<wgpu::RenderPipeline>,
    vbo: Option<GpuBuffer>,
    disabled: bool,
}

impl SimpleFamily {
    pub(super) fn is_ready(&self) -> bool {
        !self.disabled && self.line_pipeline.is_some() && self.point_pipeline.is_some()
    }

    pub(super) fn ensure_pipeline(
        &mut self,
        ctx: &RenderCtx<'_>,
        key: PipelineKey,
        layout: &wgpu::PipelineLayout,
    ) {
        if self.disabled || (self.key == Some(key) && self.line_pipeline.is_some()) {
            return;
        }

        let Some(shader) = create_shader(
            ctx.device,
            "aether simple shader",
            include_str!("shaders/simple.wgsl"),
        ) else {
            self.disabled = true;
            return;
        };

        let build = |label: &'static str, topology: wgpu::PrimitiveTopology| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[SimpleVertex::layout()],
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
                primitive: primitive_state(topology),
                depth_stencil: Some(depth_state(key.depth_format)),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        self.line_pipeline = Some(build("aether line pipeline", wgpu::PrimitiveTopology::LineStrip));
        self.point_pipeline = Some(build("aether point pipeline", wgpu::PrimitiveTopology::PointList));
        self.key = Some(key);
    }

    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, batch: &StrokeBatch) {
        if batch.simple.is_empty() || !self.is_ready() {
            return;
        }
        let bytes: &[u8] = bytemuck::cast_slice(&batch.simple);
        let vbo = self.vbo.get_or_insert_with(|| {
            GpuBuffer::new(ctx.device, "aether simple vbo", wgpu::BufferUsages::VERTEX, 0)
        });
        vbo.upload(ctx.device, ctx.queue, bytes);
    }

    /// Draws one line strip (`points == false`) or point list from the uploaded range.
    pub(super) fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        vertices: std::ops::Range<u32>,
        points: bool,
    ) {
        let pipeline = if points {
            self.point_pipeline.as_ref()
        } else {
            self.line_pipeline.as_ref()
        };
        let Some(pipeline) = pipeline else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.buffer().slice(..));
        rpass.draw(vertices, 0..1);
    }
}
