//! GPU rendering subsystem.
//!
//! Renderers consume draw lists and record wgpu passes against a
//! [`RenderTarget`]. Each renderer owns its GPU resources.
//!
//! Convention: world space is right-handed, +Y up; projection maps depth to 0..1.

mod ctx;
pub mod strokes;

pub use ctx::{RenderCtx, RenderTarget};
pub use strokes::{CameraParams, Lighting, RendererConfig, StrokeRenderer};
