use aether_engine::logging::LoggingConfig;
use aether_engine::render::RendererConfig;
use aether_engine::window::RuntimeConfig;
use aether_paint::GeometrySettings;
use glam::Vec4;
use winit::dpi::LogicalSize;

use crate::camera::CameraConfig;

/// Everything the studio needs to start.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub logging: LoggingConfig,
    pub window: RuntimeConfig,
    pub camera: CameraConfig,
    pub renderer: RendererConfig,
    pub geometry: GeometrySettings,

    /// Distance from the camera to the painting plane.
    pub pick_distance: f32,
    /// Picked points closer than this to the previous one are dropped.
    pub min_point_spacing: f32,

    pub clear_color: wgpu::Color,
    /// Brush colors cycled with `C`. The first entry is the starting color.
    pub palette: Vec<Vec4>,

    pub size_step: f32,
    pub scale_step: f32,
    pub translate_step: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            window: RuntimeConfig {
                title: "aether".to_string(),
                initial_size: LogicalSize::new(1280.0, 720.0),
            },
            camera: CameraConfig::default(),
            renderer: RendererConfig::default(),
            geometry: GeometrySettings::default(),
            pick_distance: 2.0,
            min_point_spacing: 0.005,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            palette: vec![
                Vec4::new(1.0, 1.0, 1.0, 1.0),
                Vec4::new(0.9, 0.2, 0.2, 1.0),
                Vec4::new(0.2, 0.8, 0.3, 1.0),
                Vec4::new(0.2, 0.4, 0.9, 1.0),
                Vec4::new(0.95, 0.8, 0.2, 1.0),
                Vec4::new(0.7, 0.3, 0.85, 1.0),
            ],
            size_step: 1.0,
            scale_step: 1.1,
            translate_step: 0.1,
        }
    }
}
