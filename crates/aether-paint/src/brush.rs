use glam::Vec4;

use crate::material::Material;
use crate::style::Style;

pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 10.0;
pub const DEFAULT_BRUSH_SIZE: f32 = 2.0;

/// Live brush settings.
///
/// This is a small value type: opening a stroke copies it, so later edits made
/// by the control surface never reach strokes that already exist.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Brush {
    pub material: Material,
    /// Width/scale scalar, in `[MIN_BRUSH_SIZE, MAX_BRUSH_SIZE]` when set through [`Brush::set_size`].
    pub size: f32,
    pub style: Style,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            material: Material::default(),
            size: DEFAULT_BRUSH_SIZE,
            style: Style::default(),
        }
    }
}

impl Brush {
    /// Recolors the brush, keeping specular and shininess.
    pub fn set_color(&mut self, color: Vec4) {
        self.material = self.material.with_color(color);
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Sets the size, clamped to the supported range. Non-finite values are ignored.
    pub fn set_size(&mut self, size: f32) {
        if !size.is_finite() {
            log::warn!("ignoring non-finite brush size {size}");
            return;
        }
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}
