use glam::Vec4;

/// Fraction of the base color used for the ambient channel.
pub const AMBIENT_FACTOR: f32 = 0.2;

/// Default specular highlight color.
pub const DEFAULT_SPECULAR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);

/// Default Phong exponent.
pub const DEFAULT_SHININESS: f32 = 32.0;

/// Surface response of a stroke under the renderer's point light.
///
/// Colors are straight (non-premultiplied) linear RGBA. The alpha of `diffuse`
/// is the stroke opacity; the other alphas are carried for layout symmetry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

impl Material {
    /// Builds a material whose ambient and diffuse channels follow `color`.
    pub fn from_color(color: Vec4) -> Self {
        Self {
            ambient: ambient_of(color),
            diffuse: color,
            specular: DEFAULT_SPECULAR,
            shininess: DEFAULT_SHININESS,
        }
    }

    /// Returns a copy with ambient/diffuse replaced by `color`.
    ///
    /// Specular and shininess are kept.
    pub fn with_color(self, color: Vec4) -> Self {
        Self {
            ambient: ambient_of(color),
            diffuse: color,
            ..self
        }
    }

    /// Base color of the material (the diffuse channel).
    #[inline]
    pub fn color(&self) -> Vec4 {
        self.diffuse
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from_color(Vec4::ONE)
    }
}

fn ambient_of(color: Vec4) -> Vec4 {
    (color.truncate() * AMBIENT_FACTOR).extend(color.w)
}
