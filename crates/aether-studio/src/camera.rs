use glam::{Mat4, Vec3};

/// Pitch limit, keeps `front` away from the world-up singularity.
const MAX_PITCH_DEG: f32 = 89.0;

/// Static camera parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Degrees; -90 looks down -Z.
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Degrees per pixel of mouse motion.
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw_deg: -90.0,
            pitch_deg: 0.0,
            fov_y_deg: 45.0,
            near: 0.1,
            far: 100.0,
            move_speed: 2.5,
            look_sensitivity: 0.1,
        }
    }
}

/// Movement intent for one frame, each axis in -1..=1.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Movement {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

impl Movement {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.right == 0.0 && self.up == 0.0
    }
}

/// First-person fly camera.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    yaw_deg: f32,
    pitch_deg: f32,
    config: CameraConfig,
}

impl FlyCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            position: config.position,
            yaw_deg: config.yaw_deg,
            pitch_deg: config.pitch_deg.clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG),
            config,
        }
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw_deg.to_radians(), self.pitch_deg.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front(), Vec3::Y)
    }

    /// Perspective projection with wgpu's 0..1 depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(
            self.config.fov_y_deg.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        )
    }

    /// Moves along the camera axes; world up for the vertical axis.
    pub fn advance(&mut self, movement: Movement, dt: f32) {
        if movement.is_idle() {
            return;
        }
        let step = self.config.move_speed * dt;
        self.position += self.front() * movement.forward * step
            + self.right() * movement.right * step
            + Vec3::Y * movement.up * step;
    }

    /// Applies mouse-look from a pointer delta in pixels (+y is down).
    pub fn look(&mut self, dx: f32, dy: f32) {
        let s = self.config.look_sensitivity;
        self.yaw_deg = (self.yaw_deg + dx * s).rem_euclid(360.0);
        self.pitch_deg = (self.pitch_deg - dy * s).clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG);
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
