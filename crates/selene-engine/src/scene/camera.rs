use glam::{Mat4, Vec3};

/// Right-handed perspective camera, Y up, looking at `target`.
///
/// Projection maps depth to wgpu's `[0, 1]` clip range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Updates the aspect ratio. Non-finite or non-positive values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Camera-space right and up axes in world space.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(self.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }
}
