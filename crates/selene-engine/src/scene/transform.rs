use glam::{EulerRot, Mat4, Quat, Vec3};

/// Euler orientation in radians, applied in intrinsic X → Y → Z order.
///
/// `x` is pitch, `y` is yaw, `z` is roll.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }
}

/// Local transform of a scene node relative to its parent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Euler::new(0.0, 0.0, 0.0),
        scale: Vec3::ONE,
    };

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }

    /// Local-to-parent matrix (`T * R * S`).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation.to_quat(), self.position)
    }
}
