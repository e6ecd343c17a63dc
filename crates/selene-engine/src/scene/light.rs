use glam::Vec3;

use crate::paint::Color;

/// Uniform fill light applied to every lit surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Parallel light shining from `position` toward `target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface toward the light.
    ///
    /// Falls back to +Y when position and target coincide.
    pub fn direction_to_light(&self) -> Vec3 {
        (self.position - self.target).try_normalize().unwrap_or(Vec3::Y)
    }
}
