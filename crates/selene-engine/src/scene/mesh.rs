use super::Material;

/// UV sphere description. Geometry is generated by the renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    #[inline]
    pub const fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments,
            height_segments,
        }
    }
}

/// Drawable node payload.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: SphereGeometry,
    pub material: Material,
}
