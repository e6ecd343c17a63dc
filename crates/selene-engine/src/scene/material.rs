use crate::paint::Color;

/// Blinn-Phong lit surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhongMaterial {
    pub color: Color,
    pub emissive: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
        }
    }
}

/// Unlit flat color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Material {
    Phong(PhongMaterial),
    Basic(BasicMaterial),
}

impl From<PhongMaterial> for Material {
    fn from(m: PhongMaterial) -> Self {
        Material::Phong(m)
    }
}

impl From<BasicMaterial> for Material {
    fn from(m: BasicMaterial) -> Self {
        Material::Basic(m)
    }
}
