//! Sphere mesh generation.
//!
//! Generates an indexed UV sphere of unit radius. Rows run from the north pole
//! (+Y) to the south pole; columns sweep the azimuth. Renderers scale the unit
//! mesh by each mesh's radius.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU-side indexed mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Generates a unit UV sphere.
///
/// `width_segments` is clamped to at least 3 and `height_segments` to at
/// least 2. Pole rows emit a single triangle per column, so the index count is
/// `6 * width * (height - 1)`. Triangles wind counter-clockwise seen from
/// outside.
pub fn unit_sphere(width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let theta = PI * iy as f32 / hs as f32;
        for ix in 0..=ws {
            let phi = TAU * ix as f32 / ws as f32;
            let p = [-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()];
            vertices.push(MeshVertex { position: p, normal: p });
        }
    }

    let row = ws + 1;
    let mut indices = Vec::with_capacity((6 * ws * (hs - 1)) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}
