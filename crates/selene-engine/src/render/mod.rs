//! GPU rendering subsystem.
//!
//! Renderers consume the scene's draw stream and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers) and creates them
//! lazily on first use.
//!
//! Convention:
//! - world space is right-handed, Y up
//! - the frame's clear pass has already run; renderers load color and depth

mod ctx;
pub mod geometry;
pub mod mesh;

pub use ctx::{RenderCtx, RenderTarget};
