//! Color types shared by the scene and the renderers.

mod color;

pub use color::{srgb_to_linear, Color};
