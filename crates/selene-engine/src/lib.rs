//! Selene engine crate.
//!
//! Platform + GPU runtime and a small 3D scene layer: scene graph, perspective
//! camera, orbit controls and a lit mesh renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
