//! Interactive Moon viewer.
//!
//! A lit sphere with scattered craters, spun slowly each frame, rotated by
//! pointer drag and orbited by a damped camera controller.

pub mod app;
pub mod config;
pub mod context;
pub mod moon;

pub use app::MoonApp;
pub use config::ViewerConfig;
pub use context::{DragState, SceneContext};
