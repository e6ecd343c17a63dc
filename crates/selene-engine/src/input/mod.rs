//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s.

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
};
