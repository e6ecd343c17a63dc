use crate::coords::Viewport;
use crate::input::{InputEvent, InputState};

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the event-loop thread, in event delivery order.
pub trait App {
    /// Called for each translated input event, after `state` has been updated.
    fn on_input(&mut self, event: &InputEvent, state: &InputState) -> AppControl {
        let _ = (event, state);
        AppControl::Continue
    }

    /// Called when the window's logical size changes.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called exactly once when the event loop shuts down.
    fn on_teardown(&mut self) {}
}
