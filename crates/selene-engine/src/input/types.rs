/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Pixels per wheel detent when a device reports high-precision deltas.
const PIXELS_PER_NOTCH: f32 = 100.0;

/// Mouse wheel delta, as reported by the platform.
///
/// Platform convention: positive `y` moves content down, i.e. the user
/// scrolled *up*.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Vertical scroll in page convention, in wheel detents.
    ///
    /// Positive when the user scrolls down (toward themselves), matching the
    /// sign of a DOM `deltaY`.
    pub fn page_notches_y(&self) -> f32 {
        match *self {
            MouseWheelDelta::Line { y, .. } => -y,
            MouseWheelDelta::Pixel { y, .. } => -y / PIXELS_PER_NOTCH,
        }
    }
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button event.
///
/// `position` is the last known pointer position in logical pixels, or `None`
/// when no cursor motion has been reported yet (window opened under a still
/// cursor, or the pointer left the window).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub position: Option<(f32, f32)>,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Runtime translates window system events into these.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_scroll_toward_user_is_positive() {
        let d = MouseWheelDelta::Line { x: 0.0, y: -1.0 };
        assert_eq!(d.page_notches_y(), 1.0);
    }

    #[test]
    fn pixel_scroll_is_normalized_to_notches() {
        let d = MouseWheelDelta::Pixel { x: 0.0, y: 50.0 };
        assert!((d.page_notches_y() + 0.5).abs() < 1e-6);
    }

    #[test]
    fn modifiers_any() {
        assert!(!Modifiers::default().any());
        assert!(Modifiers { alt: true, ..Modifiers::default() }.any());
    }
}
