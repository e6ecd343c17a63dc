use std::collections::HashSet;

use super::types::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

/// Current input state for the window.
///
/// Holds "is down" information and the current pointer position.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: super::Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Buttons released while unfocused are never reported.
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                position,
                modifiers,
            }) => {
                if position.is_some() {
                    self.pointer_pos = *position;
                }
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state: MouseButtonState::Pressed,
            position: Some((x, y)),
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn press_tracks_button_and_position() {
        let mut s = InputState::default();
        s.apply_event(&press(MouseButton::Left, 3.0, 4.0));
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));
    }

    #[test]
    fn focus_loss_clears_held_buttons() {
        let mut s = InputState::default();
        s.apply_event(&press(MouseButton::Right, 0.0, 0.0));
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.button_down(MouseButton::Right));
    }

    #[test]
    fn press_without_position_keeps_pointer_unknown() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            position: None,
            modifiers: Modifiers::default(),
        }));
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn pointer_left_forgets_position() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 1.0 }));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }
}
