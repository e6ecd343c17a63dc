use ::winit::dpi::PhysicalPosition;
use ::winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use ::winit::keyboard::ModifiersState;
use ::winit::window::Window;

use crate::input::{
    InputEvent, InputState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent, PointerMoveEvent,
};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => {
            let ms: ModifiersState = m.state();
            Some(InputEvent::ModifiersChanged(map_modifiers(ms)))
        }

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window.scale_factor(), *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let st = match st {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            };

            // winit 0.30 does not report a position with button events.
            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: st,
                position: state.pointer_pos,
                modifiers: state.modifiers,
            }))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(window.scale_factor(), *p);
                    MouseWheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::MouseWheel {
                delta,
                modifiers: state.modifiers,
            })
        }

        _ => None,
    }
}

fn to_logical_f32(scale: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_position_divided_by_scale() {
        let (x, y) = to_logical_f32(2.0, PhysicalPosition::new(300.0, 120.0));
        assert_eq!((x, y), (150.0, 60.0));
    }

    #[test]
    fn mouse_buttons_map_one_to_one() {
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(map_mouse_button(WinitMouseButton::Other(9)), MouseButton::Other(9));
    }

    #[test]
    fn modifiers_map_super_to_meta() {
        let m = map_modifiers(ModifiersState::SUPER);
        assert!(m.meta && !m.shift && !m.ctrl && !m.alt);
    }
}
