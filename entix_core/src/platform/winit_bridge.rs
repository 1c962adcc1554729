//! Translation of [`winit`] window events into platform events.

use std::collections::HashSet;

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

use crate::event::payload::{
    KeyboardEvent, MouseButton, MouseButtonEvent, MouseMotionEvent, MouseWheelEvent, Scancode,
};

use super::PlatformEvent;

/// Stateful translator of [`WindowEvent`]s.
///
/// Keeps track of the cursor position to produce motion deltas
/// and of pressed keys to flag repeated key presses.
///
#[derive(Debug, Default)]
pub struct WinitTranslator {
    cursor: Option<(f64, f64)>,
    pressed: HashSet<u32>,
}

impl WinitTranslator {
    /// Creates new translator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates window event, returns `None` for events unknown to the engine.
    pub fn translate(&mut self, event: &WindowEvent<'_>) -> Option<PlatformEvent> {
        let event = match event {
            WindowEvent::CloseRequested => PlatformEvent::Quit,
            WindowEvent::KeyboardInput { input, .. } => {
                let scancode = input.scancode;
                match input.state {
                    ElementState::Pressed => {
                        let repeat = !self.pressed.insert(scancode);
                        PlatformEvent::KeyDown(KeyboardEvent {
                            scancode: Scancode(scancode),
                            repeat,
                        })
                    }
                    ElementState::Released => {
                        self.pressed.remove(&scancode);
                        PlatformEvent::KeyUp(KeyboardEvent {
                            scancode: Scancode(scancode),
                            repeat: false,
                        })
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.cursor.unwrap_or_default();
                let payload = MouseButtonEvent {
                    button: mouse_button(*button),
                    x,
                    y,
                };
                match state {
                    ElementState::Pressed => PlatformEvent::MouseButtonDown(payload),
                    ElementState::Released => PlatformEvent::MouseButtonUp(payload),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x, position.y);
                let (prev_x, prev_y) = self.cursor.replace((x, y)).unwrap_or((x, y));
                PlatformEvent::MouseMotion(MouseMotionEvent {
                    x,
                    y,
                    dx: x - prev_x,
                    dy: y - prev_y,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => PlatformEvent::MouseWheel(wheel(*delta)),
            _ => return None,
        };
        log::trace!("window event translated into {:?}", event);
        Some(event)
    }
}

fn mouse_button(button: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as Button;

    match button {
        Button::Left => MouseButton::Left,
        Button::Middle => MouseButton::Middle,
        Button::Right => MouseButton::Right,
        Button::Other(other) => MouseButton::Other(other),
    }
}

fn wheel(delta: MouseScrollDelta) -> MouseWheelEvent {
    match delta {
        MouseScrollDelta::LineDelta(dx, dy) => MouseWheelEvent { dx, dy },
        MouseScrollDelta::PixelDelta(position) => MouseWheelEvent {
            dx: position.x as f32,
            dy: position.y as f32,
        },
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn test_close_requested() {
        let mut translator = WinitTranslator::new();
        let event = translator.translate(&WindowEvent::CloseRequested);
        assert_eq!(event, Some(PlatformEvent::Quit));
        assert_eq!(translator.translate(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn test_mouse_button() {
        use winit::event::MouseButton as Button;

        assert_eq!(mouse_button(Button::Left), MouseButton::Left);
        assert_eq!(mouse_button(Button::Other(7)), MouseButton::Other(7));
    }

    #[test]
    fn test_wheel() {
        let lines = wheel(MouseScrollDelta::LineDelta(0.0, -2.0));
        assert_eq!(lines, MouseWheelEvent { dx: 0.0, dy: -2.0 });

        let pixels = wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(3.0, 4.0)));
        assert_eq!(pixels, MouseWheelEvent { dx: 3.0, dy: 4.0 });
    }
}
