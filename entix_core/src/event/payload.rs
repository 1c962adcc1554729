//! Payload components attached to input events.

/// Hardware dependent code of the physical key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scancode(pub u32);

/// Payload of key down and key up events.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub scancode: Scancode,
    /// `true` if the key was already pressed when the event was produced.
    pub repeat: bool,
}

/// Button of the mouse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

/// Payload of mouse button down and mouse button up events.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    /// Cursor position in window coordinates.
    pub x: f64,
    pub y: f64,
}

/// Payload of mouse motion event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseMotionEvent {
    /// Cursor position in window coordinates.
    pub x: f64,
    pub y: f64,
    /// Motion relative to the previous cursor position.
    pub dx: f64,
    pub dy: f64,
}

/// Payload of mouse wheel event.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseWheelEvent {
    /// Horizontal scroll, positive to the right.
    pub dx: f32,
    /// Vertical scroll, positive away from the user.
    pub dy: f32,
}
