//! State of input devices.

use std::collections::HashSet;

use super::payload::Scancode;

/// Keyboard state accumulated from key down and key up events.
#[derive(Debug, Default, Clone)]
pub struct Input {
    pressed: HashSet<Scancode>,
}

impl Input {
    /// Creates input state with no keys pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key is being held right now.
    pub fn is_pressed(&self, scancode: Scancode) -> bool {
        self.pressed.contains(&scancode)
    }

    /// Returns iterator over all keys being held right now.
    pub fn pressed(&self) -> impl Iterator<Item = Scancode> + '_ {
        self.pressed.iter().copied()
    }

    pub(crate) fn press(&mut self, scancode: Scancode) {
        self.pressed.insert(scancode);
    }

    pub(crate) fn release(&mut self, scancode: Scancode) {
        self.pressed.remove(&scancode);
    }
}
