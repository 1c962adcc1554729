//! Names of events emitted by the engine itself.
//!
//! Game code may listen for these events but can not emit them.

pub const QUIT: &str = "quit";
pub const KEY_DOWN: &str = "key_down";
pub const KEY_UP: &str = "key_up";
pub const MOUSE_BUTTON_DOWN: &str = "mouse_button_down";
pub const MOUSE_BUTTON_UP: &str = "mouse_button_up";
pub const MOUSE_MOTION: &str = "mouse_motion";
pub const MOUSE_WHEEL: &str = "mouse_wheel";
pub const SCENE_LOADED: &str = "scene_loaded";
pub const SCENE_CHANGED: &str = "scene_changed";

/// All reserved event names.
pub const RESERVED: [&str; 9] = [
    QUIT,
    KEY_DOWN,
    KEY_UP,
    MOUSE_BUTTON_DOWN,
    MOUSE_BUTTON_UP,
    MOUSE_MOTION,
    MOUSE_WHEEL,
    SCENE_LOADED,
    SCENE_CHANGED,
];

/// Returns `true` if the event name can be emitted by the engine only.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}
