#![forbid(unsafe_code)]

//! Static key and mouse-button name tables.

use winmux_backend::{NativeButton, NativeKey};
use winmux_core::event::MouseButton;

/// Native keys that produce keyboard down/up/repeat events, with their names.
///
/// Left and right modifier keys share one name. Keys not listed here produce
/// no keyboard down/up/repeat event.
pub static KEY_NAMES: [(NativeKey, &str); 20] = [
    (NativeKey::Left, "left"),
    (NativeKey::Right, "right"),
    (NativeKey::Up, "up"),
    (NativeKey::Down, "down"),
    (NativeKey::Escape, "escape"),
    (NativeKey::Space, "space"),
    (NativeKey::Backspace, "backspace"),
    (NativeKey::Delete, "delete"),
    (NativeKey::Enter, "enter"),
    (NativeKey::Tab, "tab"),
    (NativeKey::Home, "home"),
    (NativeKey::End, "end"),
    (NativeKey::PageUp, "pageup"),
    (NativeKey::PageDown, "pagedown"),
    (NativeKey::LeftShift, "shift"),
    (NativeKey::RightShift, "shift"),
    (NativeKey::LeftControl, "ctrl"),
    (NativeKey::RightControl, "ctrl"),
    (NativeKey::LeftAlt, "alt"),
    (NativeKey::RightAlt, "alt"),
];

/// The event name of a native key, if it has one.
pub fn key_name(key: NativeKey) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|&(_, name)| name)
}

/// The event button of a native mouse button, if it has one.
pub const fn mouse_button(button: NativeButton) -> Option<MouseButton> {
    match button {
        NativeButton::Left => Some(MouseButton::Left),
        NativeButton::Middle => Some(MouseButton::Middle),
        NativeButton::Right => Some(MouseButton::Right),
        NativeButton::Other(_) => None,
    }
}
