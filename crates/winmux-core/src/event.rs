#![forbid(unsafe_code)]

//! Canonical event types.
//!
//! Every event delivered through an environment's event stream is one of the
//! variants of [`Event`]. Events are small `Copy` values: once constructed
//! they are never mutated, so a multiplexer can hand the same value to any
//! number of consumers.
//!
//! Each event has a stable name (see [`names`]) for consumers that prefer
//! dispatching on strings, e.g. when bridging to a scripting layer.

use crate::geometry::{Point, Rect};

/// Stable event names.
pub mod names {
    pub const RESIZE: &str = "resize";
    pub const CLOSE: &str = "close";
    pub const MOUSE_MOVE: &str = "mouse/move";
    pub const MOUSE_SCROLL: &str = "mouse/scroll";
    pub const MOUSE_LEFT_DOWN: &str = "mouse/left/down";
    pub const MOUSE_LEFT_UP: &str = "mouse/left/up";
    pub const MOUSE_MIDDLE_DOWN: &str = "mouse/middle/down";
    pub const MOUSE_MIDDLE_UP: &str = "mouse/middle/up";
    pub const MOUSE_RIGHT_DOWN: &str = "mouse/right/down";
    pub const MOUSE_RIGHT_UP: &str = "mouse/right/up";
    pub const KEYBOARD_CHAR: &str = "keyboard/char";
    pub const KEYBOARD_DOWN: &str = "keyboard/down";
    pub const KEYBOARD_UP: &str = "keyboard/up";
    pub const KEYBOARD_REPEAT: &str = "keyboard/repeat";

    /// All event names, in declaration order.
    pub const ALL: [&str; 14] = [
        RESIZE,
        CLOSE,
        MOUSE_MOVE,
        MOUSE_SCROLL,
        MOUSE_LEFT_DOWN,
        MOUSE_LEFT_UP,
        MOUSE_MIDDLE_DOWN,
        MOUSE_MIDDLE_UP,
        MOUSE_RIGHT_DOWN,
        MOUSE_RIGHT_UP,
        KEYBOARD_CHAR,
        KEYBOARD_DOWN,
        KEYBOARD_UP,
        KEYBOARD_REPEAT,
    ];
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,

    /// Middle mouse button (scroll wheel click).
    Middle,

    /// Right mouse button.
    Right,
}

/// Canonical event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The drawable surface now covers this rectangle (in framebuffer pixels).
    Resize(Rect),

    /// The user asked for the surface to close.
    Close,

    /// The pointer moved.
    MouseMove(Point),

    /// The scroll wheel moved by this offset.
    MouseScroll(Point),

    /// A mouse button was pressed at the pointer position.
    MouseDown(MouseButton, Point),

    /// A mouse button was released at the pointer position.
    MouseUp(MouseButton, Point),

    /// Text input produced a character.
    KeyboardChar(char),

    /// A named key was pressed.
    KeyboardDown(&'static str),

    /// A named key was released.
    KeyboardUp(&'static str),

    /// A named key is being held down.
    KeyboardRepeat(&'static str),
}

impl Event {
    /// The stable name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Resize(_) => names::RESIZE,
            Self::Close => names::CLOSE,
            Self::MouseMove(_) => names::MOUSE_MOVE,
            Self::MouseScroll(_) => names::MOUSE_SCROLL,
            Self::MouseDown(MouseButton::Left, _) => names::MOUSE_LEFT_DOWN,
            Self::MouseUp(MouseButton::Left, _) => names::MOUSE_LEFT_UP,
            Self::MouseDown(MouseButton::Middle, _) => names::MOUSE_MIDDLE_DOWN,
            Self::MouseUp(MouseButton::Middle, _) => names::MOUSE_MIDDLE_UP,
            Self::MouseDown(MouseButton::Right, _) => names::MOUSE_RIGHT_DOWN,
            Self::MouseUp(MouseButton::Right, _) => names::MOUSE_RIGHT_UP,
            Self::KeyboardChar(_) => names::KEYBOARD_CHAR,
            Self::KeyboardDown(_) => names::KEYBOARD_DOWN,
            Self::KeyboardUp(_) => names::KEYBOARD_UP,
            Self::KeyboardRepeat(_) => names::KEYBOARD_REPEAT,
        }
    }

    /// True for [`Event::Resize`].
    #[must_use]
    pub const fn is_resize(&self) -> bool {
        matches!(self, Self::Resize(_))
    }

    /// The pointer position carried by mouse events.
    #[must_use]
    pub const fn point(&self) -> Option<Point> {
        match *self {
            Self::MouseMove(p)
            | Self::MouseScroll(p)
            | Self::MouseDown(_, p)
            | Self::MouseUp(_, p) => Some(p),
            _ => None,
        }
    }

    /// The key name carried by keyboard down/up/repeat events.
    #[must_use]
    pub const fn key(&self) -> Option<&'static str> {
        match *self {
            Self::KeyboardDown(k) | Self::KeyboardUp(k) | Self::KeyboardRepeat(k) => Some(k),
            _ => None,
        }
    }
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = self.name();
        match *self {
            Self::Resize(r) => write!(
                f,
                "{name} ({},{})-({},{})",
                r.left(),
                r.top(),
                r.right(),
                r.bottom()
            ),
            Self::Close => f.write_str(name),
            Self::MouseMove(p) | Self::MouseScroll(p) | Self::MouseDown(_, p) | Self::MouseUp(_, p) => {
                write!(f, "{name} ({},{})", p.x, p.y)
            }
            Self::KeyboardChar(c) => write!(f, "{name} {c:?}"),
            Self::KeyboardDown(k) | Self::KeyboardUp(k) | Self::KeyboardRepeat(k) => {
                write!(f, "{name} {k}")
            }
        }
    }
}
