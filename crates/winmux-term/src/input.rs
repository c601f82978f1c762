#![forbid(unsafe_code)]

//! crossterm event translation.

use crossterm::event::{
    Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode, MouseButton,
    MouseEvent, MouseEventKind,
};
use winmux_backend::{NativeAction, NativeButton, NativeEvent, NativeKey};

use crate::cell_grid_to_pixels;

/// Translate one crossterm event into zero or more native events.
///
/// Cell coordinates become pixel coordinates: a cell at `(col, row)` is
/// reported at its upper pixel `(col, row * 2)`.
pub fn map_event(event: CtEvent) -> Vec<NativeEvent> {
    match event {
        CtEvent::Key(key) => map_key_event(key),
        CtEvent::Mouse(mouse) => map_mouse_event(mouse),
        CtEvent::Resize(cols, rows) => {
            let (width, height) = cell_grid_to_pixels(cols, rows);
            vec![NativeEvent::FramebufferResized { width, height }]
        }
        _ => Vec::new(),
    }
}

fn map_key_event(event: KeyEvent) -> Vec<NativeEvent> {
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return if event.kind == KeyEventKind::Press {
            vec![NativeEvent::CloseRequested]
        } else {
            Vec::new()
        };
    }

    let action = map_key_kind(event.kind);
    let mut out = Vec::with_capacity(2);
    if let Some(key) = map_key_code(event.code) {
        out.push(NativeEvent::Key { key, action });
    }
    // Text input follows the key press, the way windowing systems order it.
    if let KeyCode::Char(c) = event.code
        && action != NativeAction::Release
        && !event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        out.push(NativeEvent::Char(c));
    }
    out
}

fn map_key_kind(kind: KeyEventKind) -> NativeAction {
    match kind {
        KeyEventKind::Press => NativeAction::Press,
        KeyEventKind::Repeat => NativeAction::Repeat,
        KeyEventKind::Release => NativeAction::Release,
    }
}

fn map_key_code(code: KeyCode) -> Option<NativeKey> {
    Some(match code {
        KeyCode::Left => NativeKey::Left,
        KeyCode::Right => NativeKey::Right,
        KeyCode::Up => NativeKey::Up,
        KeyCode::Down => NativeKey::Down,
        KeyCode::Esc => NativeKey::Escape,
        KeyCode::Char(' ') => NativeKey::Space,
        KeyCode::Backspace => NativeKey::Backspace,
        KeyCode::Delete => NativeKey::Delete,
        KeyCode::Enter => NativeKey::Enter,
        KeyCode::Tab | KeyCode::BackTab => NativeKey::Tab,
        KeyCode::Home => NativeKey::Home,
        KeyCode::End => NativeKey::End,
        KeyCode::PageUp => NativeKey::PageUp,
        KeyCode::PageDown => NativeKey::PageDown,
        KeyCode::Insert => NativeKey::Insert,
        KeyCode::F(n) => NativeKey::F(n),
        KeyCode::Char(c) => NativeKey::Char(c.to_ascii_lowercase()),
        KeyCode::Modifier(modifier) => map_modifier_key(modifier)?,
        _ => return None,
    })
}

fn map_modifier_key(code: ModifierKeyCode) -> Option<NativeKey> {
    match code {
        ModifierKeyCode::LeftShift => Some(NativeKey::LeftShift),
        ModifierKeyCode::RightShift => Some(NativeKey::RightShift),
        ModifierKeyCode::LeftControl => Some(NativeKey::LeftControl),
        ModifierKeyCode::RightControl => Some(NativeKey::RightControl),
        ModifierKeyCode::LeftAlt => Some(NativeKey::LeftAlt),
        ModifierKeyCode::RightAlt => Some(NativeKey::RightAlt),
        _ => None,
    }
}

fn map_mouse_event(event: MouseEvent) -> Vec<NativeEvent> {
    let (x, y) = cell_grid_to_pixels(event.column, event.row);
    let cursor = NativeEvent::CursorMoved {
        x: f64::from(x),
        y: f64::from(y),
    };
    match event.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => vec![cursor],
        MouseEventKind::Down(button) => vec![
            cursor,
            NativeEvent::MouseButton {
                button: map_mouse_button(button),
                action: NativeAction::Press,
            },
        ],
        MouseEventKind::Up(button) => vec![
            cursor,
            NativeEvent::MouseButton {
                button: map_mouse_button(button),
                action: NativeAction::Release,
            },
        ],
        MouseEventKind::ScrollUp => vec![NativeEvent::Scroll { dx: 0.0, dy: 1.0 }],
        MouseEventKind::ScrollDown => vec![NativeEvent::Scroll { dx: 0.0, dy: -1.0 }],
        MouseEventKind::ScrollLeft => vec![NativeEvent::Scroll { dx: -1.0, dy: 0.0 }],
        MouseEventKind::ScrollRight => vec![NativeEvent::Scroll { dx: 1.0, dy: 0.0 }],
    }
}

fn map_mouse_button(button: MouseButton) -> NativeButton {
    match button {
        MouseButton::Left => NativeButton::Left,
        MouseButton::Right => NativeButton::Right,
        MouseButton::Middle => NativeButton::Middle,
    }
}
