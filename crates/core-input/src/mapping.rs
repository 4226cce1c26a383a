use core_events::{
    InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers, MouseButton as CMouseButton, MouseEvent as CMouseEvent,
    MouseEventKind as CMouseEventKind,
};

/// Normalize one crossterm event. Returns `None` for events the editor has no
/// use for (key releases, focus changes, unsupported keys).
pub(crate) fn map_event(event: CEvent) -> Option<InputEvent> {
    match event {
        CEvent::Key(key) => map_key_event(&key).map(InputEvent::Key),
        CEvent::Mouse(mouse) => map_mouse_event(&mouse).map(InputEvent::Mouse),
        CEvent::Resize(w, h) => Some(InputEvent::Resize(w, h)),
        CEvent::Paste(data) => Some(InputEvent::Paste(data)),
        CEvent::FocusGained | CEvent::FocusLost => None,
    }
}

pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let mut mods = map_mods(event.modifiers);
    let code = match event.code {
        CKeyCode::Char(c) => {
            if mods.contains(KeyModifiers::CTRL) {
                KeyCode::Char(c.to_ascii_lowercase())
            } else {
                KeyCode::Char(c)
            }
        }
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => {
            mods |= KeyModifiers::SHIFT;
            KeyCode::Tab
        }
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Delete => KeyCode::Delete,
        _ => return None,
    };
    Some(KeyEvent { code, mods })
}

pub(crate) fn map_mouse_event(event: &CMouseEvent) -> Option<MouseEvent> {
    let kind = match event.kind {
        CMouseEventKind::Down(b) => MouseEventKind::Down(map_button(b)),
        CMouseEventKind::Up(b) => MouseEventKind::Up(map_button(b)),
        CMouseEventKind::Drag(b) => MouseEventKind::Drag(map_button(b)),
        CMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        CMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        CMouseEventKind::Moved => MouseEventKind::Moved,
        CMouseEventKind::ScrollLeft | CMouseEventKind::ScrollRight => return None,
    };
    Some(MouseEvent {
        kind,
        column: event.column,
        row: event.row,
        mods: map_mods(event.modifiers),
    })
}

fn map_button(b: CMouseButton) -> MouseButton {
    match b {
        CMouseButton::Left => MouseButton::Left,
        CMouseButton::Middle => MouseButton::Middle,
        CMouseButton::Right => MouseButton::Right,
    }
}

pub(crate) fn map_mods(m: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
