//! Key -> [`EditAction`] translation for the editing surface.
//!
//! Stateless: the same key always maps to the same action. Keys owned by
//! the application's global table (Ctrl+Q, Ctrl+S, ...) never get here, and
//! chorded keys are left to the surface's own binding table
//! ([`default_bindings`]), which is consulted first.

use crate::{EditAction, EditKind, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_keymap::Keymap;

/// Bindings local to the editing surface.
pub fn default_bindings() -> Keymap<EditAction> {
    let mut map = Keymap::new();
    map.bind(KeyEvent::ctrl('u'), EditAction::Edit(EditKind::DeleteToLineStart));
    map.bind(KeyEvent::ctrl('k'), EditAction::Edit(EditKind::DeleteToLineEnd));
    map
}

/// Default handling for keys the local table does not bind.
pub fn translate_key(key: &KeyEvent) -> Option<EditAction> {
    if let Some(c) = key.printable() {
        return Some(EditAction::Edit(EditKind::InsertChar(c)));
    }
    if key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
        return None;
    }
    let action = match key.code {
        KeyCode::Up => EditAction::Motion(MotionKind::Up),
        KeyCode::Down => EditAction::Motion(MotionKind::Down),
        KeyCode::Left => EditAction::Motion(MotionKind::Left),
        KeyCode::Right => EditAction::Motion(MotionKind::Right),
        KeyCode::Home => EditAction::Motion(MotionKind::LineStart),
        KeyCode::End => EditAction::Motion(MotionKind::LineEnd),
        KeyCode::PageUp => EditAction::Motion(MotionKind::PageUp),
        KeyCode::PageDown => EditAction::Motion(MotionKind::PageDown),
        KeyCode::Backspace => EditAction::Edit(EditKind::Backspace),
        KeyCode::Tab => EditAction::Tab,
        KeyCode::Enter => EditAction::Enter,
        KeyCode::Esc => EditAction::Escape,
        KeyCode::Char(_) | KeyCode::Delete => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn printable_chars_insert() {
        assert_eq!(
            translate_key(&plain(KeyCode::Char('x'))),
            Some(EditAction::Edit(EditKind::InsertChar('x')))
        );
        let shifted = KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT);
        assert_eq!(
            translate_key(&shifted),
            Some(EditAction::Edit(EditKind::InsertChar('X')))
        );
    }

    #[test]
    fn line_kills_are_local_bindings() {
        let map = default_bindings();
        assert_eq!(
            map.get(&KeyEvent::ctrl('u')),
            Some(&EditAction::Edit(EditKind::DeleteToLineStart))
        );
        assert_eq!(
            map.get(&KeyEvent::ctrl('k')),
            Some(&EditAction::Edit(EditKind::DeleteToLineEnd))
        );
        assert_eq!(translate_key(&KeyEvent::ctrl('u')), None);
        assert_eq!(translate_key(&KeyEvent::ctrl('z')), None, "undo is a global binding");
        let ctrl_home = KeyEvent::new(KeyCode::Home, KeyModifiers::CTRL);
        assert_eq!(translate_key(&ctrl_home), None);
    }

    #[test]
    fn navigation_and_contextual_keys() {
        assert_eq!(
            translate_key(&plain(KeyCode::Home)),
            Some(EditAction::Motion(MotionKind::LineStart))
        );
        assert_eq!(
            translate_key(&plain(KeyCode::PageDown)),
            Some(EditAction::Motion(MotionKind::PageDown))
        );
        assert_eq!(translate_key(&plain(KeyCode::Tab)), Some(EditAction::Tab));
        assert_eq!(translate_key(&plain(KeyCode::Esc)), Some(EditAction::Escape));
        assert_eq!(translate_key(&plain(KeyCode::Delete)), None);
        let alt = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT);
        assert_eq!(translate_key(&alt), None);
    }
}
