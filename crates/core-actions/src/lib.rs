//! Editing commands for the text surface and file persistence.
//!
//! Keys reaching the editing surface are first translated into an
//! [`EditAction`] by [`translate_key`], then applied to an
//! [`core_state::EditorState`] by [`dispatcher::dispatch`]. Several keys
//! (Tab, Enter, Esc, Up, Down) mean different things depending on whether a
//! completion popup is open; the translator stays context free and the
//! dispatcher resolves them against the state.

pub mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use dispatcher::{DispatchResult, PopupLayout, dispatch};
pub use io_ops::{PersistError, open_editor, read_lines, save, write_lines};
pub use key_translator::{default_bindings, translate_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Up,
    Down,
    Left,
    Right,
    /// First column after the leading tabs.
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    Backspace,
    DeleteToLineStart,
    DeleteToLineEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Motion(MotionKind),
    Edit(EditKind),
    /// Bracketed paste; line endings are normalized before insertion.
    Paste(String),
    /// Indent, complete, or accept the highlighted candidate.
    Tab,
    /// Accept the highlighted candidate or split the line.
    Enter,
    /// Dismiss suggestions, else clear the search highlight.
    Escape,
    Undo,
    Redo,
}

impl EditAction {
    /// Short label for logs. Never includes typed or pasted text.
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::Motion(_) => "motion",
            EditAction::Edit(EditKind::InsertChar(_)) => "insert_char",
            EditAction::Edit(EditKind::Backspace) => "backspace",
            EditAction::Edit(EditKind::DeleteToLineStart) => "delete_to_line_start",
            EditAction::Edit(EditKind::DeleteToLineEnd) => "delete_to_line_end",
            EditAction::Paste(_) => "paste",
            EditAction::Tab => "tab",
            EditAction::Enter => "enter",
            EditAction::Escape => "escape",
            EditAction::Undo => "undo",
            EditAction::Redo => "redo",
        }
    }
}
