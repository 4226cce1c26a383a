//! Text mutation: typing, paste, backspace, line kills and Enter.
//!
//! All mutations go through `EditorState`, which records them in the
//! action log. Handlers that cannot change anything (Backspace at the start
//! of the buffer, killing an empty span) report a clean result.

use super::DispatchResult;
use crate::{EditAction, EditKind};
use core_state::EditorState;

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditorState) -> DispatchResult {
    let before = state.cursor();
    let changed = match kind {
        EditKind::InsertChar(c) => {
            state.insert_char(c);
            true
        }
        EditKind::Backspace => state.delete_left(),
        EditKind::DeleteToLineStart => state.delete_to_line_start(),
        EditKind::DeleteToLineEnd => state.delete_to_line_end(),
    };
    tracing::trace!(
        target: "actions.dispatch",
        op = EditAction::Edit(kind).label(),
        row = before.row,
        col = before.col,
        to_row = state.cursor().row,
        to_col = state.cursor().col,
        changed,
        "edit"
    );
    if changed {
        DispatchResult::edited()
    } else {
        DispatchResult::clean()
    }
}

/// Insert pasted text as one undoable step. CRLF and lone CR become LF.
pub(crate) fn handle_paste(text: &str, state: &mut EditorState) -> DispatchResult {
    let normalized = normalize_newlines(text);
    tracing::trace!(target: "actions.dispatch", len = normalized.len(), "paste");
    if normalized.is_empty() {
        return DispatchResult::clean();
    }
    state.dismiss_suggestions();
    state.insert_text(&normalized);
    DispatchResult::edited()
}

/// With the popup open Enter accepts the highlighted candidate; otherwise
/// it splits the line. A selection is dropped rather than replaced.
pub(crate) fn handle_enter(state: &mut EditorState) -> DispatchResult {
    if state.completion().is_some() {
        return if state.accept_suggestion() {
            DispatchResult::edited()
        } else {
            DispatchResult::dirty()
        };
    }
    if state.selection().is_some() {
        let cursor = state.cursor();
        state.move_to(cursor);
        return DispatchResult::dirty();
    }
    state.insert_newline();
    DispatchResult::edited()
}

pub(crate) fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
