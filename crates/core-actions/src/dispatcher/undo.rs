//! Undo / redo through the editor's action log.

use super::DispatchResult;
use core_state::EditorState;

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    if state.undo() {
        tracing::trace!(
            target: "actions.dispatch",
            op = "undo",
            remaining = state.history().undo_depth(),
            "undo"
        );
        DispatchResult::edited()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_redo(state: &mut EditorState) -> DispatchResult {
    if state.redo() {
        tracing::trace!(
            target: "actions.dispatch",
            op = "redo",
            remaining = state.history().redo_depth(),
            "redo"
        );
        DispatchResult::edited()
    } else {
        DispatchResult::clean()
    }
}
