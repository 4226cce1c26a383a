//! Tab and Esc, whose meaning depends on the completion session.

use super::DispatchResult;
use core_state::EditorState;

/// Tab indents at the start of a line or after a tab. Otherwise it accepts
/// the highlighted candidate when the popup is open, or loads candidates for
/// the identifier before the cursor; a lone candidate is accepted at once.
pub(crate) fn handle_tab(state: &mut EditorState) -> DispatchResult {
    let cursor = state.cursor();
    let after_tab = cursor.col > 0
        && state.buffer().line_chars(cursor.row).get(cursor.col - 1) == Some(&'\t');
    if cursor.col == 0 || after_tab {
        state.dismiss_suggestions();
        state.insert_char('\t');
        return DispatchResult::edited();
    }
    if state.completion().is_some() {
        return if state.accept_suggestion() {
            DispatchResult::edited()
        } else {
            DispatchResult::dirty()
        };
    }
    if !state.load_suggestions() {
        tracing::debug!(target: "actions.dispatch", "tab_no_candidates");
        return DispatchResult::clean();
    }
    let single = state.completion().is_some_and(|c| c.candidates.len() == 1);
    if single && state.accept_suggestion() {
        return DispatchResult::edited();
    }
    DispatchResult::dirty()
}

/// Esc closes the popup; with no popup it clears the search highlight.
pub(crate) fn handle_escape(state: &mut EditorState) -> DispatchResult {
    if state.dismiss_suggestions() || state.clear_search() {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
