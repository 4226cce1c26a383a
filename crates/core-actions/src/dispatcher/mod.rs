//! Applies [`EditAction`]s to an [`EditorState`].
//!
//! Sub-modules by concern:
//! * `motion`     - cursor movement, or candidate cycling while the popup is open
//! * `edit`       - text mutation (typing, paste, backspace, line kills, Enter)
//! * `completion` - Tab and Esc, which depend on the completion session
//! * `undo`       - undo / redo
//!
//! Every handler returns a [`DispatchResult`]. The caller redraws when
//! `dirty` is set; `edited` reports whether the buffer content changed.

use crate::EditAction;
use core_state::EditorState;

mod completion;
mod edit;
mod motion;
mod undo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub edited: bool,
}

impl DispatchResult {
    pub fn clean() -> Self {
        Self {
            dirty: false,
            edited: false,
        }
    }

    /// Something visible changed but the buffer did not.
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            edited: false,
        }
    }

    pub fn edited() -> Self {
        Self {
            dirty: true,
            edited: true,
        }
    }
}

/// Where the completion popup is drawn relative to the cursor. Up/Down move
/// the highlight away from the cursor in the direction the list grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupLayout {
    #[default]
    Below,
    Above,
}

pub fn dispatch(action: EditAction, state: &mut EditorState, popup: PopupLayout) -> DispatchResult {
    let label = action.label();
    let result = match action {
        EditAction::Motion(kind) => motion::handle_motion(kind, state, popup),
        EditAction::Edit(kind) => edit::handle_edit(kind, state),
        EditAction::Paste(text) => edit::handle_paste(&text, state),
        EditAction::Enter => edit::handle_enter(state),
        EditAction::Tab => completion::handle_tab(state),
        EditAction::Escape => completion::handle_escape(state),
        EditAction::Undo => undo::handle_undo(state),
        EditAction::Redo => undo::handle_redo(state),
    };
    tracing::trace!(
        target: "actions.dispatch",
        action = label,
        dirty = result.dirty,
        edited = result.edited,
        "dispatch"
    );
    result
}
