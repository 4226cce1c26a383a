//! Cursor movement. While the completion popup is open Up/Down cycle the
//! highlighted candidate instead of moving the cursor.

use super::{DispatchResult, PopupLayout};
use crate::MotionKind;
use core_state::EditorState;

pub(crate) fn handle_motion(
    kind: MotionKind,
    state: &mut EditorState,
    popup: PopupLayout,
) -> DispatchResult {
    if state.completion().is_some() {
        match kind {
            MotionKind::Up | MotionKind::Down => {
                let toward_list = match popup {
                    PopupLayout::Below => kind == MotionKind::Down,
                    PopupLayout::Above => kind == MotionKind::Up,
                };
                state.cycle_suggestion(if toward_list { 1 } else { -1 });
                tracing::trace!(target: "actions.dispatch", ?kind, ?popup, "cycle_suggestion");
                return DispatchResult::dirty();
            }
            _ => {
                state.dismiss_suggestions();
            }
        }
    }
    let before = (state.cursor(), state.top());
    let scrolled = match kind {
        MotionKind::Up => state.move_up(),
        MotionKind::Down => state.move_down(),
        MotionKind::Left => state.move_left(),
        MotionKind::Right => state.move_right(),
        MotionKind::LineStart => state.move_home(),
        MotionKind::LineEnd => state.move_end(),
        MotionKind::PageUp => state.page_up(),
        MotionKind::PageDown => state.page_down(),
    };
    let moved = before != (state.cursor(), state.top());
    tracing::trace!(target: "actions.dispatch", ?kind, scrolled, moved, "motion");
    // a motion also clears the selection, which needs a repaint either way
    DispatchResult::dirty()
}
