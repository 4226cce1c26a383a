//! Reversible action log.
//!
//! Every buffer mutation after load is an [`Action`]. Primitives record
//! enough to reverse themselves: `Insert` knows its text, `Delete` keeps the
//! removed text, `Move` keeps both cursor positions. A `Group` applies its
//! members in order and reverses them in reverse order.
//!
//! [`Action::group`] moves cursor `Move`s to the end of the group, so a
//! group's cursor change is the last step of apply and the first step of
//! reverse. Buffer and cursor are therefore never observed out of step.

use core_text::{Buffer, Position};
use tracing::trace;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Insert `text` (may contain `'\n'`) at `pos`.
    Insert { pos: Position, text: String },
    /// Remove `[start, stop)`; `removed` is the text that was there.
    Delete {
        start: Position,
        stop: Position,
        removed: String,
    },
    Move { from: Position, to: Position },
    Group(Vec<Action>),
}

impl Action {
    pub fn insert(pos: Position, text: impl Into<String>) -> Self {
        Action::Insert {
            pos,
            text: text.into(),
        }
    }

    /// Capture a delete of `[start, stop)` against the current buffer.
    pub fn delete(buffer: &Buffer, start: Position, stop: Position) -> Self {
        Action::Delete {
            start,
            stop,
            removed: buffer.slice(start, stop),
        }
    }

    pub fn move_cursor(from: Position, to: Position) -> Self {
        Action::Move { from, to }
    }

    /// Build a group, keeping the relative order of buffer edits and of
    /// moves but placing every move after every edit.
    pub fn group(actions: impl IntoIterator<Item = Action>) -> Self {
        let (mut edits, moves): (Vec<_>, Vec<_>) = actions
            .into_iter()
            .partition(|a| !matches!(a, Action::Move { .. }));
        edits.extend(moves);
        Action::Group(edits)
    }

    pub fn apply(&self, buffer: &mut Buffer, cursor: &mut Position) {
        match self {
            Action::Insert { pos, text } => {
                buffer.insert(*pos, text);
            }
            Action::Delete { start, stop, .. } => {
                buffer.remove(*start, *stop);
            }
            Action::Move { to, .. } => *cursor = *to,
            Action::Group(actions) => {
                for a in actions {
                    a.apply(buffer, cursor);
                }
            }
        }
    }

    pub fn reverse(&self, buffer: &mut Buffer, cursor: &mut Position) {
        match self {
            Action::Insert { pos, text } => {
                buffer.remove(*pos, pos.advanced_by(text));
            }
            Action::Delete { start, removed, .. } => {
                buffer.insert(*start, removed);
            }
            Action::Move { from, .. } => *cursor = *from,
            Action::Group(actions) => {
                for a in actions.iter().rev() {
                    a.reverse(buffer, cursor);
                }
            }
        }
    }

    /// Whether applying this action changes buffer content.
    pub fn mutates_buffer(&self) -> bool {
        match self {
            Action::Insert { text, .. } => !text.is_empty(),
            Action::Delete { removed, .. } => !removed.is_empty(),
            Action::Move { .. } => false,
            Action::Group(actions) => actions.iter().any(Action::mutates_buffer),
        }
    }
}

/// Applied (`history`) and undone (`redo`) groups.
#[derive(Debug, Default)]
pub struct UndoEngine {
    history: Vec<Action>,
    redo_stack: Vec<Action>,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Apply `actions` once as a single group, push it, and clear the redo stack.
    pub fn commit(
        &mut self,
        actions: impl IntoIterator<Item = Action>,
        buffer: &mut Buffer,
        cursor: &mut Position,
    ) {
        let group = Action::group(actions);
        group.apply(buffer, cursor);
        self.history.push(group);
        trace!(target: "state.undo", undo_depth = self.history.len(), redo_depth = self.redo_stack.len(), "commit");
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    pub fn undo(&mut self, buffer: &mut Buffer, cursor: &mut Position) -> bool {
        let Some(group) = self.history.pop() else {
            trace!(target: "state.undo", "undo_empty");
            return false;
        };
        group.reverse(buffer, cursor);
        self.redo_stack.push(group);
        trace!(target: "state.undo", undo_depth = self.history.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        true
    }

    pub fn redo(&mut self, buffer: &mut Buffer, cursor: &mut Position) -> bool {
        let Some(group) = self.redo_stack.pop() else {
            trace!(target: "state.undo", "redo_empty");
            return false;
        };
        group.apply(buffer, cursor);
        self.history.push(group);
        trace!(target: "state.undo", undo_depth = self.history.len(), redo_depth = self.redo_stack.len(), "redo_pop");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn group_puts_moves_last() {
        let g = Action::group([
            Action::move_cursor(p(0, 0), p(0, 1)),
            Action::insert(p(0, 0), "x"),
        ]);
        match g {
            Action::Group(items) => {
                assert!(matches!(items[0], Action::Insert { .. }));
                assert!(matches!(items[1], Action::Move { .. }));
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn commit_then_undo_restores_buffer_and_cursor() {
        let mut buf = Buffer::from_text("abc\n");
        let mut cur = p(0, 1);
        let mut eng = UndoEngine::new();
        eng.commit(
            [Action::insert(p(0, 1), "XY"), Action::move_cursor(cur, p(0, 3))],
            &mut buf,
            &mut cur,
        );
        assert_eq!(buf.to_text(), "aXYbc\n");
        assert_eq!(cur, p(0, 3));
        assert!(eng.undo(&mut buf, &mut cur));
        assert_eq!(buf.to_text(), "abc\n");
        assert_eq!(cur, p(0, 1));
        assert!(eng.redo(&mut buf, &mut cur));
        assert_eq!(buf.to_text(), "aXYbc\n");
        assert_eq!(cur, p(0, 3));
    }

    #[test]
    fn delete_records_removed_text_across_lines() {
        let mut buf = Buffer::from_text("ab\ncd\n");
        let mut cur = p(1, 0);
        let mut eng = UndoEngine::new();
        let del = Action::delete(&buf, p(0, 2), p(1, 0));
        eng.commit([del, Action::move_cursor(cur, p(0, 2))], &mut buf, &mut cur);
        assert_eq!(buf.lines(), vec!["abcd", ""]);
        eng.undo(&mut buf, &mut cur);
        assert_eq!(buf.lines(), vec!["ab", "cd", ""]);
        assert_eq!(cur, p(1, 0));
    }

    #[test]
    fn new_commit_clears_redo() {
        let mut buf = Buffer::new();
        let mut cur = p(0, 0);
        let mut eng = UndoEngine::new();
        eng.commit([Action::insert(p(0, 0), "a")], &mut buf, &mut cur);
        eng.undo(&mut buf, &mut cur);
        assert_eq!(eng.redo_depth(), 1);
        eng.commit([Action::insert(p(0, 0), "b")], &mut buf, &mut cur);
        assert_eq!(eng.redo_depth(), 0);
        assert!(!eng.redo(&mut buf, &mut cur));
        assert_eq!(buf.to_text(), "b");
    }

    #[test]
    fn empty_stacks_are_no_ops() {
        let mut buf = Buffer::from_text("keep");
        let mut cur = p(0, 2);
        let mut eng = UndoEngine::new();
        assert!(!eng.undo(&mut buf, &mut cur));
        assert!(!eng.redo(&mut buf, &mut cur));
        assert_eq!(buf.to_text(), "keep");
        assert_eq!(cur, p(0, 2));
    }

    #[test]
    fn mutates_buffer_ignores_pure_moves() {
        assert!(!Action::group([Action::move_cursor(p(0, 0), p(1, 1))]).mutates_buffer());
        assert!(Action::insert(p(0, 0), "a").mutates_buffer());
    }
}
