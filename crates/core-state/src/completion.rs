//! Prefix completion session.
//!
//! A session exists while suggestions are shown. It remembers where the
//! typed prefix starts so accepting a candidate can replace it; the prefix
//! always ends at the cursor.

use core_syntax::identifier_prefix_start;
use core_text::Position;
use tracing::debug;

use crate::{Action, EditorState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSession {
    pub row: usize,
    pub prefix_start: usize,
    pub candidates: Vec<String>,
    pub selected: usize,
}

impl CompletionSession {
    pub fn current(&self) -> Option<&str> {
        self.candidates.get(self.selected).map(String::as_str)
    }

    /// Move the highlight by `delta`, wrapping at both ends.
    pub fn cycle(&mut self, delta: isize) {
        let n = self.candidates.len() as isize;
        if n == 0 {
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(n) as usize;
    }
}

impl EditorState {
    pub fn completion(&self) -> Option<&CompletionSession> {
        self.completion.as_ref()
    }

    /// Look up candidates for the identifier ending at the cursor. Opens a
    /// session when there is at least one, closes it otherwise.
    pub fn load_suggestions(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        let line = self.buffer.line_chars(row);
        let Some(start) = identifier_prefix_start(&line, col, self.language) else {
            self.completion = None;
            return false;
        };
        let prefix: String = line[start..col].iter().collect();
        let candidates = self.index.lookup(&prefix, self.max_candidates);
        debug!(
            target: "state.completion",
            prefix_len = col - start,
            candidates = candidates.len(),
            "load_suggestions"
        );
        if candidates.is_empty() {
            self.completion = None;
            return false;
        }
        self.completion = Some(CompletionSession {
            row,
            prefix_start: start,
            candidates,
            selected: 0,
        });
        true
    }

    /// Reload candidates if a session is open.
    pub(crate) fn refresh_suggestions(&mut self) {
        if self.completion.is_some() {
            self.load_suggestions();
        }
    }

    /// Replace the prefix with the highlighted candidate as one undoable
    /// group. No-op without an active session.
    pub fn accept_suggestion(&mut self) -> bool {
        let Some(session) = self.completion.take() else {
            debug!(target: "state.completion", "accept_without_session");
            return false;
        };
        let Some(word) = session.current().map(str::to_owned) else {
            return false;
        };
        let from = self.cursor;
        if session.row != from.row || session.prefix_start > from.col {
            debug!(target: "state.completion", "accept_stale_session");
            return false;
        }
        let start = Position::new(from.row, session.prefix_start);
        let mut actions = Vec::with_capacity(3);
        if start != from {
            actions.push(Action::delete(&self.buffer, start, from));
        }
        let end = start.advanced_by(&word);
        actions.push(Action::insert(start, word));
        actions.push(Action::move_cursor(from, end));
        self.commit(actions);
        true
    }

    pub fn cycle_suggestion(&mut self, delta: isize) {
        if let Some(session) = self.completion.as_mut() {
            session.cycle(delta);
        }
    }

    pub fn dismiss_suggestions(&mut self) -> bool {
        self.completion.take().is_some()
    }
}
