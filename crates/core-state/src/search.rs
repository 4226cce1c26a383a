//! Incremental search over the whole buffer.
//!
//! Matches are non-overlapping and ordered by (row, col). The first jump
//! after a key change goes to the match nearest the reference line (the row
//! the cursor was on when the search began); next/prev then cycle through
//! the list. The cursor lands just past the matched text.

use core_text::{Buffer, Position};
use tracing::debug;

use crate::EditorState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    key: Vec<char>,
    reference_line: usize,
    matches: Vec<Position>,
    index: usize,
}

impl SearchState {
    pub fn key(&self) -> String {
        self.key.iter().collect()
    }

    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    pub fn is_active(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn reference_line(&self) -> usize {
        self.reference_line
    }

    pub fn matches(&self) -> &[Position] {
        &self.matches
    }

    /// Index into [`SearchState::matches`] of the current match.
    pub fn current_index(&self) -> Option<usize> {
        (!self.matches.is_empty()).then_some(self.index)
    }

    pub fn current(&self) -> Option<Position> {
        self.matches.get(self.index).copied()
    }
}

/// Every non-overlapping occurrence of `key`, in line order.
pub fn find_matches(buffer: &Buffer, key: &[char]) -> Vec<Position> {
    let mut out = Vec::new();
    if key.is_empty() {
        return out;
    }
    for row in 0..buffer.line_count() {
        let line = buffer.line_chars(row);
        let mut col = 0;
        while col + key.len() <= line.len() {
            if line[col..col + key.len()] == *key {
                out.push(Position::new(row, col));
                col += key.len();
            } else {
                col += 1;
            }
        }
    }
    out
}

/// Index of the match closest (by line distance) to `reference`.
///
/// A match on the reference line wins immediately. Otherwise the scan stops
/// at the first match whose gap grows, which is sound because `matches` is
/// sorted by row. Ties keep the earlier match.
pub fn nearest_match(matches: &[Position], reference: usize) -> Option<usize> {
    let mut best = None;
    let mut min_gap = usize::MAX;
    for (i, m) in matches.iter().enumerate() {
        let gap = m.row.abs_diff(reference);
        if gap == 0 {
            return Some(i);
        }
        if gap < min_gap {
            min_gap = gap;
            best = Some(i);
        } else if gap > min_gap {
            break;
        }
    }
    best
}

impl EditorState {
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Start a new search anchored at the cursor row.
    pub fn begin_search(&mut self) {
        self.search = SearchState {
            reference_line: self.cursor.row,
            ..SearchState::default()
        };
    }

    /// Search for `key` and jump to the match nearest the reference line.
    /// An empty key is ignored. Returns whether a match was selected.
    pub fn find(&mut self, key: &str) -> bool {
        if key.is_empty() {
            debug!(target: "state.search", "find_empty_key");
            return false;
        }
        self.search.key = key.chars().collect();
        self.search.matches = find_matches(&self.buffer, &self.search.key);
        self.search.index = 0;
        let Some(near) = nearest_match(&self.search.matches, self.search.reference_line) else {
            debug!(target: "state.search", key_len = self.search.key.len(), "find_no_match");
            return false;
        };
        debug!(
            target: "state.search",
            key_len = self.search.key.len(),
            matches = self.search.matches.len(),
            selected = near,
            "find"
        );
        self.jump_to_match(near);
        true
    }

    pub fn find_next(&mut self) -> bool {
        let n = self.search.matches.len();
        if n == 0 {
            return false;
        }
        self.jump_to_match((self.search.index + 1) % n);
        true
    }

    pub fn find_prev(&mut self) -> bool {
        let n = self.search.matches.len();
        if n == 0 {
            return false;
        }
        self.jump_to_match((self.search.index + n - 1) % n);
        true
    }

    /// Drop the key and matches; the reference line is kept.
    pub fn clear_search(&mut self) -> bool {
        if !self.search.is_active() && self.search.matches.is_empty() {
            return false;
        }
        self.search.key.clear();
        self.search.matches.clear();
        self.search.index = 0;
        true
    }

    fn jump_to_match(&mut self, index: usize) {
        let Some(m) = self.search.matches.get(index).copied() else {
            return;
        };
        self.search.index = index;
        self.cursor = self
            .buffer
            .clamp(Position::new(m.row, m.col + self.search.key.len()));
        self.selection = None;
        self.reveal_row(m.row);
        self.publish();
    }

    /// Recompute matches after an edit without moving the cursor.
    pub(crate) fn refresh_search(&mut self) {
        if !self.search.is_active() {
            return;
        }
        self.search.matches = find_matches(&self.buffer, &self.search.key);
        let last = self.search.matches.len().saturating_sub(1);
        self.search.index = self.search.index.min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_syntax::CompletionIndex;
    use pretty_assertions::assert_eq;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn state(text: &str) -> EditorState {
        EditorState::with_index(Buffer::from_text(text), CompletionIndex::isolated())
    }

    #[test]
    fn matches_do_not_overlap() {
        let b = Buffer::from_text("aaaa\n");
        assert_eq!(find_matches(&b, &chars("aa")), vec![p(0, 0), p(0, 2)]);
    }

    #[test]
    fn reference_line_match_wins() {
        let b = Buffer::from_lines(["xab", "ababab", "ab"]);
        let m = find_matches(&b, &chars("ab"));
        assert_eq!(m, vec![p(0, 1), p(1, 0), p(1, 2), p(1, 4), p(2, 0)]);
        assert_eq!(nearest_match(&m, 0), Some(0));
        assert_eq!(nearest_match(&m, 2), Some(4));
        assert_eq!(nearest_match(&m, 1), Some(1));
    }

    #[test]
    fn nearest_prefers_earlier_on_tie() {
        let m = vec![p(1, 0), p(5, 0)];
        assert_eq!(nearest_match(&m, 3), Some(0));
        assert_eq!(nearest_match(&[], 3), None);
    }

    #[test]
    fn find_places_cursor_after_match() {
        let mut s = state("xab\nababab\nab\n");
        s.move_to(p(1, 0));
        s.begin_search();
        assert!(s.find("ab"));
        assert_eq!(s.cursor(), p(1, 2));
        assert!(s.find_next());
        assert_eq!(s.cursor(), p(1, 4));
        assert!(s.find_prev());
        assert!(s.find_prev());
        assert_eq!(s.cursor(), p(0, 3));
        assert!(s.find_prev());
        assert_eq!(s.cursor(), p(2, 2), "prev wraps to the last match");
        assert!(s.find_next());
        assert_eq!(s.cursor(), p(0, 3), "next wraps to the first match");
    }

    #[test]
    fn empty_key_and_no_match_are_noops() {
        let mut s = state("abc\n");
        s.begin_search();
        assert!(!s.find(""));
        assert!(!s.search().is_active());
        assert!(!s.find("zz"));
        assert!(!s.find_next());
        assert_eq!(s.cursor(), p(0, 0));
    }

    #[test]
    fn far_match_recenters_viewport() {
        let mut text: String = (0..40).map(|_| "line\n").collect();
        text.push_str("needle\n");
        let mut s = state(&text);
        s.set_page_size(10);
        s.begin_search();
        assert!(s.find("needle"));
        assert_eq!(s.cursor(), p(40, 6));
        assert_eq!(s.top(), 33, "centering is capped by the last page");
        assert!(s.is_row_visible(40));
    }

    #[test]
    fn match_above_viewport_scrolls_minimally() {
        let mut text = String::from("needle\n");
        text.push_str(&(0..40).map(|_| "line\n").collect::<String>());
        let mut s = state(&text);
        s.set_page_size(10);
        s.move_to(p(35, 0));
        assert!(s.top() > 1);
        s.begin_search();
        assert!(s.find("needle"));
        assert_eq!(s.top(), 1);
    }

    #[test]
    fn edits_refresh_matches() {
        let mut s = state("ab ab\n");
        s.begin_search();
        s.find("ab");
        assert_eq!(s.search().matches().len(), 2);
        s.move_end();
        s.insert_text(" ab");
        assert_eq!(s.search().matches().len(), 3);
        assert!(s.clear_search());
        assert!(s.search().matches().is_empty());
        assert!(!s.clear_search());
    }
}
