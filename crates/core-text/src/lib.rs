//! Rope-backed line buffer.
//!
//! The buffer is an ordered sequence of lines, each an ordered sequence of
//! Unicode code points. Storage is a single `ropey::Rope` holding the lines
//! joined by `'\n'`, so the rope text *is* the on-disk representation:
//! `["a", "b", ""]` is stored as `"a\nb\n"`. An empty rope still reports one
//! (empty) line, which gives the "at least one line" invariant for free.
//!
//! Columns are code point indices within a line (`0 <= col <= line_len`).
//! Display columns (after leading-tab expansion) live in [`columns`].
//!
//! Positions handed to the mutating APIs are trusted: out-of-range rows or
//! columns trip a `debug_assert!` and are otherwise unchecked. Callers
//! (`core-state`) clamp user-derived positions before calling in.

use ropey::Rope;

pub mod columns;

pub use columns::{TAB_WIDTH, leading_tabs, pad_col, snap_display_col, unpad_col};

/// A position inside a buffer expressed as (row, column), both 0-based.
/// `col` counts code points, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }

    /// Position reached after inserting `text` at `self`.
    pub fn advanced_by(self, text: &str) -> Self {
        let mut end = self;
        for ch in text.chars() {
            if ch == '\n' {
                end.row += 1;
                end.col = 0;
            } else {
                end.col += 1;
            }
        }
        end
    }
}

#[derive(Clone, Debug, Default)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    /// A buffer holding a single empty line.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from LF-delimited text. The text is stored verbatim;
    /// a trailing `'\n'` yields a trailing empty line.
    pub fn from_text(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Build a buffer from discrete lines (which must not contain `'\n'`).
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            let line = line.as_ref();
            debug_assert!(!line.contains('\n'), "line must not contain a newline");
            text.push_str(line);
        }
        Self::from_text(&text)
    }

    /// Total number of lines. Never zero.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its terminator.
    pub fn line(&self, row: usize) -> Option<String> {
        if row >= self.line_count() {
            return None;
        }
        let mut s = self.rope.line(row).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Line content as code points (empty for rows past the end).
    pub fn line_chars(&self, row: usize) -> Vec<char> {
        if row >= self.line_count() {
            return Vec::new();
        }
        let mut chars: Vec<char> = self.rope.line(row).chars().collect();
        if chars.last() == Some(&'\n') {
            chars.pop();
        }
        chars
    }

    /// Number of code points in a line, excluding the terminator.
    pub fn line_len(&self, row: usize) -> usize {
        if row >= self.line_count() {
            return 0;
        }
        let slice = self.rope.line(row);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Code point at `pos`, or `None` at/after the end of the line.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        if pos.col >= self.line_len(pos.row) {
            return None;
        }
        Some(self.rope.char(self.char_index(pos)))
    }

    /// All lines, in order, without terminators.
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).filter_map(|i| self.line(i)).collect()
    }

    /// Lines joined by a single `'\n'`.
    pub fn to_text(&self) -> String {
        self.rope.to_string()
    }

    /// Clamp `pos` onto an existing row and a column within that row.
    pub fn clamp(&self, pos: Position) -> Position {
        let row = pos.row.min(self.line_count() - 1);
        let col = pos.col.min(self.line_len(row));
        Position { row, col }
    }

    fn char_index(&self, pos: Position) -> usize {
        debug_assert!(pos.row < self.line_count(), "row {} out of range", pos.row);
        debug_assert!(
            pos.col <= self.line_len(pos.row),
            "col {} past end of row {}",
            pos.col,
            pos.row
        );
        self.rope.line_to_char(pos.row) + pos.col
    }

    /// Insert `text` (which may contain `'\n'`) at `pos`. Returns the
    /// position just past the inserted text.
    pub fn insert(&mut self, pos: Position, text: &str) -> Position {
        let idx = self.char_index(pos);
        self.rope.insert(idx, text);
        pos.advanced_by(text)
    }

    /// Text in the half-open range `[start, stop)`, which may span rows.
    pub fn slice(&self, start: Position, stop: Position) -> String {
        let a = self.char_index(start);
        let b = self.char_index(stop);
        debug_assert!(a <= b, "slice range reversed");
        self.rope.slice(a..b).to_string()
    }

    /// Remove the half-open range `[start, stop)` and return the removed text.
    /// Removing a range that covers a row's terminator joins the rows.
    pub fn remove(&mut self, start: Position, stop: Position) -> String {
        let a = self.char_index(start);
        let b = self.char_index(stop);
        debug_assert!(a <= b, "remove range reversed");
        let removed = self.rope.slice(a..b).to_string();
        self.rope.remove(a..b);
        removed
    }

    /// Ensure the stored text ends with `'\n'` (last line empty). Returns
    /// `true` when a terminator was appended.
    pub fn ensure_trailing_newline(&mut self) -> bool {
        let last = self.line_count() - 1;
        if self.line_len(last) == 0 {
            return false;
        }
        let end = self.rope.len_chars();
        self.rope.insert(end, "\n");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_buffer_has_one_line() {
        let b = Buffer::new();
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0).as_deref(), Some(""));
        assert_eq!(b.line(1), None);
    }

    #[test]
    fn trailing_newline_is_trailing_empty_line() {
        let b = Buffer::from_text("a\nb\n");
        assert_eq!(b.lines(), vec!["a", "b", ""]);
        assert_eq!(Buffer::from_lines(["a", "b", ""]).to_text(), "a\nb\n");
    }

    #[test]
    fn carriage_return_is_not_a_line_break() {
        let b = Buffer::from_text("a\rb\n");
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line_len(0), 3);
    }

    #[test]
    fn columns_count_code_points() {
        let b = Buffer::from_text("héllo\n");
        assert_eq!(b.line_len(0), 5);
        assert_eq!(b.char_at(Position::new(0, 1)), Some('é'));
        assert_eq!(b.char_at(Position::new(0, 5)), None);
    }

    #[test]
    fn insert_with_newline_splits_row() {
        let mut b = Buffer::from_text("abcd");
        let end = b.insert(Position::new(0, 2), "\n\t");
        assert_eq!(end, Position::new(1, 1));
        assert_eq!(b.lines(), vec!["ab", "\tcd"]);
    }

    #[test]
    fn remove_across_terminator_joins_rows() {
        let mut b = Buffer::from_text("ab\ncd\n");
        let removed = b.remove(Position::new(0, 2), Position::new(1, 0));
        assert_eq!(removed, "\n");
        assert_eq!(b.lines(), vec!["abcd", ""]);
    }

    #[test]
    fn slice_within_row() {
        let b = Buffer::from_text("hello world");
        assert_eq!(b.slice(Position::new(0, 6), Position::new(0, 11)), "world");
    }

    #[test]
    fn ensure_trailing_newline_only_when_needed() {
        let mut b = Buffer::from_text("x");
        assert!(b.ensure_trailing_newline());
        assert_eq!(b.to_text(), "x\n");
        assert!(!b.ensure_trailing_newline());
        assert_eq!(b.line_count(), 2);
    }

    #[test]
    fn clamp_pulls_position_inside() {
        let b = Buffer::from_text("ab\nc");
        assert_eq!(b.clamp(Position::new(9, 9)), Position::new(1, 1));
        assert_eq!(b.clamp(Position::new(0, 7)), Position::new(0, 2));
    }

    #[test]
    fn advanced_by_tracks_rows() {
        let p = Position::new(3, 4).advanced_by("xy\nz");
        assert_eq!(p, Position::new(4, 1));
        assert_eq!(Position::new(1, 1).advanced_by("abc"), Position::new(1, 4));
    }
}
