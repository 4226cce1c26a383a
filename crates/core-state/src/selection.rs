//! Single-line selection and multi-click tracking.

use std::time::{Duration, Instant};

use core_syntax::{token_at, tokenize};
use core_text::{Position, snap_display_col};
use tracing::trace;

use crate::EditorState;

/// Window within which repeated clicks on one cell count up.
pub const DEFAULT_MULTI_CLICK: Duration = Duration::from_millis(666);

/// Half-open range `[start, end)` of columns on `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn range(&self) -> (Position, Position) {
        (
            Position::new(self.row, self.start),
            Position::new(self.row, self.end),
        )
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row == self.row && self.start <= col && col < self.end
    }
}

/// Counts clicks landing on the same cell. The window is measured from the
/// first click of a run.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<((usize, usize), Instant)>,
    count: u32,
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: None,
            count: 0,
        }
    }

    /// Record a click on `cell` at `now` and return the run length.
    pub fn register(&mut self, cell: (usize, usize), now: Instant) -> u32 {
        match self.last {
            Some((prev, since))
                if prev == cell && now.saturating_duration_since(since) <= self.window =>
            {
                self.count += 1;
            }
            _ => {
                self.last = Some((cell, now));
                self.count = 1;
            }
        }
        self.count
    }

    /// Restart counting without leaving the current run.
    pub fn restart(&mut self) {
        self.count = 1;
    }
}

impl EditorState {
    /// Handle a click at a cell relative to the text area: `visible_row`
    /// counts from the top of the viewport, `display_col` from the first
    /// text column. Two clicks select the token under the cursor, three the
    /// whole line, a fourth cancels. Returns the click count.
    pub fn click(&mut self, visible_row: usize, display_col: usize, now: Instant) -> u32 {
        let row = (self.top - 1 + visible_row).min(self.line_count() - 1);
        let line = self.buffer.line_chars(row);
        let col = snap_display_col(&line, display_col);
        self.cursor = Position::new(row, col);
        self.completion = None;

        let count = self.clicks.register((visible_row, display_col), now);
        match count {
            1 => self.selection = None,
            2 => {
                let tokens = tokenize(&line, self.language);
                if let Some(tok) = token_at(&tokens, col) {
                    self.selection = Some(Selection {
                        row,
                        start: tok.offset,
                        end: tok.end(),
                    });
                    self.cursor.col = tok.end();
                }
            }
            3 => {
                self.selection = Some(Selection {
                    row,
                    start: 0,
                    end: line.len(),
                });
                self.cursor.col = line.len();
            }
            _ => {
                self.clicks.restart();
                self.selection = None;
            }
        }
        trace!(target: "state", count, row, "click");
        self.publish();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_syntax::CompletionIndex;
    use core_text::Buffer;
    use pretty_assertions::assert_eq;

    fn state(text: &str) -> EditorState {
        EditorState::with_index(Buffer::from_text(text), CompletionIndex::isolated())
    }

    #[test]
    fn tracker_counts_same_cell_within_window() {
        let t0 = Instant::now();
        let mut t = ClickTracker::new(Duration::from_millis(100));
        assert_eq!(t.register((1, 1), t0), 1);
        assert_eq!(t.register((1, 1), t0 + Duration::from_millis(50)), 2);
        assert_eq!(t.register((1, 2), t0 + Duration::from_millis(60)), 1);
        assert_eq!(t.register((1, 2), t0 + Duration::from_millis(500)), 1);
    }

    #[test]
    fn single_click_places_cursor_and_clears_selection() {
        let mut s = state("\tfoo bar\n");
        let t0 = Instant::now();
        s.click(0, 6, t0);
        assert_eq!(s.cursor(), Position::new(0, 3));
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn click_snaps_inside_leading_tabs() {
        let mut s = state("\t\tx\n");
        let t0 = Instant::now();
        s.click(0, 1, t0);
        assert_eq!(s.cursor().col, 0);
        s.click(0, 3, t0 + Duration::from_secs(5));
        assert_eq!(s.cursor().col, 1);
    }

    #[test]
    fn click_below_last_line_clamps() {
        let mut s = state("ab\n");
        s.set_page_size(10);
        s.click(8, 40, Instant::now());
        assert_eq!(s.cursor(), Position::new(1, 0));
    }

    #[test]
    fn double_then_triple_then_cancel() {
        let mut s = state("let value = 1\n");
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        assert_eq!(s.click(0, 5, t0), 1);
        assert_eq!(s.click(0, 5, t0 + ms(100)), 2);
        assert_eq!(
            s.selection(),
            Some(Selection {
                row: 0,
                start: 4,
                end: 9
            })
        );
        assert_eq!(s.cursor(), Position::new(0, 9));
        assert_eq!(s.click(0, 5, t0 + ms(200)), 3);
        assert_eq!(s.selection().map(|sel| (sel.start, sel.end)), Some((0, 13)));
        assert_eq!(s.click(0, 5, t0 + ms(300)), 4);
        assert_eq!(s.selection(), None);
        assert_eq!(s.click(0, 5, t0 + ms(400)), 2, "counting restarts after a cancel");
    }

    #[test]
    fn typing_replaces_selection_as_one_step() {
        let mut s = state("let value = 1\n");
        let t0 = Instant::now();
        s.click(0, 5, t0);
        s.click(0, 5, t0 + Duration::from_millis(10));
        s.insert_char('v');
        assert_eq!(s.buffer().lines(), vec!["let v = 1", ""]);
        assert_eq!(s.cursor(), Position::new(0, 5));
        assert_eq!(s.selection(), None);
        s.undo();
        assert_eq!(s.buffer().lines(), vec!["let value = 1", ""]);
        assert_eq!(s.cursor(), Position::new(0, 9));
    }

    #[test]
    fn backspace_deletes_selection() {
        let mut s = state("abc def\n");
        let t0 = Instant::now();
        s.click(0, 0, t0);
        s.click(0, 0, t0 + Duration::from_millis(1));
        s.click(0, 0, t0 + Duration::from_millis(2));
        assert!(s.delete_left());
        assert_eq!(s.buffer().lines(), vec!["", ""]);
        assert_eq!(s.cursor(), Position::new(0, 0));
    }
}
