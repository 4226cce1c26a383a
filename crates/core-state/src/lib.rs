//! Editing engine state for one open buffer.
//!
//! [`EditorState`] owns the [`Buffer`], the cursor, the viewport and the
//! [`UndoEngine`]. Every buffer mutation after load goes through
//! [`EditorState::commit`], which records it as one undoable group; cursor
//! movements on their own are not recorded.
//!
//! Coordinates: rows and columns are 0-based code point indices. The
//! viewport `top` and everything shown to the user (status line, goto) are
//! 1-based. Public operations clamp their position arguments before handing
//! them to `core-text`, which only debug-asserts.
//!
//! Observers (status bar, title bar) subscribe to the [`Binding`]s returned
//! by [`EditorState::status`] and [`EditorState::title`]. Both are refreshed
//! by [`EditorState::publish`] at the end of every operation that can change
//! them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use core_syntax::{CompletionIndex, DEFAULT_MAX_CANDIDATES, Language};
use core_text::{Buffer, Position, leading_tabs, pad_col, unpad_col};
use tracing::{debug, trace};

pub mod binding;
pub mod completion;
pub mod search;
pub mod selection;
pub mod undo;

pub use binding::Binding;
pub use completion::CompletionSession;
pub use search::{SearchState, find_matches, nearest_match};
pub use selection::{ClickTracker, DEFAULT_MULTI_CLICK, Selection};
pub use undo::{Action, UndoEngine};

/// Title shown for a buffer without a file name.
pub const UNTITLED: &str = "untitled";

pub struct EditorState {
    buffer: Buffer,
    cursor: Position,
    top: usize,
    page_size: usize,
    undo: UndoEngine,
    dirty: bool,
    // History depth at the last load or save; `None` once that point is unreachable.
    clean_depth: Option<usize>,
    file_name: Option<PathBuf>,
    language: &'static Language,
    search: SearchState,
    selection: Option<Selection>,
    clicks: ClickTracker,
    completion: Option<CompletionSession>,
    index: CompletionIndex,
    max_candidates: usize,
    status: Binding<String>,
    title: Binding<String>,
}

impl EditorState {
    /// State over `buffer` feeding the process-wide completion index.
    pub fn new(buffer: Buffer) -> Self {
        Self::with_index(buffer, CompletionIndex::global())
    }

    pub fn with_index(buffer: Buffer, index: CompletionIndex) -> Self {
        let mut state = Self {
            buffer,
            cursor: Position::origin(),
            top: 1,
            page_size: 1,
            undo: UndoEngine::new(),
            dirty: false,
            clean_depth: Some(0),
            file_name: None,
            language: Language::for_path(None),
            search: SearchState::default(),
            selection: None,
            clicks: ClickTracker::new(DEFAULT_MULTI_CLICK),
            completion: None,
            index,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            status: Binding::new(String::new()),
            title: Binding::new(String::new()),
        };
        state.publish();
        state
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// First visible line, 1-based.
    pub fn top(&self) -> usize {
        self.top
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn language(&self) -> &'static Language {
        self.language
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn history(&self) -> &UndoEngine {
        &self.undo
    }

    pub fn completion_index(&self) -> &CompletionIndex {
        &self.index
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Observable "line N, column M" string.
    pub fn status(&self) -> &Binding<String> {
        &self.status
    }

    /// Publish status into `status` from now on, so several editors can feed
    /// one status bar. The caller republishes when this editor becomes the
    /// one on show.
    pub fn share_status(&mut self, status: Binding<String>) {
        self.status = status;
    }

    /// Observable buffer title: file name (or [`UNTITLED`]) plus ` *` when dirty.
    pub fn title(&self) -> &Binding<String> {
        &self.title
    }

    /// Bind the buffer to `name`. The language table follows the extension.
    pub fn set_file_name(&mut self, name: Option<PathBuf>) {
        self.language = Language::for_path(name.as_deref());
        self.file_name = name;
        debug!(target: "state", language = self.language.name, "file_name_set");
        self.publish();
    }

    /// Visible row count (at least 1). Re-clamps `top`.
    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
        self.top = self.top.min(self.max_top());
    }

    /// `0` selects [`DEFAULT_MAX_CANDIDATES`].
    pub fn set_max_candidates(&mut self, max: usize) {
        self.max_candidates = if max == 0 { DEFAULT_MAX_CANDIDATES } else { max };
    }

    pub fn set_multi_click_window(&mut self, window: Duration) {
        self.clicks = ClickTracker::new(window);
    }

    /// Largest permitted `top`: `max(1, line_count - page_size + 1)`.
    pub fn max_top(&self) -> usize {
        (self.line_count() + 1).saturating_sub(self.page_size).max(1)
    }

    /// Whether `row` (0-based) lies inside the viewport.
    pub fn is_row_visible(&self, row: usize) -> bool {
        row + 1 >= self.top && row + 1 < self.top + self.page_size
    }

    /// Move the viewport up. Returns whether it moved.
    pub fn scroll_up(&mut self, delta: usize) -> bool {
        let next = self.top.saturating_sub(delta).max(1);
        self.set_top(next)
    }

    /// Move the viewport down, never past [`EditorState::max_top`].
    /// Returns whether it moved.
    pub fn scroll_down(&mut self, delta: usize) -> bool {
        let next = self.top.saturating_add(delta).min(self.max_top());
        if next <= self.top {
            return false;
        }
        self.set_top(next)
    }

    fn set_top(&mut self, top: usize) -> bool {
        if top == self.top {
            return false;
        }
        trace!(target: "state.viewport", from = self.top, to = top, "scroll");
        self.top = top;
        true
    }

    /// Scroll the minimum needed to show the cursor row.
    pub fn ensure_cursor_visible(&mut self) -> bool {
        let row = self.cursor.row + 1;
        if row < self.top {
            self.set_top(row)
        } else if row >= self.top + self.page_size {
            self.set_top(row + 1 - self.page_size)
        } else {
            false
        }
    }

    /// Show `row`: scroll up just enough if it is above the viewport,
    /// re-center on it if it is below.
    pub(crate) fn reveal_row(&mut self, row: usize) -> bool {
        let line = row + 1;
        if line < self.top {
            self.set_top(line)
        } else if line >= self.top + self.page_size {
            let centered = line.saturating_sub(self.page_size / 2).max(1);
            self.set_top(centered.min(self.max_top()))
        } else {
            false
        }
    }

    /// Place the cursor at `pos` (clamped). Returns whether the viewport moved.
    pub fn move_to(&mut self, pos: Position) -> bool {
        self.cursor = self.buffer.clamp(pos);
        self.after_move()
    }

    fn after_move(&mut self) -> bool {
        self.selection = None;
        let scrolled = self.ensure_cursor_visible();
        self.publish();
        scrolled
    }

    /// Up one row, keeping the display column.
    pub fn move_up(&mut self) -> bool {
        if self.cursor.row == 0 {
            return false;
        }
        let display = pad_col(&self.buffer.line_chars(self.cursor.row), self.cursor.col);
        let row = self.cursor.row - 1;
        self.cursor = Position::new(row, unpad_col(&self.buffer.line_chars(row), display));
        self.after_move()
    }

    /// Down one row, keeping the display column.
    pub fn move_down(&mut self) -> bool {
        if self.cursor.row + 1 >= self.line_count() {
            return false;
        }
        let display = pad_col(&self.buffer.line_chars(self.cursor.row), self.cursor.col);
        let row = self.cursor.row + 1;
        self.cursor = Position::new(row, unpad_col(&self.buffer.line_chars(row), display));
        self.after_move()
    }

    /// Left one column, wrapping to the end of the previous line.
    pub fn move_left(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        self.cursor = if col > 0 {
            Position::new(row, col - 1)
        } else if row > 0 {
            Position::new(row - 1, self.buffer.line_len(row - 1))
        } else {
            return false;
        };
        self.after_move()
    }

    /// Right one column, wrapping to the start of the next line.
    pub fn move_right(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        self.cursor = if col < self.buffer.line_len(row) {
            Position::new(row, col + 1)
        } else if row + 1 < self.line_count() {
            Position::new(row + 1, 0)
        } else {
            return false;
        };
        self.after_move()
    }

    /// First column after the leading tab run.
    pub fn move_home(&mut self) -> bool {
        let tabs = leading_tabs(&self.buffer.line_chars(self.cursor.row));
        self.cursor.col = tabs;
        self.after_move()
    }

    pub fn move_end(&mut self) -> bool {
        self.cursor.col = self.buffer.line_len(self.cursor.row);
        self.after_move()
    }

    fn page_step(&self) -> usize {
        self.page_size.saturating_sub(1).max(1)
    }

    /// Scroll up one page minus one line and carry the cursor with it.
    pub fn page_up(&mut self) -> bool {
        let step = self.page_step();
        let scrolled = self.scroll_up(step);
        self.cursor = Position::new(self.cursor.row.saturating_sub(step), 0);
        self.after_move() || scrolled
    }

    /// Scroll down one page minus one line and carry the cursor with it.
    pub fn page_down(&mut self) -> bool {
        let step = self.page_step();
        let scrolled = self.scroll_down(step);
        let row = (self.cursor.row + step).min(self.line_count() - 1);
        self.cursor = Position::new(row, 0);
        self.after_move() || scrolled
    }

    /// Jump to a 1-based line, centering it. Out-of-range lines are ignored.
    pub fn goto_line(&mut self, line: usize) -> bool {
        if line == 0 || line > self.line_count() {
            debug!(target: "state", line, line_count = self.line_count(), "goto_out_of_range");
            return false;
        }
        self.cursor = Position::new(line - 1, 0);
        self.selection = None;
        let centered = line.saturating_sub(self.page_size / 2).max(1);
        self.set_top(centered.min(self.max_top()));
        self.publish();
        true
    }

    /// Apply `actions` as one undoable group and refresh derived state.
    pub fn commit(&mut self, actions: Vec<Action>) {
        let mutates = actions.iter().any(Action::mutates_buffer);
        if self.clean_depth > Some(self.undo.undo_depth()) {
            self.clean_depth = None;
        }
        self.undo.commit(actions, &mut self.buffer, &mut self.cursor);
        if mutates {
            self.dirty = true;
        }
        self.selection = None;
        self.after_edit();
    }

    fn after_edit(&mut self) {
        self.refresh_search();
        self.top = self.top.min(self.max_top());
        self.ensure_cursor_visible();
        self.publish();
    }

    /// Insert `text` at `pos` (clamped) and leave the cursor after it.
    /// Returns the end position.
    pub fn insert_at(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.buffer.clamp(pos);
        if text.is_empty() {
            return pos;
        }
        let end = pos.advanced_by(text);
        self.commit(vec![
            Action::insert(pos, text),
            Action::move_cursor(self.cursor, end),
        ]);
        end
    }

    /// Remove `[start, stop)` (clamped, either order) and leave the cursor at
    /// the start. Returns the removed text.
    pub fn delete_range(&mut self, start: Position, stop: Position) -> String {
        let (a, b) = {
            let (a, b) = (self.buffer.clamp(start), self.buffer.clamp(stop));
            if a <= b { (a, b) } else { (b, a) }
        };
        if a == b {
            return String::new();
        }
        let removed = self.buffer.slice(a, b);
        self.commit(vec![
            Action::delete(&self.buffer, a, b),
            Action::move_cursor(self.cursor, a),
        ]);
        removed
    }

    /// Type one character, replacing the selection if there is one.
    pub fn insert_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut utf8));
    }

    /// Insert `text` at the cursor, replacing the selection if there is one.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let from = self.cursor;
        let mut actions = Vec::with_capacity(3);
        let at = match self.selection.take() {
            Some(sel) => {
                let (a, b) = sel.range();
                actions.push(Action::delete(&self.buffer, a, b));
                a
            }
            None => from,
        };
        actions.push(Action::insert(at, text));
        actions.push(Action::move_cursor(from, at.advanced_by(text)));
        self.commit(actions);
        self.refresh_suggestions();
    }

    /// Split the line at the cursor. The new line starts with the current
    /// line's leading tabs, plus one if the cursor follows an opening bracket.
    pub fn insert_newline(&mut self) {
        let line = self.buffer.line_chars(self.cursor.row);
        let mut indent = leading_tabs(&line);
        if self.cursor.col > 0 && matches!(line.get(self.cursor.col - 1), Some('(' | '{' | '[')) {
            indent += 1;
        }
        let mut text = String::with_capacity(indent + 1);
        text.push('\n');
        text.extend(std::iter::repeat_n('\t', indent));
        let to = Position::new(self.cursor.row + 1, indent);
        self.commit(vec![
            Action::insert(self.cursor, &text),
            Action::move_cursor(self.cursor, to),
        ]);
    }

    /// Backspace: remove the selection, the character left of the cursor,
    /// or the line break before it. No-op at the start of the buffer.
    pub fn delete_left(&mut self) -> bool {
        let from = self.cursor;
        let (start, stop) = if let Some(sel) = self.selection {
            sel.range()
        } else if from.col > 0 {
            (Position::new(from.row, from.col - 1), from)
        } else if from.row > 0 {
            let prev = from.row - 1;
            (Position::new(prev, self.buffer.line_len(prev)), from)
        } else {
            return false;
        };
        self.commit(vec![
            Action::delete(&self.buffer, start, stop),
            Action::move_cursor(from, start),
        ]);
        self.refresh_suggestions();
        true
    }

    pub fn delete_to_line_start(&mut self) -> bool {
        if self.cursor.col == 0 {
            return false;
        }
        self.delete_range(Position::new(self.cursor.row, 0), self.cursor);
        true
    }

    pub fn delete_to_line_end(&mut self) -> bool {
        let end = Position::new(self.cursor.row, self.buffer.line_len(self.cursor.row));
        if self.cursor == end {
            return false;
        }
        self.delete_range(self.cursor, end);
        true
    }

    pub fn undo(&mut self) -> bool {
        if !self.undo.undo(&mut self.buffer, &mut self.cursor) {
            return false;
        }
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.undo.redo(&mut self.buffer, &mut self.cursor) {
            return false;
        }
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.dirty = self.clean_depth != Some(self.undo.undo_depth());
        self.selection = None;
        self.completion = None;
        self.after_edit();
    }

    /// Make the buffer end with an empty line. Load-time normalization, not
    /// recorded in the undo log.
    pub fn normalize_trailing_line(&mut self) -> bool {
        let appended = self.buffer.ensure_trailing_newline();
        if appended {
            trace!(target: "state", "trailing_line_appended");
        }
        appended
    }

    /// Feed every line into the completion index. Returns the word count.
    pub fn index_buffer(&self) -> usize {
        let lines: Vec<Vec<char>> = (0..self.line_count())
            .map(|row| self.buffer.line_chars(row))
            .collect();
        self.index
            .index_lines(lines.iter().map(Vec::as_slice), self.language)
    }

    /// Clear the dirty flag after a load or a successful save.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
        self.clean_depth = Some(self.undo.undo_depth());
        self.publish();
    }

    /// Push the current status and title to their bindings.
    pub fn publish(&mut self) {
        let line = self.buffer.line_chars(self.cursor.row);
        let column = pad_col(&line, self.cursor.col) + 1;
        self.status
            .set(format!("line {}, column {}", self.cursor.row + 1, column));
        self.title.set(self.title_text());
    }

    fn title_text(&self) -> String {
        let mut title = match &self.file_name {
            Some(path) => path.display().to_string(),
            None => UNTITLED.to_string(),
        };
        if self.dirty {
            title.push_str(" *");
        }
        title
    }
}
