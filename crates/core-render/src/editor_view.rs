//! The editing surface: line-number gutter, highlighted text, search and
//! selection overlays, and the completion popup.
//!
//! The view does not own the editor state; it shares it with the bars and
//! the shell through `Rc<RefCell<_>>`. Its height is the editor's page size.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use core_actions::{DispatchResult, EditAction, PopupLayout, default_bindings, dispatch, translate_key};
use core_events::KeyEvent;
use core_keymap::Keymap;
use core_model::{Ctx, Rect, View, ViewBase};
use core_state::EditorState;
use core_syntax::{token_at, tokenize};
use core_terminal::Surface;
use core_text::{TAB_WIDTH, leading_tabs, pad_col};
use tracing::trace;

use crate::Theme;

/// Columns taken by one popup entry.
pub const POPUP_WIDTH: u16 = 40;

/// Gutter columns for a buffer of `line_count` lines: the digit count plus
/// two (one column of padding on each side of the numbers).
pub fn gutter_width(line_count: usize) -> u16 {
    let mut digits = 1u16;
    let mut n = line_count / 10;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits + 2
}

pub struct EditorView {
    base: ViewBase,
    state: Rc<RefCell<EditorState>>,
    bindings: Keymap<EditAction>,
    theme: Theme,
}

impl EditorView {
    pub fn new(state: Rc<RefCell<EditorState>>, theme: Theme) -> Self {
        Self {
            base: ViewBase::flexible(),
            state,
            bindings: default_bindings(),
            theme,
        }
    }

    pub fn state(&self) -> &Rc<RefCell<EditorState>> {
        &self.state
    }

    /// Add or replace a binding in the surface's own key table.
    pub fn bind(&mut self, key: KeyEvent, action: EditAction) -> Option<EditAction> {
        self.bindings.bind(key, action)
    }

    fn text_x(&self, state: &EditorState) -> u16 {
        let r = self.base.rect;
        r.x.saturating_add(gutter_width(state.line_count()).min(r.width))
    }

    /// Row of the viewport the cursor sits on, if it is visible.
    fn cursor_screen_row(&self, state: &EditorState) -> Option<u16> {
        let row = state.cursor().row;
        if !state.is_row_visible(row) {
            return None;
        }
        let offset = u16::try_from(row + 1 - state.top()).ok()?;
        (offset < self.base.rect.height).then(|| self.base.rect.y + offset)
    }

    /// Below the cursor if every candidate fits there, else above it.
    fn popup_layout(&self, state: &EditorState) -> PopupLayout {
        let Some(session) = state.completion() else {
            return PopupLayout::Below;
        };
        let Some(cy) = self.cursor_screen_row(state) else {
            return PopupLayout::Below;
        };
        let last_row = self.base.rect.bottom().saturating_sub(1);
        if usize::from(last_row - cy) >= session.candidates.len() {
            PopupLayout::Below
        } else {
            PopupLayout::Above
        }
    }

    fn apply(&self, action: EditAction) -> DispatchResult {
        let mut state = self.state.borrow_mut();
        let popup = self.popup_layout(&state);
        dispatch(action, &mut state, popup)
    }

    fn draw_gutter(&self, surface: &mut dyn Surface, state: &EditorState, gutter: u16) {
        let r = self.base.rect;
        surface.fill(r.x, r.y, gutter, r.height, self.theme.gutter);
        // numbers end one column before the text
        let end = r.x + gutter.saturating_sub(1);
        for i in 0..r.height {
            let row = state.top() - 1 + usize::from(i);
            if row >= state.line_count() {
                break;
            }
            let label = (row + 1).to_string();
            let start = end.saturating_sub(label.len() as u16).max(r.x);
            surface.put_str(start, r.y + i, end, &label, self.theme.gutter);
        }
    }

    fn draw_line(&self, surface: &mut dyn Surface, state: &EditorState, row: usize, y: u16) {
        let text_x = self.text_x(state);
        let max_x = self.base.rect.right();
        let line = state.buffer().line_chars(row);
        let language = state.language();
        let tokens = if language.highlight {
            tokenize(&line, language)
        } else {
            Vec::new()
        };
        let tabs = leading_tabs(&line);
        let search = state.search();
        let key_len = search.key_len();
        let current = search.current_index();
        let matches: Vec<(usize, bool)> = search
            .matches()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.row == row)
            .map(|(i, m)| (m.col, Some(i) == current))
            .collect();
        let selection = state.selection();

        let mut x = text_x;
        for (col, &ch) in line.iter().enumerate() {
            if x >= max_x {
                break;
            }
            if col < tabs {
                let width = (TAB_WIDTH as u16).min(max_x - x);
                surface.fill(x, y, width, 1, self.theme.text);
                x += width;
                continue;
            }
            let mut style = token_at(&tokens, col)
                .map(|t| self.theme.token(t.class))
                .unwrap_or(self.theme.text);
            if let Some(&(_, is_current)) =
                matches.iter().find(|(start, _)| *start <= col && col < start + key_len)
            {
                style.bg = if is_current {
                    self.theme.search_current
                } else {
                    self.theme.search_match
                };
            }
            if selection.is_some_and(|s| s.contains(row, col)) {
                style.bg = self.theme.selection;
            }
            surface.set_cell(x, y, ch, style);
            x += 1;
        }
    }

    fn draw_popup(&self, surface: &mut dyn Surface, state: &EditorState) {
        let Some(session) = state.completion() else {
            return;
        };
        let Some(cy) = self.cursor_screen_row(state) else {
            return;
        };
        let r = self.base.rect;
        let line = state.buffer().line_chars(session.row);
        let anchor = self
            .text_x(state)
            .saturating_add(pad_col(&line, session.prefix_start) as u16);
        if anchor >= r.right() {
            return;
        }
        let max_x = anchor.saturating_add(POPUP_WIDTH).min(r.right());
        let layout = self.popup_layout(state);
        for (i, word) in session.candidates.iter().enumerate() {
            let offset = i as u16 + 1;
            let y = match layout {
                PopupLayout::Below => cy.checked_add(offset),
                PopupLayout::Above => cy.checked_sub(offset),
            };
            let Some(y) = y.filter(|&y| y >= r.y && y < r.bottom()) else {
                break;
            };
            let style = if i == session.selected {
                self.theme.popup_selected
            } else {
                self.theme.popup
            };
            surface.fill(anchor, y, max_x - anchor, 1, style);
            surface.put_str(anchor, y, max_x, word, style);
        }
    }
}

impl View for EditorView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn set_rect(&mut self, rect: Rect) {
        self.base.rect = rect;
        let mut state = self.state.borrow_mut();
        state.set_page_size(usize::from(rect.height));
        state.ensure_cursor_visible();
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let r = self.base.rect;
        if r.is_empty() {
            return;
        }
        let state = self.state.borrow();
        let gutter = gutter_width(state.line_count()).min(r.width);
        surface.fill(r.x + gutter, r.y, r.width - gutter, r.height, self.theme.text);
        self.draw_gutter(surface, &state, gutter);
        for i in 0..r.height {
            let row = state.top() - 1 + usize::from(i);
            if row >= state.line_count() {
                break;
            }
            self.draw_line(surface, &state, row, r.y + i);
        }
        self.draw_popup(surface, &state);
    }

    fn local_binding(&mut self, key: &KeyEvent, _ctx: &mut Ctx) -> bool {
        let Some(action) = self.bindings.get(key).cloned() else {
            return false;
        };
        self.apply(action);
        true
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &mut Ctx) -> bool {
        let Some(action) = translate_key(key) else {
            trace!(target: "view.dispatch", %key, "editor_key_unmapped");
            return false;
        };
        self.apply(action);
        true
    }

    fn handle_paste(&mut self, text: &str, _ctx: &mut Ctx) -> bool {
        self.apply(EditAction::Paste(text.to_owned())).dirty
    }

    fn click(&mut self, x: u16, y: u16, _ctx: &mut Ctx) -> bool {
        let r = self.base.rect;
        let mut state = self.state.borrow_mut();
        let text_x = self.text_x(&state);
        let visible_row = usize::from(y.saturating_sub(r.y));
        let display_col = usize::from(x.saturating_sub(text_x));
        state.click(visible_row, display_col, Instant::now());
        true
    }

    fn scroll_up(&mut self, delta: usize) -> bool {
        self.state.borrow_mut().scroll_up(delta)
    }

    fn scroll_down(&mut self, delta: usize) -> bool {
        self.state.borrow_mut().scroll_down(delta)
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        let state = self.state.borrow();
        let y = self.cursor_screen_row(&state)?;
        let cursor = state.cursor();
        let line = state.buffer().line_chars(cursor.row);
        let x = self
            .text_x(&state)
            .saturating_add(pad_col(&line, cursor.col) as u16);
        (x < self.base.rect.right()).then_some((x, y))
    }
}
