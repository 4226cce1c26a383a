//! Single-line prompt sharing the bottom row with the status bar.
//!
//! The bar is closed (and not focusable) until a [`PromptHandle`] opens it.
//! Opening requests focus; the surrounding `Switch` then shows the prompt
//! instead of the status bar. Losing focus closes it again, so focus is the
//! only state the shell has to manage.
//!
//! Every mode acts on whichever tab is active when the key arrives.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use core_actions::save;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_model::{Ctx, View, ViewBase, ViewId};
use core_state::EditorState;
use core_terminal::{CellStyle, Surface};
use tracing::{debug, warn};

use crate::{Tabs, Theme};

/// Hints drawn right-aligned while the find prompt is open.
pub const FIND_HINTS: &str = "[enter] next | [ctrl+n] next | [ctrl+p] previous | [esc] cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Find,
    Goto,
    SaveAs,
}

impl PromptMode {
    pub fn label(self) -> &'static str {
        match self {
            PromptMode::Find => "find:",
            PromptMode::Goto => "goto line:",
            PromptMode::SaveAs => "save as:",
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PromptMode::Find => "find",
            PromptMode::Goto => "goto",
            PromptMode::SaveAs => "save_as",
        })
    }
}

#[derive(Debug, Default)]
struct PromptInner {
    mode: Option<PromptMode>,
    input: String,
    message: Option<String>,
}

/// Opens the prompt from outside the view tree (global key handlers).
#[derive(Clone)]
pub struct PromptHandle {
    id: ViewId,
    inner: Rc<RefCell<PromptInner>>,
    tabs: Tabs,
}

impl PromptHandle {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn mode(&self) -> Option<PromptMode> {
        self.inner.borrow().mode
    }

    pub fn is_open(&self) -> bool {
        self.mode().is_some()
    }

    pub fn message(&self) -> Option<String> {
        self.inner.borrow().message.clone()
    }

    /// Open in `mode` with an empty input and move focus to the prompt.
    pub fn open(&self, mode: PromptMode, ctx: &mut Ctx) {
        self.open_with_message(mode, None, ctx);
    }

    /// Like [`PromptHandle::open`], showing `message` after the input until
    /// the next key.
    pub fn open_with_message(&self, mode: PromptMode, message: Option<String>, ctx: &mut Ctx) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.mode = Some(mode);
            inner.input.clear();
            inner.message = message;
        }
        if mode == PromptMode::Find {
            self.tabs.active_state().borrow_mut().begin_search();
        }
        debug!(target: "view.focus", %mode, "prompt_open");
        ctx.request_focus(self.id);
    }
}

pub struct PromptBar {
    base: ViewBase,
    inner: Rc<RefCell<PromptInner>>,
    tabs: Tabs,
    editor: ViewId,
    theme: Theme,
}

impl PromptBar {
    /// A closed prompt acting on the active tab of `tabs`; focus returns to
    /// `editor` when it finishes.
    pub fn new(tabs: Tabs, editor: ViewId, theme: Theme) -> Self {
        Self {
            base: ViewBase::fixed(1),
            inner: Rc::new(RefCell::new(PromptInner::default())),
            tabs,
            editor,
            theme,
        }
    }

    pub fn handle(&self) -> PromptHandle {
        PromptHandle {
            id: self.base.id,
            inner: Rc::clone(&self.inner),
            tabs: self.tabs.clone(),
        }
    }

    fn state(&self) -> Rc<RefCell<EditorState>> {
        self.tabs.active_state()
    }

    pub fn input(&self) -> String {
        self.inner.borrow().input.clone()
    }

    pub fn message(&self) -> Option<String> {
        self.inner.borrow().message.clone()
    }

    fn mode(&self) -> Option<PromptMode> {
        self.inner.borrow().mode
    }

    fn finish(&self, ctx: &mut Ctx) {
        ctx.request_focus(self.editor);
    }

    fn push_str(&self, mode: PromptMode, text: &str) -> bool {
        let accepted: String = match mode {
            PromptMode::Goto => text.chars().filter(char::is_ascii_digit).collect(),
            _ => text.chars().filter(|c| !c.is_control()).collect(),
        };
        if accepted.is_empty() {
            return false;
        }
        let key = {
            let mut inner = self.inner.borrow_mut();
            inner.message = None;
            inner.input.push_str(&accepted);
            inner.input.clone()
        };
        if mode == PromptMode::Find {
            self.state().borrow_mut().find(&key);
        }
        true
    }

    fn backspace(&self, mode: PromptMode) {
        let key = {
            let mut inner = self.inner.borrow_mut();
            inner.message = None;
            if inner.input.pop().is_none() {
                return;
            }
            inner.input.clone()
        };
        if mode != PromptMode::Find {
            return;
        }
        let state = self.state();
        let mut state = state.borrow_mut();
        if key.is_empty() {
            state.clear_search();
        } else {
            state.find(&key);
        }
    }

    fn submit(&self, mode: PromptMode, ctx: &mut Ctx) {
        let input = self.input();
        match mode {
            PromptMode::Find => {
                self.state().borrow_mut().find_next();
            }
            PromptMode::Goto => {
                let Ok(line) = input.parse::<usize>() else {
                    debug!(target: "view.dispatch", len = input.len(), "goto_unparsable");
                    return;
                };
                if self.state().borrow_mut().goto_line(line) {
                    self.finish(ctx);
                }
            }
            PromptMode::SaveAs => {
                if input.is_empty() {
                    return;
                }
                let result = save(&mut self.state().borrow_mut(), Some(Path::new(&input)));
                match result {
                    Ok(_) => self.finish(ctx),
                    Err(err) => {
                        warn!(target: "io", error = %err, "save_as_failed");
                        self.inner.borrow_mut().message = Some(err.to_string());
                    }
                }
            }
        }
    }

    fn cancel(&self, mode: PromptMode, ctx: &mut Ctx) {
        if mode == PromptMode::Find {
            self.state().borrow_mut().clear_search();
        }
        self.finish(ctx);
    }

    fn style(&self, mode: PromptMode) -> CellStyle {
        match mode {
            PromptMode::Find => self.theme.find_prompt,
            PromptMode::Goto | PromptMode::SaveAs => self.theme.prompt,
        }
    }

    fn input_x(&self, mode: PromptMode) -> u16 {
        let r = self.base.rect;
        r.x.saturating_add(mode.label().chars().count() as u16 + 2)
    }
}

impl View for PromptBar {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn focusable(&self) -> bool {
        self.mode().is_some()
    }

    fn on_blur(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(mode) = inner.mode.take() {
            debug!(target: "view.focus", %mode, "prompt_closed");
        }
        inner.input.clear();
        inner.message = None;
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let r = self.base.rect;
        let Some(mode) = self.mode() else {
            surface.fill(r.x, r.y, r.width, r.height, CellStyle::default());
            return;
        };
        if r.is_empty() {
            return;
        }
        let style = self.style(mode);
        let max_x = r.right();
        surface.fill(r.x, r.y, r.width, 1, style);
        surface.put_str(r.x + 1, r.y, max_x, mode.label(), style);
        let inner = self.inner.borrow();
        let mut x = surface.put_str(self.input_x(mode), r.y, max_x, &inner.input, style);
        if let Some(message) = &inner.message {
            x = surface.put_str(x.saturating_add(2), r.y, max_x, message, self.theme.prompt_error);
        }
        if mode == PromptMode::Find {
            let hints = FIND_HINTS.chars().count() as u16;
            if let Some(start) = max_x.checked_sub(hints + 1) {
                if start > x {
                    surface.put_str(start, r.y, max_x, FIND_HINTS, style);
                }
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut Ctx) -> bool {
        let Some(mode) = self.mode() else {
            return false;
        };
        if let Some(c) = key.printable() {
            self.push_str(mode, c.encode_utf8(&mut [0; 4]));
            return true;
        }
        let ctrl = key.mods.contains(KeyModifiers::CTRL);
        match key.code {
            KeyCode::Esc => self.cancel(mode, ctx),
            KeyCode::Enter => self.submit(mode, ctx),
            KeyCode::Backspace => self.backspace(mode),
            KeyCode::Char('n') if ctrl && mode == PromptMode::Find => {
                self.state().borrow_mut().find_next();
            }
            KeyCode::Char('p') if ctrl && mode == PromptMode::Find => {
                self.state().borrow_mut().find_prev();
            }
            _ => return false,
        }
        true
    }

    fn handle_paste(&mut self, text: &str, _ctx: &mut Ctx) -> bool {
        let Some(mode) = self.mode() else {
            return false;
        };
        let first_line = text.lines().next().unwrap_or_default();
        self.push_str(mode, first_line)
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        let mode = self.mode()?;
        let r = self.base.rect;
        let len = self.inner.borrow().input.chars().count() as u16;
        let x = self.input_x(mode).saturating_add(len);
        (x < r.right() && !r.is_empty()).then_some((x, r.y))
    }
}
