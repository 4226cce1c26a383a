//! Several open buffers behind one tab strip.
//!
//! [`Tabs`] is a shared handle over the open editors and the index of the
//! one on show; global key handlers and the prompt reach the active buffer
//! through it. [`EditorGroup`] is the view: row 0 is the tab strip, the rest
//! is the active [`EditorView`]. Every editor is laid out on the same area
//! so switching tabs never has to resize.
//!
//! All editors publish their cursor position into one status binding, and
//! the newly active one republishes on every switch.

use std::cell::RefCell;
use std::rc::Rc;

use core_events::KeyEvent;
use core_model::{Ctx, Rect, View, ViewBase};
use core_state::{Binding, EditorState};
use core_terminal::Surface;
use tracing::{debug, info};

use crate::{EditorView, Theme};

/// Drawn between two labels on the strip.
const TAB_SEPARATOR: &str = "|";

struct TabSet {
    editors: Vec<EditorView>,
    active: usize,
    status: Binding<String>,
    area: Rect,
    theme: Theme,
}

impl TabSet {
    fn active_editor(&mut self) -> &mut EditorView {
        &mut self.editors[self.active]
    }

    fn labels(&self) -> Vec<String> {
        self.editors
            .iter()
            .map(|e| e.state().borrow().title().get())
            .collect()
    }

    fn show(&mut self, index: usize) {
        self.active = index;
        self.editors[index].state().borrow_mut().publish();
    }
}

#[derive(Clone)]
pub struct Tabs {
    inner: Rc<RefCell<TabSet>>,
}

impl Tabs {
    /// A group showing `first`, whose status binding becomes the shared one.
    pub fn new(first: Rc<RefCell<EditorState>>, theme: Theme) -> Self {
        let status = first.borrow().status().clone();
        Self {
            inner: Rc::new(RefCell::new(TabSet {
                editors: vec![EditorView::new(first, theme)],
                active: 0,
                status,
                area: Rect::default(),
                theme,
            })),
        }
    }

    /// The status binding every tab publishes into.
    pub fn status(&self) -> Binding<String> {
        self.inner.borrow().status.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the tab on show.
    pub fn active(&self) -> usize {
        self.inner.borrow().active
    }

    pub fn active_state(&self) -> Rc<RefCell<EditorState>> {
        let set = self.inner.borrow();
        Rc::clone(set.editors[set.active].state())
    }

    pub fn state(&self, index: usize) -> Option<Rc<RefCell<EditorState>>> {
        self.inner
            .borrow()
            .editors
            .get(index)
            .map(|e| Rc::clone(e.state()))
    }

    /// Strip labels in tab order: file name (or `untitled`), ` *` when dirty.
    pub fn labels(&self) -> Vec<String> {
        self.inner.borrow().labels()
    }

    /// Show `state` in a new tab and make it active. A buffer bound to a
    /// file that is already open activates that tab instead and `state` is
    /// dropped. Returns the index now on show.
    pub fn open(&self, state: Rc<RefCell<EditorState>>) -> usize {
        let mut set = self.inner.borrow_mut();
        let existing = state.borrow().file_name().and_then(|name| {
            set.editors
                .iter()
                .position(|e| e.state().borrow().file_name() == Some(name))
        });
        if let Some(index) = existing {
            debug!(target: "view.tabs", index, "tab_already_open");
            set.show(index);
            return index;
        }
        state.borrow_mut().share_status(set.status.clone());
        let mut editor = EditorView::new(state, set.theme);
        if !set.area.is_empty() {
            editor.set_rect(set.area);
        }
        set.editors.push(editor);
        let index = set.editors.len() - 1;
        set.show(index);
        info!(target: "view.tabs", index, tabs = set.editors.len(), "tab_opened");
        index
    }

    /// Show tab `index`. False when it does not exist or is already active.
    pub fn activate(&self, index: usize) -> bool {
        let mut set = self.inner.borrow_mut();
        if index >= set.editors.len() || index == set.active {
            return false;
        }
        set.show(index);
        debug!(target: "view.tabs", index, "tab_activated");
        true
    }

    /// Close the active tab and show its neighbour (the next one, or the
    /// previous one when it was last). The last tab is never closed; false
    /// means there was nothing left to switch to.
    pub fn close_active(&self) -> bool {
        let mut set = self.inner.borrow_mut();
        if set.editors.len() <= 1 {
            return false;
        }
        let active = set.active;
        let closed = set.editors.remove(active);
        let dirty = closed.state().borrow().is_dirty();
        let next = active.min(set.editors.len() - 1);
        set.show(next);
        info!(target: "view.tabs", dirty, tabs = set.editors.len(), "tab_closed");
        true
    }
}

/// The tab strip plus the active editor.
pub struct EditorGroup {
    base: ViewBase,
    tabs: Tabs,
    theme: Theme,
}

impl EditorGroup {
    pub fn new(tabs: Tabs, theme: Theme) -> Self {
        Self {
            base: ViewBase::flexible(),
            tabs,
            theme,
        }
    }

    pub fn tabs(&self) -> &Tabs {
        &self.tabs
    }

    /// Tab under column `x` of the strip. Each tab owns its padded label
    /// and the separator after it.
    fn tab_at(&self, x: u16) -> Option<usize> {
        let mut start = self.base.rect.x;
        for (i, label) in self.tabs.labels().iter().enumerate() {
            let end = start.saturating_add(label.chars().count() as u16 + 3);
            if x >= start && x < end {
                return Some(i);
            }
            start = end;
        }
        None
    }

    fn draw_strip(&self, surface: &mut dyn Surface) {
        let r = self.base.rect;
        surface.fill(r.x, r.y, r.width, 1, self.theme.title);
        let labels = self.tabs.labels();
        let active = self.tabs.active();
        let mut x = r.x;
        for (i, label) in labels.iter().enumerate() {
            let style = if i == active {
                self.theme.tab_active
            } else {
                self.theme.title
            };
            x = surface.put_str(x, r.y, r.right(), &format!(" {label} "), style);
            if i + 1 < labels.len() {
                x = surface.put_str(x, r.y, r.right(), TAB_SEPARATOR, self.theme.title);
            }
        }
    }
}

impl View for EditorGroup {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn set_rect(&mut self, rect: Rect) {
        self.base.rect = rect;
        let area = Rect::new(
            rect.x,
            rect.y.saturating_add(1),
            rect.width,
            rect.height.saturating_sub(1),
        );
        let mut set = self.tabs.inner.borrow_mut();
        set.area = area;
        for editor in &mut set.editors {
            editor.set_rect(area);
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        if self.base.rect.is_empty() {
            return;
        }
        self.draw_strip(surface);
        self.tabs.inner.borrow_mut().active_editor().draw(surface);
    }

    fn local_binding(&mut self, key: &KeyEvent, ctx: &mut Ctx) -> bool {
        self.tabs.inner.borrow_mut().active_editor().local_binding(key, ctx)
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut Ctx) -> bool {
        self.tabs.inner.borrow_mut().active_editor().handle_key(key, ctx)
    }

    fn handle_paste(&mut self, text: &str, ctx: &mut Ctx) -> bool {
        self.tabs.inner.borrow_mut().active_editor().handle_paste(text, ctx)
    }

    fn click(&mut self, x: u16, y: u16, ctx: &mut Ctx) -> bool {
        if y == self.base.rect.y {
            return match self.tab_at(x) {
                Some(index) => self.tabs.activate(index),
                None => false,
            };
        }
        self.tabs.inner.borrow_mut().active_editor().click(x, y, ctx)
    }

    fn scroll_up(&mut self, delta: usize) -> bool {
        self.tabs.inner.borrow_mut().active_editor().scroll_up(delta)
    }

    fn scroll_down(&mut self, delta: usize) -> bool {
        self.tabs.inner.borrow_mut().active_editor().scroll_down(delta)
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        let set = self.tabs.inner.borrow();
        set.editors[set.active].cursor()
    }
}
