//! The focus root: owns the view tree, routes input and draws.
//!
//! Key dispatch order is fixed: the application-wide keymap, then the focused
//! view's own bindings, then its default key handler. Left clicks move focus
//! to the view under the pointer before the click is delivered. Wheel events
//! go to the view under the pointer without touching focus.

use core_events::{InputEvent, KeyEvent, MouseButton, MouseEvent, MouseEventKind, ShutdownSignal};
use core_keymap::Keymap;
use core_terminal::Surface;
use tracing::{debug, trace, warn};

use crate::{Rect, View, ViewId, find, find_mut, hit_test};

/// Rows per wheel notch are `pointer row * sensitivity`, never below one.
pub const DEFAULT_SCROLL_SENSITIVITY: f32 = 0.125;

/// Deferred work handlers ask of the app. Applied after the event that
/// produced them has been fully dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Focus(ViewId),
    Redraw,
}

/// Handed to every handler. Views cannot reach the tree they live in, so
/// anything that touches other views goes through here.
#[derive(Debug, Default)]
pub struct Ctx {
    shutdown: ShutdownSignal,
    requests: Vec<Request>,
}

impl Ctx {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self {
            shutdown,
            requests: Vec::new(),
        }
    }

    pub fn shutdown(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request();
    }

    pub fn request_focus(&mut self, id: ViewId) {
        self.requests.push(Request::Focus(id));
    }

    pub fn request_redraw(&mut self) {
        self.requests.push(Request::Redraw);
    }

    fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }
}

pub type GlobalHandler = Box<dyn FnMut(&mut Ctx)>;

pub struct App {
    root: Box<dyn View>,
    focus: Option<ViewId>,
    keymap: Keymap<GlobalHandler>,
    ctx: Ctx,
    last_mouse: Option<(u16, u16)>,
    scroll_sensitivity: f32,
}

impl App {
    pub fn new(root: Box<dyn View>, keymap: Keymap<GlobalHandler>, shutdown: ShutdownSignal) -> Self {
        Self {
            root,
            focus: None,
            keymap,
            ctx: Ctx::new(shutdown),
            last_mouse: None,
            scroll_sensitivity: DEFAULT_SCROLL_SENSITIVITY,
        }
    }

    pub fn root(&self) -> &dyn View {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> &mut dyn View {
        self.root.as_mut()
    }

    pub fn set_scroll_sensitivity(&mut self, sensitivity: f32) {
        self.scroll_sensitivity = sensitivity;
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focus
    }

    /// Last pointer position seen, in absolute cells.
    pub fn last_mouse(&self) -> Option<(u16, u16)> {
        self.last_mouse
    }

    /// Move focus to `id`: the previous holder is blurred first, then the
    /// target is focused. Returns false when focus did not change.
    pub fn focus(&mut self, id: ViewId) -> bool {
        if self.focus == Some(id) {
            return false;
        }
        match find(self.root.as_ref(), id) {
            Some(view) if view.focusable() => {}
            Some(_) => {
                trace!(target: "view.focus", ?id, "focus_not_focusable");
                return false;
            }
            None => {
                warn!(target: "view.focus", ?id, "focus_unknown_view");
                return false;
            }
        }
        let previous = self.focus.take();
        if let Some(prev) = previous
            && let Some(view) = find_mut(self.root.as_mut(), prev)
        {
            view.base_mut().focused = false;
            view.on_blur();
        }
        if let Some(view) = find_mut(self.root.as_mut(), id) {
            view.base_mut().focused = true;
            view.on_focus();
        }
        self.focus = Some(id);
        debug!(target: "view.focus", from = ?previous, to = ?id, "focus_changed");
        true
    }

    /// Give the root the whole terminal.
    pub fn resize(&mut self, width: u16, height: u16) {
        debug!(target: "view.dispatch", width, height, "resize");
        self.root.set_rect(Rect::new(0, 0, width, height));
    }

    /// Draw the tree, then place the terminal cursor where the focused view
    /// wants it (hidden if it wants none). Does not flush.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        self.root.draw(surface);
        let cursor = self
            .focus
            .and_then(|id| find(self.root.as_ref(), id))
            .and_then(|view| view.cursor());
        match cursor {
            Some((x, y)) => surface.show_cursor(x, y),
            None => surface.hide_cursor(),
        }
    }

    /// Route one input event. Returns whether anything changed that needs a
    /// redraw.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        let handled = match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize(width, height) => {
                self.resize(*width, *height);
                true
            }
            InputEvent::Paste(text) => self.handle_paste(text),
        };
        self.apply_requests() || handled
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if let Some(handler) = self.keymap.get_mut(key) {
            trace!(target: "view.dispatch", %key, route = "global", "key");
            handler(&mut self.ctx);
            return true;
        }
        let Some(id) = self.focus else {
            trace!(target: "view.dispatch", %key, "key_without_focus");
            return false;
        };
        let Some(view) = find_mut(self.root.as_mut(), id) else {
            warn!(target: "view.dispatch", ?id, "focused_view_missing");
            return false;
        };
        if view.local_binding(key, &mut self.ctx) {
            trace!(target: "view.dispatch", %key, route = "local", "key");
            return true;
        }
        let consumed = view.handle_key(key, &mut self.ctx);
        trace!(target: "view.dispatch", %key, route = "default", consumed, "key");
        consumed
    }

    fn handle_paste(&mut self, text: &str) -> bool {
        trace!(target: "view.dispatch", len = text.len(), "paste");
        let Some(id) = self.focus else {
            return false;
        };
        match find_mut(self.root.as_mut(), id) {
            Some(view) => view.handle_paste(text, &mut self.ctx),
            None => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let (x, y) = (mouse.column, mouse.row);
        self.last_mouse = Some((x, y));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(id) = hit_test(self.root.as_ref(), x, y) else {
                    return false;
                };
                trace!(target: "view.dispatch", x, y, ?id, "click");
                let refocused = self.focus(id);
                let clicked = match find_mut(self.root.as_mut(), id) {
                    Some(view) => view.click(x, y, &mut self.ctx),
                    None => false,
                };
                refocused || clicked
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let Some(id) = hit_test(self.root.as_ref(), x, y) else {
                    return false;
                };
                let delta = self.wheel_delta(y);
                trace!(target: "view.dispatch", ?id, delta, "wheel");
                let Some(view) = find_mut(self.root.as_mut(), id) else {
                    return false;
                };
                if mouse.kind == MouseEventKind::ScrollUp {
                    view.scroll_up(delta)
                } else {
                    view.scroll_down(delta)
                }
            }
            _ => {
                let Some(id) = self.focus else {
                    return false;
                };
                match find_mut(self.root.as_mut(), id) {
                    Some(view) => view.mouse(mouse, &mut self.ctx),
                    None => false,
                }
            }
        }
    }

    fn wheel_delta(&self, row: u16) -> usize {
        ((f32::from(row) * self.scroll_sensitivity) as usize).max(1)
    }

    fn apply_requests(&mut self) -> bool {
        let mut redraw = false;
        for request in self.ctx.take_requests() {
            match request {
                Request::Focus(id) => redraw |= self.focus(id),
                Request::Redraw => redraw = true,
            }
        }
        redraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Probe;
    use crate::{ViewBase, VStack};
    use core_events::{KeyCode, KeyModifiers};
    use core_terminal::MemorySurface;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        app: App,
        log: Rc<RefCell<Vec<String>>>,
        top: ViewId,
        bottom: ViewId,
        shutdown: ShutdownSignal,
    }

    fn fixture(keymap: Keymap<GlobalHandler>) -> Fixture {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut top = Probe::new(ViewBase::flexible(), 'a', &log);
        top.local_key = Some(KeyEvent::plain(KeyCode::Tab));
        let bottom = Probe::new(ViewBase::fixed(1), 'b', &log);
        let (top_id, bottom_id) = (top.base.id, bottom.base.id);
        let root = VStack::new(vec![Box::new(top), Box::new(bottom)]);
        let shutdown = ShutdownSignal::new();
        let mut app = App::new(Box::new(root), keymap, shutdown.clone());
        app.resize(10, 20);
        Fixture {
            app,
            log,
            top: top_id,
            bottom: bottom_id,
            shutdown,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            mods: KeyModifiers::empty(),
        })
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::plain(code))
    }

    #[test]
    fn focus_blurs_previous_before_focusing_next() {
        let mut f = fixture(Keymap::new());
        assert!(f.app.focus(f.top));
        assert!(!f.app.focus(f.top), "refocusing is a no-op");
        assert!(f.app.focus(f.bottom));
        assert_eq!(*f.log.borrow(), vec!["a:focus", "a:blur", "b:focus"]);
        assert_eq!(f.app.focused(), Some(f.bottom));
        assert!(find(f.app.root(), f.bottom).is_some_and(|v| v.base().focused));
        assert!(find(f.app.root(), f.top).is_some_and(|v| !v.base().focused));
    }

    #[test]
    fn containers_and_unknown_ids_cannot_take_focus() {
        let mut f = fixture(Keymap::new());
        let root_id = f.app.root().id();
        assert!(!f.app.focus(root_id));
        assert!(!f.app.focus(ViewId::next()));
        assert_eq!(f.app.focused(), None);
    }

    #[test]
    fn global_binding_wins_over_focused_view() {
        let mut keymap: Keymap<GlobalHandler> = Keymap::new();
        keymap.bind(KeyEvent::ctrl('q'), Box::new(|ctx: &mut Ctx| ctx.request_shutdown()));
        let mut f = fixture(keymap);
        f.app.focus(f.top);
        f.log.borrow_mut().clear();
        assert!(f.app.handle_event(&InputEvent::Key(KeyEvent::ctrl('q'))));
        assert!(f.shutdown.is_requested());
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn local_binding_precedes_default_handler() {
        let mut f = fixture(Keymap::new());
        f.app.focus(f.top);
        f.log.borrow_mut().clear();
        assert!(f.app.handle_event(&key(KeyCode::Tab)));
        assert!(f.app.handle_event(&key(KeyCode::Enter)));
        assert_eq!(*f.log.borrow(), vec!["a:local:Tab", "a:key:Enter"]);
    }

    #[test]
    fn keys_without_focus_are_dropped() {
        let mut f = fixture(Keymap::new());
        assert!(!f.app.handle_event(&key(KeyCode::Enter)));
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn left_click_focuses_then_delivers() {
        let mut f = fixture(Keymap::new());
        f.app.focus(f.top);
        f.log.borrow_mut().clear();
        assert!(f.app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 19)));
        assert_eq!(*f.log.borrow(), vec!["a:blur", "b:focus", "b:click:3,19"]);
        assert_eq!(f.app.last_mouse(), Some((3, 19)));
    }

    #[test]
    fn wheel_scrolls_view_under_pointer_without_focus_change() {
        let mut f = fixture(Keymap::new());
        f.app.focus(f.bottom);
        f.log.borrow_mut().clear();
        f.app.handle_event(&mouse(MouseEventKind::ScrollDown, 0, 16));
        f.app.handle_event(&mouse(MouseEventKind::ScrollUp, 0, 2));
        assert_eq!(*f.log.borrow(), vec!["a:down:2", "a:up:1"]);
        assert_eq!(f.app.focused(), Some(f.bottom));
    }

    #[test]
    fn focus_requests_apply_after_dispatch() {
        let mut f = fixture(Keymap::new());
        let target = f.bottom;
        f.app
            .keymap
            .bind(KeyEvent::ctrl('f'), Box::new(move |ctx: &mut Ctx| ctx.request_focus(target)));
        assert!(f.app.handle_event(&InputEvent::Key(KeyEvent::ctrl('f'))));
        assert_eq!(f.app.focused(), Some(f.bottom));
    }

    #[test]
    fn draw_places_cursor_of_focused_view() {
        let mut f = fixture(Keymap::new());
        let mut surface = MemorySurface::new(10, 20);
        f.app.draw(&mut surface);
        assert_eq!(surface.cursor(), None);
        f.app.focus(f.bottom);
        f.app.draw(&mut surface);
        assert_eq!(surface.cursor(), Some((0, 19)));
        assert_eq!(surface.row_text(0), "aaaaaaaaaa");
    }
}
