//! View composition: geometry, the [`View`] capability set, stack layout,
//! hit-testing and the [`App`] focus root.
//!
//! Every view (leaf or container) implements the same trait. Containers
//! expose their children through [`View::children`] and friends; leaves keep
//! the empty default. Tree walks ([`hit_test`], [`find_mut`]) only ever go
//! through those accessors, never through concrete types.
//!
//! Views are addressed by [`ViewId`], allocated once per [`ViewBase`]. The
//! app records the focused view by id and resolves it against the tree on
//! each dispatch.

use std::sync::atomic::{AtomicU64, Ordering};

use core_events::{KeyEvent, MouseEvent};
use core_terminal::Surface;

pub mod app;
pub mod layout;

pub use app::{App, Ctx, GlobalHandler, Request};
pub use layout::{HStack, Rect, Switch, VStack, distribute};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// State shared by every view: identity, geometry, focus flag and the
/// declared extent along a parent stack's axis (`None` = flexible).
#[derive(Debug, Clone)]
pub struct ViewBase {
    pub id: ViewId,
    pub rect: Rect,
    pub focused: bool,
    pub fixed: Option<u16>,
}

impl Default for ViewBase {
    fn default() -> Self {
        Self::flexible()
    }
}

impl ViewBase {
    pub fn flexible() -> Self {
        Self {
            id: ViewId::next(),
            rect: Rect::default(),
            focused: false,
            fixed: None,
        }
    }

    /// A view that keeps `extent` rows in a [`VStack`] (columns in an [`HStack`]).
    pub fn fixed(extent: u16) -> Self {
        Self {
            fixed: Some(extent),
            ..Self::flexible()
        }
    }
}

pub trait View {
    fn base(&self) -> &ViewBase;
    fn base_mut(&mut self) -> &mut ViewBase;

    fn id(&self) -> ViewId {
        self.base().id
    }

    fn rect(&self) -> Rect {
        self.base().rect
    }

    /// Assign geometry. Containers override this to lay out their children.
    fn set_rect(&mut self, rect: Rect) {
        self.base_mut().rect = rect;
    }

    fn draw(&mut self, surface: &mut dyn Surface);

    /// Every child, in order. Leaves have none.
    fn children(&self) -> &[Box<dyn View>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn View>] {
        &mut []
    }

    /// Children that currently occupy screen space; hit-testing only
    /// descends into these.
    fn visible_children(&self) -> &[Box<dyn View>] {
        self.children()
    }

    fn focusable(&self) -> bool {
        true
    }

    fn on_focus(&mut self) {}

    fn on_blur(&mut self) {}

    /// The view's own key table. Consulted before [`View::handle_key`].
    fn local_binding(&mut self, _key: &KeyEvent, _ctx: &mut Ctx) -> bool {
        false
    }

    /// Default key handling. Returns whether the key was consumed.
    fn handle_key(&mut self, _key: &KeyEvent, _ctx: &mut Ctx) -> bool {
        false
    }

    fn handle_paste(&mut self, _text: &str, _ctx: &mut Ctx) -> bool {
        false
    }

    /// Left click at absolute cell `(x, y)`, delivered after focus moved here.
    fn click(&mut self, _x: u16, _y: u16, _ctx: &mut Ctx) -> bool {
        false
    }

    /// Mouse events other than left-click and wheel.
    fn mouse(&mut self, _event: &MouseEvent, _ctx: &mut Ctx) -> bool {
        false
    }

    fn scroll_up(&mut self, _delta: usize) -> bool {
        false
    }

    fn scroll_down(&mut self, _delta: usize) -> bool {
        false
    }

    /// Absolute cell for the terminal cursor while this view is focused.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

/// Deepest visible view containing `(x, y)`, or `None` outside `root`.
pub fn hit_test(root: &dyn View, x: u16, y: u16) -> Option<ViewId> {
    if !root.rect().contains(x, y) {
        return None;
    }
    for child in root.visible_children() {
        if let Some(id) = hit_test(child.as_ref(), x, y) {
            return Some(id);
        }
    }
    Some(root.id())
}

pub fn find<'a>(root: &'a dyn View, id: ViewId) -> Option<&'a dyn View> {
    if root.id() == id {
        return Some(root);
    }
    root.children()
        .iter()
        .find_map(|child| find(child.as_ref(), id))
}

pub fn find_mut<'a>(root: &'a mut dyn View, id: ViewId) -> Option<&'a mut dyn View> {
    if root.id() == id {
        return Some(root);
    }
    root.children_mut()
        .iter_mut()
        .find_map(|child| find_mut(child.as_mut(), id))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use core_terminal::CellStyle;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Leaf that fills itself with one character and records what reached it.
    pub struct Probe {
        pub base: ViewBase,
        pub fill: char,
        pub log: Rc<RefCell<Vec<String>>>,
        pub consume_keys: bool,
        pub local_key: Option<KeyEvent>,
    }

    impl Probe {
        pub fn new(base: ViewBase, fill: char, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                base,
                fill,
                log: Rc::clone(log),
                consume_keys: true,
                local_key: None,
            }
        }
    }

    impl View for Probe {
        fn base(&self) -> &ViewBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ViewBase {
            &mut self.base
        }

        fn draw(&mut self, surface: &mut dyn Surface) {
            let r = self.base.rect;
            for y in r.y..r.bottom() {
                for x in r.x..r.right() {
                    surface.set_cell(x, y, self.fill, CellStyle::default());
                }
            }
        }

        fn on_focus(&mut self) {
            self.log.borrow_mut().push(format!("{}:focus", self.fill));
        }

        fn on_blur(&mut self) {
            self.log.borrow_mut().push(format!("{}:blur", self.fill));
        }

        fn local_binding(&mut self, key: &KeyEvent, _ctx: &mut Ctx) -> bool {
            if self.local_key != Some(*key) {
                return false;
            }
            self.log.borrow_mut().push(format!("{}:local:{key}", self.fill));
            true
        }

        fn handle_key(&mut self, key: &KeyEvent, _ctx: &mut Ctx) -> bool {
            self.log.borrow_mut().push(format!("{}:key:{key}", self.fill));
            self.consume_keys
        }

        fn click(&mut self, x: u16, y: u16, _ctx: &mut Ctx) -> bool {
            self.log.borrow_mut().push(format!("{}:click:{x},{y}", self.fill));
            true
        }

        fn scroll_down(&mut self, delta: usize) -> bool {
            self.log.borrow_mut().push(format!("{}:down:{delta}", self.fill));
            true
        }

        fn scroll_up(&mut self, delta: usize) -> bool {
            self.log.borrow_mut().push(format!("{}:up:{delta}", self.fill));
            true
        }

        fn cursor(&self) -> Option<(u16, u16)> {
            Some((self.base.rect.x, self.base.rect.y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Probe;
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn view_ids_are_unique() {
        let a = ViewBase::flexible();
        let b = ViewBase::fixed(1);
        assert_ne!(a.id, b.id);
        assert_eq!(b.fixed, Some(1));
    }

    #[test]
    fn hit_test_returns_deepest_leaf() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let top = Probe::new(ViewBase::fixed(1), 't', &log);
        let left = Probe::new(ViewBase::flexible(), 'l', &log);
        let right = Probe::new(ViewBase::flexible(), 'r', &log);
        let (top_id, left_id, right_id) = (top.base.id, left.base.id, right.base.id);
        let mut root = VStack::new(vec![
            Box::new(top),
            Box::new(HStack::new(vec![Box::new(left), Box::new(right)])),
        ]);
        root.set_rect(Rect::new(0, 0, 10, 5));
        assert_eq!(hit_test(&root, 3, 0), Some(top_id));
        assert_eq!(hit_test(&root, 2, 3), Some(left_id));
        assert_eq!(hit_test(&root, 7, 4), Some(right_id));
        assert_eq!(hit_test(&root, 10, 0), None);
        assert_eq!(hit_test(&root, 0, 5), None);
    }

    #[test]
    fn remainder_gap_hits_the_container() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Probe::new(ViewBase::flexible(), 'a', &log);
        let b = Probe::new(ViewBase::flexible(), 'b', &log);
        let mut root = VStack::new(vec![Box::new(a), Box::new(b)]);
        let root_id = root.id();
        root.set_rect(Rect::new(0, 0, 4, 5));
        assert_eq!(hit_test(&root, 0, 4), Some(root_id));
    }

    #[test]
    fn find_mut_reaches_nested_views() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let leaf = Probe::new(ViewBase::flexible(), 'x', &log);
        let id = leaf.base.id;
        let mut root = VStack::new(vec![Box::new(HStack::new(vec![Box::new(leaf)]))]);
        root.set_rect(Rect::new(0, 0, 3, 3));
        let found = find_mut(&mut root, id).map(|v| v.rect());
        assert_eq!(found, Some(Rect::new(0, 0, 3, 3)));
        assert!(find(&root, ViewId::next()).is_none());
    }
}
