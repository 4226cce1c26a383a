//! The status row fed by the editors' shared status binding.
//!
//! The bar copies the latest published string into a shared cell from a
//! [`core_state::Binding`] subscription, so drawing never borrows an
//! editor state.

use std::cell::RefCell;
use std::rc::Rc;

use core_model::{View, ViewBase};
use core_state::Binding;
use core_terminal::Surface;

use crate::Theme;

/// Key hints drawn right-aligned on the status row.
pub const STATUS_HINTS: &str = "[ctrl+f] find | [ctrl+s] save | [ctrl+q] quit";

fn mirror(binding: &Binding<String>) -> Rc<RefCell<String>> {
    let text = Rc::new(RefCell::new(binding.get()));
    let sink = Rc::clone(&text);
    binding.subscribe(move |value: &String| {
        sink.replace(value.clone());
    });
    text
}

pub struct StatusBar {
    base: ViewBase,
    text: Rc<RefCell<String>>,
    theme: Theme,
}

impl StatusBar {
    pub fn new(status: &Binding<String>, theme: Theme) -> Self {
        Self {
            base: ViewBase::fixed(1),
            text: mirror(status),
            theme,
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

impl View for StatusBar {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn focusable(&self) -> bool {
        false
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let r = self.base.rect;
        if r.is_empty() {
            return;
        }
        let style = self.theme.status;
        surface.fill(r.x, r.y, r.width, 1, style);
        let left_end = surface.put_str(r.x + 1, r.y, r.right(), &self.text.borrow(), style);
        let hints = STATUS_HINTS.chars().count() as u16;
        // hints are dropped rather than drawn over the position
        if let Some(start) = r.right().checked_sub(hints + 1) {
            if start > left_end {
                surface.put_str(start, r.y, r.right(), STATUS_HINTS, style);
            }
        }
    }
}
