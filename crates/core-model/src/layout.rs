//! Geometry and container views.
//!
//! [`VStack`] and [`HStack`] divide their extent along one axis: children
//! with a fixed extent keep it, the rest is split evenly (integer division)
//! among the flexible children. The division remainder is assigned to no one
//! and shows as a gap at the container's far edge. Fixed extents that do not
//! fit leave the flexible share at zero and are clipped to the container.
//!
//! [`Switch`] stacks its children on the same rectangle and shows one of
//! them: the focused child if any, otherwise the first.

use core_terminal::{CellStyle, Surface};

use crate::{View, ViewBase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row.
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Extents along a stack axis of length `total` for children declaring
/// `fixed` (`None` = flexible).
pub fn distribute(total: u16, fixed: &[Option<u16>]) -> Vec<u16> {
    let fixed_sum: u32 = fixed.iter().flatten().map(|&f| u32::from(f)).sum();
    let flexible = fixed.iter().filter(|f| f.is_none()).count() as u32;
    let share = if flexible == 0 {
        0
    } else {
        u32::from(total).saturating_sub(fixed_sum) / flexible
    };
    fixed
        .iter()
        .map(|f| match f {
            Some(extent) => *extent,
            // share <= total, which fits in u16
            None => share as u16,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

fn layout_children(axis: Axis, rect: Rect, children: &mut [Box<dyn View>]) {
    let total = match axis {
        Axis::Vertical => rect.height,
        Axis::Horizontal => rect.width,
    };
    let declared: Vec<Option<u16>> = children.iter().map(|c| c.base().fixed).collect();
    let extents = distribute(total, &declared);
    let mut offset = 0u16;
    for (child, extent) in children.iter_mut().zip(extents) {
        let extent = extent.min(total - offset);
        let child_rect = match axis {
            Axis::Vertical => Rect::new(rect.x, rect.y.saturating_add(offset), rect.width, extent),
            Axis::Horizontal => Rect::new(rect.x.saturating_add(offset), rect.y, extent, rect.height),
        };
        child.set_rect(child_rect);
        offset += extent;
    }
}

fn draw_stack(base: &ViewBase, children: &mut [Box<dyn View>], surface: &mut dyn Surface) {
    let r = base.rect;
    surface.fill(r.x, r.y, r.width, r.height, CellStyle::default());
    for child in children {
        child.draw(surface);
    }
}

macro_rules! stack_view {
    ($name:ident, $axis:expr, $doc:literal) => {
        #[doc = $doc]
        pub struct $name {
            base: ViewBase,
            children: Vec<Box<dyn View>>,
        }

        impl $name {
            pub fn new(children: Vec<Box<dyn View>>) -> Self {
                Self::with_base(ViewBase::flexible(), children)
            }

            pub fn with_base(base: ViewBase, children: Vec<Box<dyn View>>) -> Self {
                Self { base, children }
            }

            pub fn push(&mut self, child: Box<dyn View>) {
                self.children.push(child);
                let rect = self.base.rect;
                layout_children($axis, rect, &mut self.children);
            }

            pub fn len(&self) -> usize {
                self.children.len()
            }

            pub fn is_empty(&self) -> bool {
                self.children.is_empty()
            }
        }

        impl View for $name {
            fn base(&self) -> &ViewBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut ViewBase {
                &mut self.base
            }

            fn set_rect(&mut self, rect: Rect) {
                self.base.rect = rect;
                layout_children($axis, rect, &mut self.children);
            }

            fn draw(&mut self, surface: &mut dyn Surface) {
                draw_stack(&self.base, &mut self.children, surface);
            }

            fn children(&self) -> &[Box<dyn View>] {
                &self.children
            }

            fn children_mut(&mut self) -> &mut [Box<dyn View>] {
                &mut self.children
            }

            fn focusable(&self) -> bool {
                false
            }
        }
    };
}

stack_view!(VStack, Axis::Vertical, "Children top to bottom.");
stack_view!(HStack, Axis::Horizontal, "Children left to right.");

/// Children share one rectangle; only the active one is drawn and hit.
pub struct Switch {
    base: ViewBase,
    children: Vec<Box<dyn View>>,
}

impl Switch {
    /// `base` carries the extent the switch declares to its parent stack.
    pub fn new(base: ViewBase, children: Vec<Box<dyn View>>) -> Self {
        Self { base, children }
    }

    /// Index of the shown child: the focused one, else the first.
    pub fn active(&self) -> usize {
        self.children
            .iter()
            .position(|c| c.base().focused)
            .unwrap_or(0)
    }
}

impl View for Switch {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn set_rect(&mut self, rect: Rect) {
        self.base.rect = rect;
        for child in &mut self.children {
            child.set_rect(rect);
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let active = self.active();
        match self.children.get_mut(active) {
            Some(child) => child.draw(surface),
            None => {
                let r = self.base.rect;
                surface.fill(r.x, r.y, r.width, r.height, CellStyle::default());
            }
        }
    }

    fn children(&self) -> &[Box<dyn View>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Box<dyn View>] {
        &mut self.children
    }

    fn visible_children(&self) -> &[Box<dyn View>] {
        let active = self.active();
        self.children
            .get(active..=active)
            .unwrap_or_default()
    }

    fn focusable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Probe;
    use core_terminal::MemorySurface;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rects(view: &dyn View) -> Vec<Rect> {
        view.children().iter().map(|c| c.rect()).collect()
    }

    #[test]
    fn distribute_drops_remainder() {
        assert_eq!(distribute(10, &[Some(1), None, None, Some(1)]), vec![1, 4, 4, 1]);
        assert_eq!(distribute(9, &[None, None]), vec![4, 4]);
        assert_eq!(distribute(5, &[Some(8), None]), vec![8, 0]);
        assert_eq!(distribute(5, &[Some(2)]), vec![2]);
        assert_eq!(distribute(5, &[]), Vec::<u16>::new());
    }

    #[test]
    fn vstack_positions_children_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = VStack::new(vec![
            Box::new(Probe::new(ViewBase::fixed(1), 't', &log)),
            Box::new(Probe::new(ViewBase::flexible(), 'e', &log)),
            Box::new(Probe::new(ViewBase::fixed(1), 's', &log)),
        ]);
        stack.set_rect(Rect::new(0, 0, 8, 6));
        assert_eq!(
            rects(&stack),
            vec![Rect::new(0, 0, 8, 1), Rect::new(0, 1, 8, 4), Rect::new(0, 5, 8, 1)]
        );
    }

    #[test]
    fn hstack_splits_width() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = HStack::new(vec![
            Box::new(Probe::new(ViewBase::flexible(), 'a', &log)),
            Box::new(Probe::new(ViewBase::flexible(), 'b', &log)),
        ]);
        stack.set_rect(Rect::new(2, 1, 7, 3));
        assert_eq!(rects(&stack), vec![Rect::new(2, 1, 3, 3), Rect::new(5, 1, 3, 3)]);

        let mut surface = MemorySurface::new(10, 4);
        stack.draw(&mut surface);
        assert_eq!(surface.row_text(1), "  aaabbb  ");
    }

    #[test]
    fn oversized_fixed_child_is_clipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = VStack::new(vec![
            Box::new(Probe::new(ViewBase::fixed(9), 'a', &log)),
            Box::new(Probe::new(ViewBase::flexible(), 'b', &log)),
        ]);
        stack.set_rect(Rect::new(0, 0, 2, 4));
        assert_eq!(rects(&stack), vec![Rect::new(0, 0, 2, 4), Rect::new(0, 4, 2, 0)]);
    }

    #[test]
    fn empty_stack_only_clears_background() {
        let mut stack = VStack::new(Vec::new());
        stack.set_rect(Rect::new(0, 0, 3, 1));
        let mut surface = MemorySurface::new(3, 1);
        surface.put_str(0, 0, 3, "xyz", CellStyle::default());
        stack.draw(&mut surface);
        assert_eq!(surface.row_text(0), "   ");
        assert!(stack.is_empty());
    }

    #[test]
    fn switch_shows_focused_child() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let status = Probe::new(ViewBase::flexible(), 's', &log);
        let prompt = Probe::new(ViewBase::flexible(), 'p', &log);
        let prompt_id = prompt.base.id;
        let mut sw = Switch::new(ViewBase::fixed(1), vec![Box::new(status), Box::new(prompt)]);
        sw.set_rect(Rect::new(0, 0, 3, 1));
        let mut surface = MemorySurface::new(3, 1);
        sw.draw(&mut surface);
        assert_eq!(surface.row_text(0), "sss");
        assert_eq!(sw.visible_children().len(), 1);

        if let Some(v) = crate::find_mut(&mut sw, prompt_id) {
            v.base_mut().focused = true;
        }
        assert_eq!(sw.active(), 1);
        sw.draw(&mut surface);
        assert_eq!(surface.row_text(0), "ppp");
        assert_eq!(crate::hit_test(&sw, 1, 0), Some(prompt_id));
    }
}
