//! Cell-grid surfaces.
//!
//! [`Surface`] is the only drawing contract the views see: set a styled
//! character at `(x, y)`, place or hide the cursor, report the size. Two
//! implementations live here: [`CrosstermSurface`] keeps a back grid and
//! emits only changed cells on [`Surface::flush`], and [`MemorySurface`]
//! keeps the grid for inspection in tests.
//!
//! Writes outside the grid are ignored.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor, Attribute},
};
use std::io::{Stdout, Write, stdout};
use tracing::trace;

use crate::style::CellStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

pub trait Surface {
    fn size(&self) -> (u16, u16);
    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle);
    fn show_cursor(&mut self, x: u16, y: u16);
    fn hide_cursor(&mut self);
    fn flush(&mut self) -> Result<()>;

    /// Paint `text` left to right from `(x, y)`, clipped at `max_x` (exclusive).
    /// Returns the column after the last painted cell.
    fn put_str(&mut self, x: u16, y: u16, max_x: u16, text: &str, style: CellStyle) -> u16 {
        let mut cx = x;
        for ch in text.chars() {
            if cx >= max_x {
                break;
            }
            self.set_cell(cx, y, ch, style);
            cx += 1;
        }
        cx
    }

    /// Fill a rectangle with blanks.
    fn fill(&mut self, x: u16, y: u16, width: u16, height: u16, style: CellStyle) {
        for row in y..y.saturating_add(height) {
            for col in x..x.saturating_add(width) {
                self.set_cell(col, row, ' ', style);
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }
}

/// Crossterm-backed surface. Cells are staged in a back grid and compared
/// with what was last emitted, so a flush writes only the difference.
pub struct CrosstermSurface<W: Write = Stdout> {
    out: W,
    back: Grid,
    front: Option<Grid>,
    cursor: Option<(u16, u16)>,
}

impl CrosstermSurface<Stdout> {
    pub fn stdout(width: u16, height: u16) -> Self {
        Self::with_writer(stdout(), width, height)
    }
}

impl<W: Write> CrosstermSurface<W> {
    pub fn with_writer(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            back: Grid::new(width, height),
            front: None,
            cursor: None,
        }
    }

    /// Drop all staged and emitted state; the next flush repaints everything.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.back = Grid::new(width, height);
        self.front = None;
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Surface for CrosstermSurface<W> {
    fn size(&self) -> (u16, u16) {
        (self.back.width, self.back.height)
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.back.set(x, y, Cell { ch, style });
    }

    fn show_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some((x, y));
    }

    fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    fn flush(&mut self) -> Result<()> {
        queue!(self.out, Hide)?;
        let mut last_style: Option<CellStyle> = None;
        let mut emitted = 0usize;
        for y in 0..self.back.height {
            let mut pen: Option<u16> = None;
            for x in 0..self.back.width {
                let Some(cell) = self.back.get(x, y) else {
                    continue;
                };
                let unchanged = self
                    .front
                    .as_ref()
                    .and_then(|f| f.get(x, y))
                    .is_some_and(|old| old == cell);
                if unchanged {
                    pen = None;
                    continue;
                }
                if pen != Some(x) {
                    queue!(self.out, MoveTo(x, y))?;
                }
                if last_style != Some(cell.style) {
                    queue!(
                        self.out,
                        SetAttribute(Attribute::Reset),
                        ResetColor,
                        SetForegroundColor(cell.style.fg.to_crossterm()),
                        SetBackgroundColor(cell.style.bg.to_crossterm())
                    )?;
                    for attr in cell.style.attrs.crossterm_attributes() {
                        queue!(self.out, SetAttribute(attr))?;
                    }
                    last_style = Some(cell.style);
                }
                queue!(self.out, Print(cell.ch))?;
                pen = Some(x + 1);
                emitted += 1;
            }
        }
        queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        if let Some((x, y)) = self.cursor {
            queue!(self.out, MoveTo(x, y), Show)?;
        }
        self.out.flush()?;
        self.front = Some(self.back.clone());
        trace!(target: "terminal", cells = emitted, "flush");
        Ok(())
    }
}

/// In-memory surface for tests and headless use.
#[derive(Clone, Debug)]
pub struct MemorySurface {
    grid: Grid,
    cursor: Option<(u16, u16)>,
    flushes: usize,
}

impl MemorySurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            grid: Grid::new(width, height),
            cursor: None,
            flushes: 0,
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.grid.get(x, y)
    }

    /// Characters of row `y`, trailing blanks included.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.grid.width)
            .filter_map(|x| self.grid.get(x, y))
            .map(|c| c.ch)
            .collect()
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.grid = Grid::new(width, height);
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> (u16, u16) {
        (self.grid.width, self.grid.height)
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.grid.set(x, y, Cell { ch, style });
    }

    fn show_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some((x, y));
    }

    fn hide_cursor(&mut self) {
        self.cursor = None;
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_surface_ignores_out_of_bounds() {
        let mut s = MemorySurface::new(3, 2);
        s.set_cell(5, 0, 'x', CellStyle::default());
        s.set_cell(0, 9, 'x', CellStyle::default());
        assert_eq!(s.row_text(0), "   ");
        assert_eq!(s.cell(3, 0), None);
    }

    #[test]
    fn put_str_clips_at_max_x() {
        let mut s = MemorySurface::new(6, 1);
        let end = s.put_str(1, 0, 4, "hello", CellStyle::default());
        assert_eq!(end, 4);
        assert_eq!(s.row_text(0), " hel  ");
    }

    #[test]
    fn fill_paints_rectangle() {
        let mut s = MemorySurface::new(4, 3);
        s.put_str(0, 1, 4, "abcd", CellStyle::default());
        let gray = CellStyle::new().bg(Color::Gray);
        s.fill(1, 1, 2, 1, gray);
        assert_eq!(s.row_text(1), "a  d");
        assert_eq!(s.cell(1, 1).map(|c| c.style), Some(gray));
    }

    #[test]
    fn crossterm_surface_second_flush_emits_only_changes() {
        let mut s = CrosstermSurface::with_writer(Vec::new(), 4, 1);
        s.put_str(0, 0, 4, "abcd", CellStyle::default());
        s.flush().unwrap();
        let first = s.writer().len();
        s.flush().unwrap();
        let second = s.writer().len() - first;
        assert!(second < first, "unchanged grid should emit less: {second} vs {first}");
        let text = String::from_utf8_lossy(s.writer());
        assert!(text.contains("abcd"));
    }

    #[test]
    fn crossterm_surface_resize_forces_full_repaint() {
        let mut s = CrosstermSurface::with_writer(Vec::new(), 2, 1);
        s.put_str(0, 0, 2, "zz", CellStyle::default());
        s.flush().unwrap();
        s.resize(2, 1);
        s.put_str(0, 0, 2, "zz", CellStyle::default());
        let before = s.writer().len();
        s.flush().unwrap();
        let text = String::from_utf8_lossy(&s.writer()[before..]).to_string();
        assert!(text.contains("zz"));
    }
}
