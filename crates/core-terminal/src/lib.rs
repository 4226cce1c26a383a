//! Terminal access for jot.
//!
//! [`CrosstermBackend`] switches the terminal into the editor's modes (raw
//! input, alternate screen, mouse reporting, bracketed paste) and back.
//! Everything drawn goes through a [`Surface`].

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use std::io::{Write, stdout};
use tracing::{debug, warn};

pub mod style;
pub mod surface;

pub use style::{Attrs, CellStyle, Color};
pub use surface::{Cell, CrosstermSurface, MemorySurface, Surface};

/// Mode switching for the real terminal. Split out so the shell can be
/// written against something other than a tty.
pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    fn size(&self) -> Result<(u16, u16)>;
}

#[derive(Debug, Default)]
pub struct CrosstermBackend {
    active: bool,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enter the editor modes until the returned guard is dropped, including
    /// on an early return or unwind.
    pub fn enter_guard(&mut self) -> Result<ScreenGuard<'_>> {
        self.enter()?;
        Ok(ScreenGuard { backend: self })
    }
}

fn write_enter(out: &mut impl Write) -> std::io::Result<()> {
    execute!(
        out,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        Hide
    )
}

fn write_leave(out: &mut impl Write) -> std::io::Result<()> {
    execute!(
        out,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen,
        Show
    )
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        if let Err(err) = write_enter(&mut stdout()) {
            let _ = terminal::disable_raw_mode();
            return Err(err.into());
        }
        self.active = true;
        debug!(target: "terminal", "screen_entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let restored = write_leave(&mut stdout());
        terminal::disable_raw_mode()?;
        restored?;
        debug!(target: "terminal", "screen_left");
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            warn!(target: "terminal", %err, "screen_restore_failed");
        }
    }
}

/// Restores the terminal when dropped.
pub struct ScreenGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl Drop for ScreenGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.backend.leave() {
            warn!(target: "terminal", %err, "screen_restore_failed");
        }
    }
}
