//! Raw-mode terminal session the widget is drawn into.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use crate::ui::layout::Layout;

/// Owns the terminal while the widget is mounted.
///
/// Dropping the session restores the terminal, including on early returns.
pub struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    pub fn mount() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        Ok(Self { stdout })
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Redraws the whole widget at `layout`. Pad rows are dimmed while `powered` is false.
    pub fn draw(&mut self, layout: &Layout, lines: &[String], powered: bool) -> io::Result<()> {
        queue!(self.stdout, Clear(ClearType::All))?;

        for (row, line) in (0u16..).zip(lines) {
            queue!(
                self.stdout,
                MoveTo(layout.origin_x, layout.origin_y.saturating_add(row))
            )?;
            if !powered && Layout::is_pad_row(row) {
                queue!(
                    self.stdout,
                    SetAttribute(Attribute::Dim),
                    Print(line),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(self.stdout, Print(line))?;
            }
        }

        self.stdout.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.stdout, Show, DisableMouseCapture, LeaveAlternateScreen) {
            log::error!("Failed to restore terminal screen: {err}");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("Failed to disable raw mode: {err}");
        }
    }
}
