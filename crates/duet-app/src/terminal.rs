//! The host terminal: raw mode setup and the [`Display`] the controller draws on.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use duet_session::Display;

/// Columns reported when the terminal size cannot be read.
const FALLBACK_COLUMNS: usize = 80;

/// Puts the terminal in raw mode for its lifetime.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnableBracketedPaste) {
            log::warn!("bracketed paste unavailable: {e}");
        }
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableBracketedPaste);
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("failed to restore terminal mode: {e}");
        }
        let _ = io::stdout().write_all(b"\r\n");
    }
}

/// [`Display`] over any writer, normally stdout.
pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn write(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            log::warn!("display write failed: {e}");
        }
    }

    fn clear(&mut self) {
        let result = queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            log::warn!("display clear failed: {e}");
        }
    }

    fn columns(&self) -> usize {
        match terminal::size() {
            Ok((cols, _)) if cols > 0 => usize::from(cols),
            _ => FALLBACK_COLUMNS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_passes_text_through() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.write("\x1b[1mhi\x1b[22m\r\n");
        assert_eq!(display.into_inner(), b"\x1b[1mhi\x1b[22m\r\n");
    }

    #[test]
    fn test_clear_emits_clear_and_home() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.clear();
        let out = String::from_utf8(display.into_inner()).unwrap();
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains("\x1b[1;1H"));
    }

    #[test]
    fn test_columns_is_positive() {
        let display = TerminalDisplay::new(Vec::new());
        assert!(display.columns() > 0);
    }
}
