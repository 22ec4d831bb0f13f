use alacritty_terminal::event::{Event, EventListener};
use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::term::{Config, Term};
use alacritty_terminal::vte::ansi;

use crate::screen::{CursorState, ScreenView};

/// Event sink for the emulator. duet only reads the grid, so terminal
/// events (title, bell, write-backs) are discarded.
#[derive(Clone, Copy, Default)]
pub struct EventProxy;

impl EventListener for EventProxy {
    fn send_event(&self, event: Event) {
        log::trace!("ignored terminal event: {event:?}");
    }
}

struct TermSize {
    columns: usize,
    screen_lines: usize,
}

impl Dimensions for TermSize {
    fn total_lines(&self) -> usize {
        self.screen_lines
    }

    fn screen_lines(&self) -> usize {
        self.screen_lines
    }

    fn columns(&self) -> usize {
        self.columns
    }
}

/// Headless terminal: a grid plus a VTE parser, without scrollback.
pub struct VtTerminal {
    term: Term<EventProxy>,
    parser: ansi::Processor,
}

impl VtTerminal {
    pub fn new(cols: u16, rows: u16) -> Self {
        let config = Config {
            scrolling_history: 0,
            ..Config::default()
        };
        let size = TermSize {
            columns: cols as usize,
            screen_lines: rows as usize,
        };

        Self {
            term: Term::new(config, &size, EventProxy),
            parser: ansi::Processor::new(),
        }
    }

    /// Feed bytes exactly as a display surface would receive them.
    pub fn write(&mut self, bytes: &[u8]) {
        self.parser.advance(&mut self.term, bytes);
    }

    pub fn screen(&self) -> ScreenView<'_> {
        ScreenView::new(&self.term)
    }

    pub fn cursor(&self) -> CursorState {
        let point = self.term.grid().cursor.point;
        CursorState {
            row: point.line.0 as u16,
            col: point.column.0 as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellFlags, Rgb};

    #[test]
    fn test_create_terminal_dimensions() {
        let term = VtTerminal::new(80, 24);
        let screen = term.screen();
        assert_eq!(screen.cols(), 80);
        assert_eq!(screen.rows(), 24);
    }

    #[test]
    fn test_row_text_trims_trailing_blanks() {
        let mut term = VtTerminal::new(80, 24);
        term.write(b"hello");

        assert_eq!(term.screen().row_text(0), "hello");
        assert_eq!(term.screen().row_text(1), "");
    }

    #[test]
    fn test_crlf_moves_to_next_row() {
        let mut term = VtTerminal::new(80, 24);
        term.write(b"one\r\ntwo");

        assert_eq!(term.screen().lines()[..2], ["one".to_string(), "two".to_string()]);
        assert_eq!(term.cursor(), CursorState { row: 1, col: 3 });
    }

    #[test]
    fn test_backspace_space_backspace_erases() {
        let mut term = VtTerminal::new(80, 24);
        term.write(b"abc\x08 \x08");

        assert_eq!(term.screen().row_text(0), "ab");
        assert_eq!(term.cursor().col, 2);
    }

    #[test]
    fn test_erase_line_and_carriage_return() {
        let mut term = VtTerminal::new(80, 24);
        term.write(b"stale text\x1b[2K\rfresh");

        assert_eq!(term.screen().row_text(0), "fresh");
    }

    #[test]
    fn test_bold_flag() {
        let mut term = VtTerminal::new(80, 24);
        term.write(b"\x1b[1mB\x1b[22mn");

        let screen = term.screen();
        assert!(screen.cell(0, 0).flags.contains(CellFlags::BOLD));
        assert!(!screen.cell(0, 1).flags.contains(CellFlags::BOLD));
    }

    #[test]
    fn test_cyan_foreground() {
        let mut term = VtTerminal::new(80, 24);
        term.write(b"\x1b[36mC\x1b[39mD");

        let screen = term.screen();
        assert_eq!(screen.cell(0, 0).fg, Rgb::CYAN);
        assert_eq!(screen.cell(0, 1).fg, Rgb::DEFAULT_FG);
    }

    #[test]
    fn test_wide_char_spacer_skipped_in_text() {
        let mut term = VtTerminal::new(80, 24);
        term.write("✨ AI".as_bytes());

        assert_eq!(term.screen().row_text(0), "✨ AI");
        assert_eq!(term.screen().find("AI"), Some((0, 2)));
    }

    #[test]
    fn test_clear_screen_sequence() {
        let mut term = VtTerminal::new(80, 24);
        term.write(b"line one\r\nline two");
        term.write(b"\x1b[2J\x1b[H");

        assert!(!term.screen().contains("line"));
        assert_eq!(term.cursor(), CursorState { row: 0, col: 0 });
    }
}
