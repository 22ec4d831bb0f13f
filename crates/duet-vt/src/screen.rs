use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::index::{Column, Line};
use alacritty_terminal::term::cell::{Cell, Flags as AlacFlags};
use alacritty_terminal::term::Term;
use alacritty_terminal::vte::ansi::{Color, NamedColor};

use crate::cell::{CellFlags, Rgb, VtCell};
use crate::terminal::EventProxy;

/// Cursor position, zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorState {
    pub row: u16,
    pub col: u16,
}

/// A read-only view into the visible screen.
pub struct ScreenView<'a> {
    term: &'a Term<EventProxy>,
}

impl<'a> ScreenView<'a> {
    pub(crate) fn new(term: &'a Term<EventProxy>) -> Self {
        Self { term }
    }

    pub fn rows(&self) -> u16 {
        self.term.screen_lines() as u16
    }

    pub fn cols(&self) -> u16 {
        self.term.columns() as u16
    }

    /// Cell at `row`, `col`; out-of-range positions read as blank.
    pub fn cell(&self, row: u16, col: u16) -> VtCell {
        if (row as usize) >= self.term.screen_lines() || (col as usize) >= self.term.columns() {
            return VtCell::default();
        }
        let cell = &self.term.grid()[Line(row as i32)][Column(col as usize)];
        convert_cell(cell)
    }

    /// Text of one row with trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        let text: String = (0..self.cols())
            .map(|col| self.cell(row, col))
            .filter(|cell| cell.width > 0)
            .map(|cell| cell.codepoint)
            .collect();
        text.trim_end().to_string()
    }

    /// Every visible row, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        (0..self.rows()).map(|row| self.row_text(row)).collect()
    }

    /// True if any single visible row contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Locate the first occurrence of `needle` as (row, char offset in the row text).
    pub fn find(&self, needle: &str) -> Option<(u16, u16)> {
        self.lines().iter().enumerate().find_map(|(row, line)| {
            line.find(needle)
                .map(|byte_idx| (row as u16, line[..byte_idx].chars().count() as u16))
        })
    }
}

fn resolve_named(named: NamedColor) -> Rgb {
    match named {
        NamedColor::Red | NamedColor::BrightRed => Rgb::RED,
        NamedColor::Green | NamedColor::BrightGreen => Rgb::GREEN,
        NamedColor::Yellow | NamedColor::BrightYellow => Rgb::YELLOW,
        NamedColor::Blue | NamedColor::BrightBlue => Rgb::BLUE,
        NamedColor::Magenta | NamedColor::BrightMagenta => Rgb::MAGENTA,
        NamedColor::Cyan | NamedColor::BrightCyan => Rgb::CYAN,
        NamedColor::BrightBlack => Rgb::BRIGHT_BLACK,
        _ => Rgb::DEFAULT_FG,
    }
}

/// Map a foreground color onto the small palette duet emits.
pub(crate) fn resolve_color(color: &Color) -> Rgb {
    match color {
        Color::Spec(rgb) => Rgb::new(rgb.r, rgb.g, rgb.b),
        Color::Named(named) => resolve_named(*named),
        Color::Indexed(idx) => match idx {
            1 | 9 => Rgb::RED,
            2 | 10 => Rgb::GREEN,
            3 | 11 => Rgb::YELLOW,
            4 | 12 => Rgb::BLUE,
            5 | 13 => Rgb::MAGENTA,
            6 | 14 => Rgb::CYAN,
            8 => Rgb::BRIGHT_BLACK,
            _ => Rgb::DEFAULT_FG,
        },
    }
}

pub(crate) fn convert_cell(cell: &Cell) -> VtCell {
    let mut flags = CellFlags::empty();
    if cell.flags.contains(AlacFlags::BOLD) {
        flags |= CellFlags::BOLD;
    }
    if cell.flags.contains(AlacFlags::ITALIC) {
        flags |= CellFlags::ITALIC;
    }
    if cell.flags.contains(AlacFlags::UNDERLINE) {
        flags |= CellFlags::UNDERLINE;
    }
    if cell.flags.contains(AlacFlags::INVERSE) {
        flags |= CellFlags::INVERSE;
    }
    if cell.flags.contains(AlacFlags::DIM) {
        flags |= CellFlags::DIM;
    }

    let width = if cell.flags.contains(AlacFlags::WIDE_CHAR) {
        2
    } else if cell.flags.contains(AlacFlags::WIDE_CHAR_SPACER) {
        0
    } else {
        1
    };

    VtCell {
        codepoint: cell.c,
        fg: resolve_color(&cell.fg),
        flags,
        width,
    }
}
