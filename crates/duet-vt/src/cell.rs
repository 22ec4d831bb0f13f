use bitflags::bitflags;

/// RGB color value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Foreground used when no SGR color is active.
    pub const DEFAULT_FG: Rgb = Rgb::new(229, 229, 229);
    pub const RED: Rgb = Rgb::new(205, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 205, 0);
    pub const YELLOW: Rgb = Rgb::new(205, 205, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 238);
    pub const MAGENTA: Rgb = Rgb::new(205, 0, 205);
    pub const CYAN: Rgb = Rgb::new(0, 205, 205);
    pub const BRIGHT_BLACK: Rgb = Rgb::new(127, 127, 127);
}

bitflags! {
    /// Text attributes the session controller emits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const BOLD      = 0b0000_0001;
        const ITALIC    = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const INVERSE   = 0b0000_1000;
        const DIM       = 0b0001_0000;
    }
}

/// A single cell of the visible grid.
#[derive(Clone, Debug)]
pub struct VtCell {
    pub codepoint: char,
    pub fg: Rgb,
    pub flags: CellFlags,
    /// 1 for normal, 2 for wide chars, 0 for the spacer after a wide char.
    pub width: u8,
}

impl Default for VtCell {
    fn default() -> Self {
        Self {
            codepoint: ' ',
            fg: Rgb::DEFAULT_FG,
            flags: CellFlags::empty(),
            width: 1,
        }
    }
}
