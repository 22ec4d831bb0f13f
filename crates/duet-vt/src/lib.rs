//! duet-vt: headless screen model for duet.
//!
//! Feeds the exact byte stream the session controller writes into an
//! `alacritty_terminal` grid, so callers can inspect what a user would see:
//! visible row text, cursor position and per-cell attributes.

pub mod cell;
pub mod screen;
pub mod terminal;

pub use cell::{CellFlags, Rgb, VtCell};
pub use screen::{CursorState, ScreenView};
pub use terminal::VtTerminal;
