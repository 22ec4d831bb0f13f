//! duet-session: the interactive session controller.
//!
//! Raw keystrokes go in; edited command lines, dispatched subprocesses and
//! rendered output come out. Everything here runs on one event loop: the
//! host feeds input chunks and [`duet_proc::JobEvent`]s into a
//! [`Controller`], one at a time, and the controller writes to a
//! [`Display`].
//!
//! - [`input`]: keystroke decoding and line editing.
//! - [`router`]: classifies submitted lines per [`Mode`].
//! - [`shell`] / [`assistant`]: run shell commands and assistant prompts.
//! - [`render`] / [`console`]: markup conversion and everything written
//!   to the display.

pub mod assistant;
pub mod cli;
pub mod console;
pub mod controller;
pub mod display;
pub mod input;
pub mod render;
pub mod router;
pub mod session;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_support;

pub use assistant::AssistantSession;
pub use cli::AssistantKind;
pub use console::Console;
pub use controller::{Controller, ControllerConfig};
pub use display::Display;
pub use input::{EditAction, Key, KeyDecoder};
pub use render::{to_crlf, Markup, PlainText, RenderError, RuleSet, ANSI_RULES};
pub use router::Route;
pub use session::{Mode, Session};
pub use shell::ShellExecutor;
