//! duet-proc: subprocess spawning and line streaming for duet.
//!
//! A dispatched command becomes an [`Invocation`]. A [`Spawner`] starts it and
//! reports everything that happens afterwards as [`JobEvent`]s on a channel,
//! so the single-threaded session loop can consume process output the same
//! way it consumes keystrokes.
//!
//! # Architecture
//!
//! - [`Invocation`]: program plus ordered arguments.
//! - [`ShellConfig`]: turns a command line into a platform shell invocation.
//! - [`Spawner`] / [`TokioSpawner`]: non-blocking spawn; per-line stdout and
//!   stderr events followed by exactly one `Closed` or `Errored` event.

pub mod invocation;
pub mod process;
pub mod shell;

pub use invocation::Invocation;
pub use process::{JobEvent, ProcError, ProcessEvent, Spawner, TokioSpawner};
pub use shell::ShellConfig;

/// Identifies one dispatched subprocess for the lifetime of the controller.
pub type JobId = u64;
