//! Shell commands: each submitted line runs in a fresh `<shell> <flag> <line>`
//! process and its output is streamed back line by line.

use duet_proc::{JobId, ProcessEvent, ShellConfig, Spawner};

use crate::console::Console;
use crate::display::Display;
use crate::session::Session;

/// Runs command lines through a fresh system shell per command.
pub struct ShellExecutor {
    config: ShellConfig,
}

impl ShellExecutor {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    /// Start `cmd` as `job`. Returns `false` if nothing was started, in which
    /// case the error and a fresh prompt are already on screen.
    pub fn run<D: Display, P: Spawner>(
        &self,
        job: JobId,
        cmd: &str,
        spawner: &mut P,
        console: &mut Console<D>,
        session: &Session,
    ) -> bool {
        let invocation = self.config.invocation(cmd);
        match spawner.spawn(job, &invocation) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("job {job}: {e}");
                console.error(&format!("Failed to execute: {e}"));
                console.finish(session);
                false
            }
        }
    }

    /// Render one event of a shell job.
    pub fn on_event<D: Display>(
        &self,
        job: JobId,
        event: ProcessEvent,
        console: &mut Console<D>,
        session: &Session,
    ) {
        match event {
            ProcessEvent::Stdout(line) | ProcessEvent::Stderr(line) => console.raw_line(&line),
            ProcessEvent::Closed { code } => {
                log::debug!("job {job}: shell exited with {code:?}");
                console.finish(session);
            }
            ProcessEvent::Errored(message) => {
                log::warn!("job {job}: {message}");
                console.error(&format!("Error: {message}"));
                console.finish(session);
            }
        }
    }
}
