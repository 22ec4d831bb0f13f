//! Prompts sent to the AI assistant CLI.

use duet_proc::{JobId, ProcessEvent, Spawner};

use crate::cli::{self, AssistantKind};
use crate::console::Console;
use crate::display::Display;
use crate::session::Session;

/// Output lines containing any of these are banners, not answers.
pub const NOISE_PATTERNS: &[&str] = &["Loaded cached credentials", "YOLO mode is enabled"];

pub struct AssistantSession {
    program: String,
    kind: AssistantKind,
}

impl AssistantSession {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        let kind = AssistantKind::detect(&program);
        log::debug!("assistant `{program}` detected as {kind:?}");
        Self { program, kind }
    }

    pub fn is_noise(line: &str) -> bool {
        NOISE_PATTERNS.iter().any(|pattern| line.contains(pattern))
    }

    /// Start `prompt` as `job`, resuming the conversation once one has
    /// completed. Returns `false` if nothing was started.
    pub fn run<D: Display, P: Spawner>(
        &self,
        job: JobId,
        prompt: &str,
        spawner: &mut P,
        console: &mut Console<D>,
        session: &Session,
    ) -> bool {
        let invocation =
            cli::build_invocation(&self.program, self.kind, prompt, session.ai_resumable());

        console.show_indicator(job);
        match spawner.spawn(job, &invocation) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("job {job}: {e}");
                console.take_indicator(job);
                console.error(&format!("Failed to run {}: {e}", self.program));
                console.finish(session);
                false
            }
        }
    }

    /// Render one event of an assistant job.
    pub fn on_event<D: Display>(
        &self,
        job: JobId,
        event: ProcessEvent,
        console: &mut Console<D>,
        session: &mut Session,
    ) {
        match event {
            ProcessEvent::Stdout(line) | ProcessEvent::Stderr(line) => {
                if Self::is_noise(&line) {
                    log::debug!("job {job}: dropped noise line {line:?}");
                    return;
                }
                console.take_indicator(job);
                console.markup_line(&line);
            }
            ProcessEvent::Closed { code } => {
                log::debug!("job {job}: {} exited with {code:?}", self.program);
                console.take_indicator(job);
                console.finish(session);
                session.mark_ai_resumable();
            }
            ProcessEvent::Errored(message) => {
                log::warn!("job {job}: {message}");
                console.take_indicator(job);
                console.error(&format!("Error: {message}"));
                console.finish(session);
            }
        }
    }
}
