//! The session controller: owns all session state and reacts to one event
//! at a time.
//!
//! The host calls [`Controller::handle_input`] for every chunk of raw
//! keyboard input and [`Controller::handle_job_event`] for every event a
//! spawned job produces. Handlers run to completion and never block; a job's
//! output arrives later, through the same loop, as more events.

use std::collections::HashMap;

use duet_proc::{JobEvent, JobId, ShellConfig, Spawner};
use duet_store::{History, KvStore};

use crate::assistant::AssistantSession;
use crate::console::Console;
use crate::display::Display;
use crate::input::{self, EditAction, Key, KeyDecoder};
use crate::render::{Markup, PlainText, RuleSet, ANSI_RULES};
use crate::router::{self, Route};
use crate::session::{Mode, Session};
use crate::shell::ShellExecutor;

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub shell: ShellConfig,
    /// Assistant binary, by name or path.
    pub assistant_program: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            shell: ShellConfig::default(),
            assistant_program: "gemini".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobKind {
    Shell,
    Assistant,
}

pub struct Controller<D, P, S> {
    console: Console<D>,
    spawner: P,
    history: History<S>,
    session: Session,
    decoder: KeyDecoder,
    shell: ShellExecutor,
    assistant: AssistantSession,
    /// Jobs that have not delivered their terminal event yet.
    jobs: HashMap<JobId, JobKind>,
    next_job: JobId,
    startup_notice: Option<String>,
}

impl<D: Display, P: Spawner, S: KvStore> Controller<D, P, S> {
    pub fn new(display: D, spawner: P, history: History<S>, config: ControllerConfig) -> Self {
        let (markup, startup_notice) = match compile_markup(ANSI_RULES) {
            Ok(markup) => (markup, None),
            Err(notice) => (Box::new(PlainText) as Box<dyn Markup>, Some(notice)),
        };

        Self {
            console: Console::new(display, markup),
            spawner,
            history,
            session: Session::new(),
            decoder: KeyDecoder::new(),
            shell: ShellExecutor::new(config.shell),
            assistant: AssistantSession::new(config.assistant_program),
            jobs: HashMap::new(),
            next_job: 1,
            startup_notice,
        }
    }

    /// Print the welcome banner and the first prompt.
    pub fn start(&mut self) {
        self.console.banner();
        if let Some(notice) = self.startup_notice.take() {
            self.console.notice(&notice);
        }
        self.console.prompt(&self.session);
    }

    /// Replace the markup dialect used for assistant output. On failure the
    /// reason is shown and output falls back to plain text.
    pub fn set_markup_rules(&mut self, rules: &[(&str, &str)]) -> bool {
        match compile_markup(rules) {
            Ok(markup) => {
                self.console.set_markup(markup);
                true
            }
            Err(notice) => {
                self.console.set_markup(Box::new(PlainText));
                self.console.notice(&notice);
                false
            }
        }
    }

    /// Feed one chunk of raw terminal input.
    pub fn handle_input(&mut self, chunk: &str) {
        for key in self.decoder.decode(chunk) {
            self.handle_key(key);
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        let action = input::edit(&mut self.session, &mut self.history, key);
        match action {
            EditAction::Nothing => {}
            EditAction::Echo(ch) => self.console.echo(ch),
            EditAction::Erase => self.console.erase(),
            EditAction::Redraw => self.console.redraw_line(&self.session),
            EditAction::Abort => self.console.abort_line(&self.session),
            EditAction::ClearScreen => self.console.clear_screen(&self.session),
            EditAction::ToggleMode => {
                self.session.mode = self.session.mode.toggled();
                log::debug!("mode toggled to {:?}", self.session.mode);
                self.console.redraw_line(&self.session);
            }
            EditAction::Submit(line) => {
                self.console.end_line();
                self.dispatch(&line);
            }
        }
    }

    fn dispatch(&mut self, line: &str) {
        let route = router::route(self.session.mode, line);
        log::debug!("submitted {line:?} in {:?} mode: {route:?}", self.session.mode);

        match route {
            Route::Empty => self.console.prompt(&self.session),
            Route::Help => {
                self.console.raw_line(router::HELP_TEXT);
                self.console.finish(&self.session);
            }
            Route::AiHelp => {
                self.console.raw_line(router::AI_HELP_TEXT);
                self.console.finish(&self.session);
            }
            Route::Clear => self.console.clear_screen(&self.session),
            Route::ChangeDir(dir) => {
                self.console.notice(&router::cd_notice(dir));
                self.console.finish(&self.session);
            }
            Route::EnterAi => {
                self.session.mode = Mode::Ai;
                self.console.notice(router::ENTERED_AI_NOTICE);
                self.console.finish(&self.session);
            }
            Route::ExitAi => {
                self.session.mode = Mode::Normal;
                self.console.notice(router::EXITED_AI_NOTICE);
                self.console.finish(&self.session);
            }
            Route::Shell(cmd) => {
                let job = self.allocate_job();
                if self
                    .shell
                    .run(job, cmd, &mut self.spawner, &mut self.console, &self.session)
                {
                    self.jobs.insert(job, JobKind::Shell);
                }
            }
            Route::Assistant(prompt) => {
                let job = self.allocate_job();
                if self
                    .assistant
                    .run(job, prompt, &mut self.spawner, &mut self.console, &self.session)
                {
                    self.jobs.insert(job, JobKind::Assistant);
                }
            }
        }
    }

    fn allocate_job(&mut self) -> JobId {
        let job = self.next_job;
        self.next_job += 1;
        job
    }

    /// Render one event from a spawned job.
    pub fn handle_job_event(&mut self, event: JobEvent) {
        let JobEvent { job, event } = event;
        let Some(kind) = self.jobs.get(&job).copied() else {
            log::warn!("event for unknown job {job}: {event:?}");
            return;
        };
        if event.is_terminal() {
            self.jobs.remove(&job);
        }

        match kind {
            JobKind::Shell => self
                .shell
                .on_event(job, event, &mut self.console, &self.session),
            JobKind::Assistant => {
                self.assistant
                    .on_event(job, event, &mut self.console, &mut self.session)
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn display(&self) -> &D {
        self.console.display()
    }

    pub fn display_mut(&mut self) -> &mut D {
        self.console.display_mut()
    }

    pub fn spawner(&self) -> &P {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut P {
        &mut self.spawner
    }

    pub fn running_jobs(&self) -> usize {
        self.jobs.len()
    }
}

fn compile_markup(rules: &[(&str, &str)]) -> Result<Box<dyn Markup>, String> {
    match RuleSet::new(rules) {
        Ok(rules) => Ok(Box::new(rules)),
        Err(e) => {
            log::error!("markup disabled: {e}");
            Err(format!("Markup disabled, showing plain text: {e}"))
        }
    }
}
