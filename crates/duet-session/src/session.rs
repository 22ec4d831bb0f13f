/// How submitted lines are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Lines are built-ins or shell commands.
    #[default]
    Normal,
    /// Lines are prompts for the assistant.
    Ai,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Normal => Mode::Ai,
            Mode::Ai => Mode::Normal,
        }
    }

    /// Styled prompt shown at the start of the input line.
    pub fn prompt(self) -> &'static str {
        match self {
            Mode::Normal => "\x1b[1;32m➜\x1b[0m \x1b[34m~\x1b[0m ",
            Mode::Ai => "\x1b[35m✨ AI\x1b[0m \x1b[1;32m➜\x1b[0m ",
        }
    }
}

/// Per-controller session state.
#[derive(Debug, Default)]
pub struct Session {
    pub mode: Mode,
    /// The unsubmitted input line. Only appended to or truncated.
    pub buffer: String,
    ai_resumable: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an assistant invocation has completed in this session.
    pub fn ai_resumable(&self) -> bool {
        self.ai_resumable
    }

    /// Latch the resumable flag. It never goes back to `false`.
    pub fn mark_ai_resumable(&mut self) {
        if !self.ai_resumable {
            log::debug!("assistant conversation is now resumable");
            self.ai_resumable = true;
        }
    }
}
