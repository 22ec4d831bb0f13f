//! Command lines for the supported assistant CLIs.

use std::path::Path;

use duet_proc::Invocation;

/// Known assistant CLIs and their invocation conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantKind {
    Gemini,
    Claude,
    Unknown,
}

impl AssistantKind {
    /// Detect the assistant kind from the binary name.
    pub fn detect(binary: &str) -> Self {
        let name = Path::new(binary)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(binary);

        if name.starts_with("gemini") {
            AssistantKind::Gemini
        } else if name.starts_with("claude") {
            AssistantKind::Claude
        } else {
            AssistantKind::Unknown
        }
    }

    /// Flag that lets the assistant act without asking for confirmation.
    pub fn autonomous_flag(self) -> &'static str {
        match self {
            AssistantKind::Claude => "--dangerously-skip-permissions",
            // Unknown binaries get Gemini's conventions.
            AssistantKind::Gemini | AssistantKind::Unknown => "--yolo",
        }
    }

    /// Arguments that start a new conversation.
    pub fn new_session_args(self, prompt: &str) -> Vec<String> {
        match self {
            AssistantKind::Claude => vec![
                self.autonomous_flag().to_string(),
                "-p".to_string(),
                prompt.to_string(),
            ],
            AssistantKind::Gemini | AssistantKind::Unknown => {
                vec![self.autonomous_flag().to_string(), prompt.to_string()]
            }
        }
    }

    /// Arguments that continue the most recent conversation. The prompt flag
    /// is always explicit here.
    pub fn resume_args(self, prompt: &str) -> Vec<String> {
        let mut args: Vec<String> = match self {
            AssistantKind::Claude => vec!["--continue".to_string()],
            AssistantKind::Gemini | AssistantKind::Unknown => {
                vec!["--resume".to_string(), "latest".to_string()]
            }
        };
        args.extend([
            self.autonomous_flag().to_string(),
            "-p".to_string(),
            prompt.to_string(),
        ]);
        args
    }
}

/// Build the invocation for one assistant prompt.
pub fn build_invocation(binary: &str, kind: AssistantKind, prompt: &str, resume: bool) -> Invocation {
    let args = if resume {
        kind.resume_args(prompt)
    } else {
        kind.new_session_args(prompt)
    };
    Invocation::new(binary, args)
}
