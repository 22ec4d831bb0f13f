//! Classification of submitted lines.

use crate::session::Mode;

pub const HELP_TEXT: &str = "\
Built-in commands:
  help            show this help
  clear           clear the screen
  env-debug       print the environment the shell sees
  ai              enter AI mode
  ai <prompt>     ask the assistant once, stay in shell mode
  <anything else> run with the system shell (stateless: cd has no effect)

Keys:
  Up / Down       browse history
  Ctrl+C          abort the current line
  Ctrl+L          clear the screen, keep the line
  Ctrl+Space      toggle AI mode";

pub const AI_HELP_TEXT: &str = "\
AI mode: every line is sent to the assistant as a prompt.
  exit            return to shell mode
  help            show this help
After the first answer, later prompts continue the same conversation.";

pub const ENTERED_AI_NOTICE: &str = "Entered AI mode. Type 'exit' or press Ctrl+Space to leave.";
pub const EXITED_AI_NOTICE: &str = "Exited AI mode.";

pub fn cd_notice(dir: &str) -> String {
    format!("[Info] cd to \"{dir}\" is not supported in this stateless shell.")
}

/// What a submitted line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Empty,
    Help,
    AiHelp,
    Clear,
    Shell(&'a str),
    ChangeDir(&'a str),
    EnterAi,
    ExitAi,
    Assistant(&'a str),
}

/// Classify `line` for `mode`. Matching is case-sensitive and works on the
/// trimmed line.
pub fn route(mode: Mode, line: &str) -> Route<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Route::Empty;
    }

    match mode {
        Mode::Ai => match line {
            "exit" => Route::ExitAi,
            "help" => Route::AiHelp,
            prompt => Route::Assistant(prompt),
        },
        Mode::Normal => match line {
            "help" => Route::Help,
            "clear" => Route::Clear,
            "env-debug" => Route::Shell("env"),
            "ai" => Route::EnterAi,
            _ => {
                if let Some(prompt) = argument(line, "ai") {
                    Route::Assistant(prompt)
                } else if let Some(dir) = argument(line, "cd") {
                    Route::ChangeDir(dir)
                } else {
                    Route::Shell(line)
                }
            }
        },
    }
}

/// The rest of `line` after `word` and at least one whitespace character.
fn argument<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(word)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start()).filter(|arg| !arg.is_empty())
}
