//! Everything the controller writes to the display goes through [`Console`].

use duet_proc::JobId;

use crate::display::Display;
use crate::render::{to_crlf, Markup};
use crate::session::Session;

const BANNER: &str = "\x1b[1;34mWelcome to duet\x1b[0m\r\n";
const INDICATOR: &str = "\x1b[36mThinking...\x1b[0m\r\n";
/// Cursor up one line, erase it, return to column 0.
const ERASE_PREVIOUS_LINE: &str = "\x1b[1A\x1b[2K\r";
const ERASE_LINE: &str = "\x1b[2K\r";

pub struct Console<D> {
    display: D,
    markup: Box<dyn Markup>,
    /// Job whose indicator is the last block written, if any.
    indicator: Option<JobId>,
    /// Text on the unfinished input line below the output. Output is
    /// written above it and it is reprinted after.
    input_line: String,
    /// Whether the input line starts with the prompt. Input typed while
    /// a job runs has none until the job finishes.
    prompt_shown: bool,
}

impl<D: Display> Console<D> {
    pub fn new(display: D, markup: Box<dyn Markup>) -> Self {
        Self {
            display,
            markup,
            indicator: None,
            input_line: String::new(),
            prompt_shown: false,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn set_markup(&mut self, markup: Box<dyn Markup>) {
        self.markup = markup;
    }

    /// Write complete lines above the input line. Anything written after the
    /// indicator pins it on screen.
    fn write_block(&mut self, text: &str) {
        self.indicator = None;
        if self.input_line.is_empty() {
            self.display.write(text);
        } else {
            let out = format!("{ERASE_LINE}{text}{}", self.input_line);
            self.display.write(&out);
        }
    }

    pub fn banner(&mut self) {
        self.write_block(BANNER);
    }

    pub fn prompt(&mut self, session: &Session) {
        let line = format!("{}{}", session.mode.prompt(), session.buffer);
        if self.input_line.is_empty() {
            self.display.write(&line);
        } else {
            self.display.write(&format!("{ERASE_LINE}{line}"));
        }
        self.input_line = line;
        self.prompt_shown = true;
    }

    /// Clear the input line and reprint it with the current buffer. The
    /// prompt is only drawn if it was already there.
    pub fn redraw_line(&mut self, session: &Session) {
        let line = if self.prompt_shown {
            format!("{}{}", session.mode.prompt(), session.buffer)
        } else {
            session.buffer.clone()
        };
        self.display.write(&format!("{ERASE_LINE}{line}"));
        self.input_line = line;
    }

    pub fn echo(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.display.write(ch.encode_utf8(&mut buf));
        self.input_line.push(ch);
    }

    /// Erase the last column of the input line.
    pub fn erase(&mut self) {
        self.display.write("\x08 \x08");
        self.input_line.pop();
    }

    /// Commit the input line as submitted.
    pub fn end_line(&mut self) {
        self.display.write("\r\n");
        self.input_line.clear();
        self.prompt_shown = false;
        self.indicator = None;
    }

    pub fn abort_line(&mut self, session: &Session) {
        self.display.write("^C\r\n");
        self.input_line.clear();
        self.indicator = None;
        self.prompt(session);
    }

    pub fn clear_screen(&mut self, session: &Session) {
        self.indicator = None;
        self.input_line.clear();
        self.display.clear();
        self.prompt(session);
    }

    /// One line of process output, written as-is.
    pub fn raw_line(&mut self, text: &str) {
        let line = format!("{}\r\n", to_crlf(text));
        self.write_block(&line);
    }

    /// One line of assistant output, converted through the markup rules.
    pub fn markup_line(&mut self, text: &str) {
        let converted = self.markup.to_terminal(text);
        self.raw_line(&converted);
    }

    pub fn notice(&mut self, text: &str) {
        let line = format!("\x1b[33m{}\x1b[0m\r\n", to_crlf(text));
        self.write_block(&line);
    }

    pub fn error(&mut self, text: &str) {
        let line = format!("\x1b[31m{}\x1b[0m\r\n", to_crlf(text));
        self.write_block(&line);
    }

    /// Dim rule spanning the display width, on its own line.
    pub fn separator(&mut self) {
        let width = self.display.columns().max(1);
        let line = format!("\r\n\x1b[90m{}\x1b[0m\r\n", "─".repeat(width));
        self.write_block(&line);
    }

    /// Close out a command: separator, then prompt with any pending input.
    pub fn finish(&mut self, session: &Session) {
        if !self.input_line.is_empty() {
            self.display.write(ERASE_LINE);
            self.input_line.clear();
        }
        self.separator();
        self.prompt(session);
    }

    pub fn show_indicator(&mut self, job: JobId) {
        self.write_block(INDICATOR);
        self.indicator = Some(job);
    }

    /// Remove `job`'s indicator if nothing was written after it.
    pub fn take_indicator(&mut self, job: JobId) {
        if self.indicator != Some(job) {
            return;
        }
        if self.input_line.is_empty() {
            self.display.write(ERASE_PREVIOUS_LINE);
        } else {
            let out = format!("{ERASE_LINE}{ERASE_PREVIOUS_LINE}{}", self.input_line);
            self.display.write(&out);
        }
        self.indicator = None;
    }

    pub fn indicator(&self) -> Option<JobId> {
        self.indicator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{PlainText, RuleSet};
    use crate::session::Mode;
    use crate::test_support::ScreenDisplay;

    fn console() -> Console<ScreenDisplay> {
        Console::new(ScreenDisplay::new(), Box::new(RuleSet::ansi().unwrap()))
    }

    #[test]
    fn test_prompt_includes_buffer() {
        let mut console = console();
        let mut session = Session::new();
        session.buffer.push_str("ls");
        console.prompt(&session);

        assert_eq!(console.display().row(0), "➜ ~ ls");
    }

    #[test]
    fn test_redraw_replaces_line() {
        let mut console = console();
        let mut session = Session::new();
        session.buffer.push_str("first draft");
        console.prompt(&session);

        session.mode = Mode::Ai;
        session.buffer = "x".to_string();
        console.redraw_line(&session);

        assert_eq!(console.display().row(0), "✨ AI ➜ x");
    }

    #[test]
    fn test_erase_removes_last_column() {
        let mut console = console();
        "abc".chars().for_each(|c| console.echo(c));
        console.erase();
        assert_eq!(console.display().row(0), "ab");
    }

    #[test]
    fn test_output_lands_above_pending_input() {
        let mut console = console();
        console.raw_line("first");
        "pw".chars().for_each(|c| console.echo(c));
        console.raw_line("second");
        console.notice("third");

        let screen = console.display();
        assert_eq!(screen.row(0), "first");
        assert_eq!(screen.row(1), "second");
        assert_eq!(screen.row(2), "third");
        assert_eq!(screen.row(3), "pw");
        assert_eq!(screen.current_line(), "pw");
    }

    #[test]
    fn test_redraw_without_prompt_keeps_bare_input() {
        let mut console = console();
        let mut session = Session::new();
        console.prompt(&session);
        console.end_line();

        session.buffer = "pwd".to_string();
        console.redraw_line(&session);
        assert_eq!(console.display().current_line(), "pwd");

        console.finish(&session);
        assert_eq!(console.display().current_line(), "➜ ~ pwd");
    }

    #[test]
    fn test_indicator_erased_below_pending_input() {
        let mut console = console();
        console.show_indicator(7);
        "ab".chars().for_each(|c| console.echo(c));

        console.take_indicator(7);
        console.markup_line("answer");

        let screen = console.display();
        assert!(!screen.screen_contains("Thinking..."));
        assert_eq!(screen.row(0), "answer");
        assert_eq!(screen.row(1), "ab");
        assert_eq!(console.indicator(), None);
    }

    #[test]
    fn test_separator_spans_width() {
        let mut console = console();
        console.separator();
        let row = console.display().row(1);
        assert_eq!(row.chars().count(), 80);
        assert!(row.chars().all(|c| c == '─'));
    }

    #[test]
    fn test_raw_line_normalizes_newlines() {
        let mut console = console();
        console.raw_line("one\ntwo");
        assert_eq!(console.display().row(0), "one");
        assert_eq!(console.display().row(1), "two");
        assert!(console.display().transcript().contains("one\r\ntwo\r\n"));
    }

    #[test]
    fn test_markup_line_applies_rules() {
        let mut console = console();
        console.markup_line("**hi**");
        assert_eq!(console.display().row(0), "hi");
        assert!(console.display().transcript().contains("\x1b[1mhi\x1b[22m"));
    }

    #[test]
    fn test_plain_markup_keeps_literals() {
        let mut console = Console::new(ScreenDisplay::new(), Box::new(PlainText));
        console.markup_line("**hi**");
        assert_eq!(console.display().row(0), "**hi**");
    }

    #[test]
    fn test_indicator_erased_when_last() {
        let mut console = console();
        console.show_indicator(4);
        assert_eq!(console.display().row(0), "Thinking...");

        console.take_indicator(4);
        console.raw_line("answer");
        assert_eq!(console.display().row(0), "answer");
        assert_eq!(console.indicator(), None);
    }

    #[test]
    fn test_indicator_kept_after_other_output() {
        let mut console = console();
        console.show_indicator(4);
        console.raw_line("from another job");
        console.take_indicator(4);

        assert_eq!(console.display().row(0), "Thinking...");
        assert_eq!(console.display().row(1), "from another job");
    }

    #[test]
    fn test_indicator_other_job_untouched() {
        let mut console = console();
        console.show_indicator(1);
        console.take_indicator(2);
        assert_eq!(console.indicator(), Some(1));
    }

    #[test]
    fn test_clear_screen_reprints_prompt() {
        let mut console = console();
        let mut session = Session::new();
        console.raw_line("old output");
        session.buffer.push_str("keep");
        console.clear_screen(&session);

        assert_eq!(console.display().clears(), 1);
        assert_eq!(console.display().row(0), "➜ ~ keep");
        assert!(!console.display().screen_contains("old output"));
    }
}
