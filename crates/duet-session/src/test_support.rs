//! Test doubles: a headless screen display and a scripted spawner.

use std::io;

use duet_proc::{Invocation, JobId, ProcError, Spawner};
use duet_vt::{VtCell, VtTerminal};

use crate::display::Display;

const COLS: u16 = 80;
const ROWS: u16 = 40;

/// [`Display`] backed by a `duet-vt` terminal, plus a transcript of every write.
pub struct ScreenDisplay {
    term: VtTerminal,
    transcript: String,
    clears: usize,
}

impl ScreenDisplay {
    pub fn new() -> Self {
        Self {
            term: VtTerminal::new(COLS, ROWS),
            transcript: String::new(),
            clears: 0,
        }
    }

    pub fn row(&self, row: u16) -> String {
        self.term.screen().row_text(row)
    }

    pub fn cell(&self, row: u16, col: u16) -> VtCell {
        self.term.screen().cell(row, col)
    }

    pub fn find(&self, needle: &str) -> Option<(u16, u16)> {
        self.term.screen().find(needle)
    }

    pub fn screen_contains(&self, needle: &str) -> bool {
        self.term.screen().contains(needle)
    }

    /// Row the cursor is on.
    pub fn cursor_row(&self) -> u16 {
        self.term.cursor().row
    }

    /// Text of the row holding the cursor.
    pub fn current_line(&self) -> String {
        self.row(self.cursor_row())
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Display for ScreenDisplay {
    fn write(&mut self, text: &str) {
        self.transcript.push_str(text);
        self.term.write(text.as_bytes());
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.term.write(b"\x1b[2J\x1b[H");
    }

    fn columns(&self) -> usize {
        usize::from(COLS)
    }
}

/// Records spawn requests instead of starting processes.
#[derive(Default)]
pub struct ScriptedSpawner {
    pub spawned: Vec<(JobId, Invocation)>,
    fail_next: bool,
}

impl ScriptedSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `spawn` call fail as if the program did not exist.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    pub fn last(&self) -> Option<&(JobId, Invocation)> {
        self.spawned.last()
    }
}

impl Spawner for ScriptedSpawner {
    fn spawn(&mut self, job: JobId, invocation: &Invocation) -> Result<(), ProcError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(ProcError::Spawn {
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            });
        }
        self.spawned.push((job, invocation.clone()));
        Ok(())
    }
}
