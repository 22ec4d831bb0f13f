//! Keystroke decoding and single-line editing.
//!
//! Input arrives as raw terminal text: one chunk may hold a single key, an
//! escape sequence, or a whole paste. [`KeyDecoder`] splits chunks into
//! [`Key`]s and [`edit`] applies one key to the session buffer and history
//! cursor, returning what the display needs to do about it.

use duet_store::{History, KvStore, Newer};

use crate::session::Session;

const UP: &str = "\x1b[A";
const DOWN: &str = "\x1b[B";
const UP_SS3: &str = "\x1bOA";
const DOWN_SS3: &str = "\x1bOB";

/// A decoded keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable character (code point >= 32, except DEL).
    Char(char),
    Up,
    Down,
    /// Ctrl+C.
    Interrupt,
    /// Ctrl+L.
    ClearScreen,
    /// Ctrl+Space (NUL).
    ToggleMode,
    Enter,
    Backspace,
    /// Any other control code; has no effect.
    Ignored(char),
}

/// Splits raw input chunks into [`Key`]s.
///
/// Arrow keys are the only recognized escape sequences. Anything else that
/// starts with ESC is decoded byte by byte like ordinary input: the ESC
/// itself is an ignored control code and the rest is regular text.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    /// Last decoded key was a bare `\r`, so a following `\n` is the same Enter.
    after_cr: bool,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, chunk: &str) -> Vec<Key> {
        let mut keys = Vec::with_capacity(chunk.len());
        let mut rest = chunk;

        while let Some(ch) = rest.chars().next() {
            if let Some((key, tail)) = arrow_key(rest) {
                keys.push(key);
                rest = tail;
                self.after_cr = false;
                continue;
            }

            rest = &rest[ch.len_utf8()..];
            if ch == '\n' && self.after_cr {
                self.after_cr = false;
                continue;
            }
            self.after_cr = ch == '\r';
            keys.push(classify(ch));
        }

        keys
    }
}

fn arrow_key(input: &str) -> Option<(Key, &str)> {
    [(UP, Key::Up), (UP_SS3, Key::Up), (DOWN, Key::Down), (DOWN_SS3, Key::Down)]
        .into_iter()
        .find_map(|(seq, key)| input.strip_prefix(seq).map(|tail| (key, tail)))
}

fn classify(ch: char) -> Key {
    match ch {
        '\r' | '\n' => Key::Enter,
        '\x03' => Key::Interrupt,
        '\x0c' => Key::ClearScreen,
        '\0' => Key::ToggleMode,
        '\x7f' | '\x08' => Key::Backspace,
        c if (c as u32) >= 32 => Key::Char(c),
        c => Key::Ignored(c),
    }
}

/// What the display must do after a key was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Nothing,
    /// Echo one character at the end of the line.
    Echo(char),
    /// Erase one column at the end of the line.
    Erase,
    /// The buffer was replaced; clear the line and reprint prompt + buffer.
    Redraw,
    /// The line was abandoned (Ctrl+C).
    Abort,
    /// Clear the screen, keep the buffer.
    ClearScreen,
    /// Switch between shell and AI mode, keep the buffer.
    ToggleMode,
    /// The line was committed. Carries the raw, untrimmed text.
    Submit(String),
}

/// Apply one key to the buffer and history cursor.
pub fn edit<S: KvStore>(session: &mut Session, history: &mut History<S>, key: Key) -> EditAction {
    match key {
        Key::Up => match history.older() {
            Some(entry) => {
                session.buffer = entry.to_string();
                EditAction::Redraw
            }
            None => EditAction::Nothing,
        },
        Key::Down => match history.newer() {
            Newer::NotBrowsing => EditAction::Nothing,
            Newer::Entry(entry) => {
                session.buffer = entry.to_string();
                EditAction::Redraw
            }
            Newer::PastNewest => {
                session.buffer.clear();
                EditAction::Redraw
            }
        },
        Key::Interrupt => {
            session.buffer.clear();
            history.reset_cursor();
            EditAction::Abort
        }
        Key::ClearScreen => EditAction::ClearScreen,
        Key::ToggleMode => EditAction::ToggleMode,
        Key::Enter => {
            let line = std::mem::take(&mut session.buffer);
            history.append(&line);
            history.reset_cursor();
            EditAction::Submit(line)
        }
        Key::Backspace => match session.buffer.pop() {
            Some(_) => EditAction::Erase,
            None => EditAction::Nothing,
        },
        Key::Char(ch) => {
            session.buffer.push(ch);
            EditAction::Echo(ch)
        }
        Key::Ignored(_) => EditAction::Nothing,
    }
}
