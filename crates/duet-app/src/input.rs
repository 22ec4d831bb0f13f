//! Keyboard input: a blocking reader thread that turns crossterm events back
//! into the raw byte stream the session controller decodes.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Raw terminal text: one key or a whole paste.
    Input(String),
    Quit,
}

/// Read terminal events on a dedicated OS thread until the receiver is
/// dropped or the user quits.
pub fn spawn_input_thread(sender: UnboundedSender<AppEvent>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("duet-input".to_string())
        .spawn(move || loop {
            let app_event = match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    if is_quit(&key) {
                        AppEvent::Quit
                    } else {
                        match key_event_to_input(key) {
                            Some(text) => AppEvent::Input(text),
                            None => continue,
                        }
                    }
                }
                Ok(Event::Paste(text)) => AppEvent::Input(text),
                Ok(_) => continue,
                Err(e) => {
                    log::error!("reading terminal input failed: {e}");
                    AppEvent::Quit
                }
            };

            let quit = app_event == AppEvent::Quit;
            if sender.send(app_event).is_err() || quit {
                break;
            }
        })?;
    Ok(())
}

/// Ctrl+D leaves the app. It never reaches the controller.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('d') | KeyCode::Char('D'))
}

/// Encode a key the way a terminal would send it.
pub fn key_event_to_input(key: KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                let lowercase = ch.to_ascii_lowercase();
                // Ctrl+Space (and Ctrl+@) is NUL.
                if lowercase == ' ' || lowercase == '@' {
                    return Some("\0".to_string());
                }
                // Ctrl+letter produces control codes (1-26)
                if lowercase.is_ascii_lowercase() {
                    let code = (lowercase as u8 - b'a') + 1;
                    return Some(char::from(code).to_string());
                }
            }
            Some(ch.to_string())
        }
        KeyCode::Enter => Some("\r".to_string()),
        KeyCode::Tab => Some("\t".to_string()),
        KeyCode::Backspace => Some("\x7f".to_string()),
        KeyCode::Esc => Some("\x1b".to_string()),
        KeyCode::Up => Some("\x1b[A".to_string()),
        KeyCode::Down => Some("\x1b[B".to_string()),
        KeyCode::Right => Some("\x1b[C".to_string()),
        KeyCode::Left => Some("\x1b[D".to_string()),
        KeyCode::Null => Some("\0".to_string()),
        _ => None,
    }
}
