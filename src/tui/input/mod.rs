mod browse;
mod confirm;
mod form;
mod prompt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::Mode;

use super::app::App;

use browse::handle_browse;
use confirm::handle_confirm;
use form::handle_form;
use prompt::handle_prompt;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Messages last until the next key
    app.message = None;

    // Help overlay: any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    let key = normalize_key(key);
    if app.prompt.is_some() {
        handle_prompt(app, key);
        return;
    }

    match app.view.status.mode {
        Mode::Browse => handle_browse(app, key),
        Mode::Create | Mode::Update => handle_form(app, key),
        Mode::Delete | Mode::Confirm => handle_confirm(app, key),
    }
}

/// Shift+letter arrives as lowercase with SHIFT on some terminals and as
/// uppercase on others. Normalize to uppercase without SHIFT.
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    key
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::tui::app::App;

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ch(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn press(app: &mut App, keys: &[KeyEvent]) {
        for k in keys {
            super::handle_key(app, *k);
        }
    }

    pub fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            super::handle_key(app, ch(c));
        }
    }
}
