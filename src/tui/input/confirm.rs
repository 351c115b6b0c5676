use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => app.session.confirm(),
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => app.session.cancel(),
        _ => return,
    }
    app.refresh();
}

#[cfg(test)]
mod tests {
    use super::super::test_keys::*;
    use crate::session::Mode;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyCode;

    #[test]
    fn y_deletes_current_record() {
        let (tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('j'), ch('d'), ch('y')]);

        assert_eq!(app.view.status.mode, Mode::Browse);
        assert_eq!(app.view.records.len(), 2);
        assert_eq!(app.view.current_record().unwrap().key, "1787-09-17");
        assert_eq!(app.message.as_ref().unwrap().text, "Record deleted.");

        let on_disk = std::fs::read_to_string(tmp.path().join("timeline.csv")).unwrap();
        assert!(!on_disk.contains("1776-07-04"));
    }

    #[test]
    fn other_keys_keep_asking() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('d'), ch('x'), ch('j')]);
        assert_eq!(app.view.status.mode, Mode::Delete);
        press(&mut app, &[key(KeyCode::Esc)]);
        assert_eq!(app.view.status.mode, Mode::Browse);
        assert_eq!(app.view.records.len(), 3);
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let (tmp, mut app) = app_with_records(SAMPLE_CSV);
        std::fs::write(tmp.path().join("timeline.csv"), EMPTY_CSV).unwrap();

        press(&mut app, &[ch('r'), ch('n')]);
        assert_eq!(app.view.records.len(), 3);

        press(&mut app, &[ch('r'), ch('y')]);
        assert!(app.view.records.is_empty());
        assert_eq!(app.message.as_ref().unwrap().text, "Data reloaded.");
    }
}
