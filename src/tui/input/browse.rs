use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::Direction;
use crate::tui::app::{App, PromptKind};

use super::prompt::open_prompt;

pub(super) fn handle_browse(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => app.session.save(),

        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.should_quit = true;
            return;
        }
        (KeyModifiers::NONE, KeyCode::Char('?')) => {
            app.show_help = true;
            return;
        }

        // Navigation
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
            app.session.navigate(Direction::Up)
        }
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
            app.session.navigate(Direction::Down)
        }
        (_, KeyCode::Home) | (KeyModifiers::NONE, KeyCode::Char('g')) => {
            app.session.navigate(Direction::Home)
        }
        (_, KeyCode::End) | (KeyModifiers::NONE, KeyCode::Char('G')) => {
            app.session.navigate(Direction::End)
        }

        // Search
        (KeyModifiers::NONE, KeyCode::Char('/')) => {
            let term = app.session.search_term().to_string();
            open_prompt(app, PromptKind::Search, term);
            return;
        }
        (_, KeyCode::Esc) => app.session.search(""),

        // Mode changes
        (KeyModifiers::NONE, KeyCode::Char('c')) => app.session.start_create(),
        (KeyModifiers::NONE, KeyCode::Char('u') | KeyCode::Char('e')) => {
            app.session.start_update()
        }
        (KeyModifiers::NONE, KeyCode::Char('d')) => app.session.start_delete(),
        (KeyModifiers::NONE, KeyCode::Char('r')) => app.session.request_reload(),

        // Other actions
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            app.copy_current();
            return;
        }
        (KeyModifiers::NONE, KeyCode::Char('o')) => {
            let current = app.session.path().display().to_string();
            open_prompt(app, PromptKind::OpenFile, current);
            return;
        }
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
    fn vim_and_arrow_navigation() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('j'), key(KeyCode::Down)]);
        assert_eq!(app.view.current, Some(2));
        press(&mut app, &[ch('j')]);
        assert_eq!(app.view.current, Some(2));
        press(&mut app, &[ch('g')]);
        assert_eq!(app.view.current, Some(0));
        press(&mut app, &[key(KeyCode::End), ch('k')]);
        assert_eq!(app.view.current, Some(1));
    }

    #[test]
    fn mode_keys() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('c')]);
        assert_eq!(app.view.status.mode, Mode::Create);

        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('e')]);
        assert_eq!(app.view.status.mode, Mode::Update);

        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('d')]);
        assert_eq!(app.view.status.mode, Mode::Delete);

        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('r')]);
        assert_eq!(app.view.status.mode, Mode::Confirm);
    }

    #[test]
    fn update_and_delete_ignored_without_records() {
        let (_tmp, mut app) = app_with_records(EMPTY_CSV);
        press(&mut app, &[ch('u'), ch('d')]);
        assert_eq!(app.view.status.mode, Mode::Browse);
    }

    #[test]
    fn ctrl_s_saves_canonical_file() {
        let (tmp, mut app) = app_with_records("# key,value,tags\na,b,c\n");
        press(&mut app, &[ctrl('s')]);
        let on_disk = std::fs::read_to_string(tmp.path().join("timeline.csv")).unwrap();
        assert_eq!(on_disk, "# key,value,tags\n\"a\",\"b\",\"c\"\n");
        assert_eq!(app.message.unwrap().text, "Saved!");
    }

    #[test]
    fn esc_clears_search() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        app.session.search("war");
        app.refresh();
        assert_eq!(app.view.records.len(), 1);
        press(&mut app, &[key(KeyCode::Esc)]);
        assert_eq!(app.view.search_term, "");
        assert_eq!(app.view.records.len(), 3);
    }

    #[test]
    fn q_quits() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('q')]);
        assert!(app.should_quit);
    }
}
