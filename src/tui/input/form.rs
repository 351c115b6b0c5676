use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, FormField, FormState};
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(form) = app.form.as_mut() else {
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.session.cancel();
            app.refresh();
        }

        // Newline (value field only): Alt-Enter or Ctrl-J
        (m, KeyCode::Enter) if m.contains(KeyModifiers::ALT) => insert_newline(form),
        (KeyModifiers::CONTROL, KeyCode::Char('j')) => insert_newline(form),

        (_, KeyCode::Enter) => {
            let record = form.to_record();
            app.session.submit(record);
            app.refresh();
        }

        (_, KeyCode::Tab) => form.focus(form.focus.next()),
        (_, KeyCode::BackTab) => form.focus(form.focus.prev()),

        (_, KeyCode::Left) => {
            if let Some(pos) = prev_grapheme_boundary(form.buffer(), form.cursor) {
                form.cursor = pos;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(pos) = next_grapheme_boundary(form.buffer(), form.cursor) {
                form.cursor = pos;
            }
        }
        (_, KeyCode::Home) => form.cursor = line_start(form.buffer(), form.cursor),
        (_, KeyCode::End) => form.cursor = line_end(form.buffer(), form.cursor),

        (_, KeyCode::Backspace) => {
            if let Some(pos) = prev_grapheme_boundary(form.buffer(), form.cursor) {
                let end = form.cursor;
                form.buffer_mut().replace_range(pos..end, "");
                form.cursor = pos;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(end) = next_grapheme_boundary(form.buffer(), form.cursor) {
                let start = form.cursor;
                form.buffer_mut().replace_range(start..end, "");
            }
        }

        (KeyModifiers::NONE, KeyCode::Char(c)) => {
            let at = form.cursor;
            form.buffer_mut().insert(at, c);
            form.cursor += c.len_utf8();
        }
        _ => {}
    }
}

fn insert_newline(form: &mut FormState) {
    if form.focus != FormField::Value {
        return;
    }
    let at = form.cursor;
    form.buffer_mut().insert(at, '\n');
    form.cursor += 1;
}

fn line_start(text: &str, cursor: usize) -> usize {
    text[..cursor].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, cursor: usize) -> usize {
    text[cursor..].find('\n').map_or(text.len(), |i| cursor + i)
}

#[cfg(test)]
mod tests {
    use super::super::test_keys::*;
    use super::*;
    use crate::session::Mode;
    use crate::tui::render::test_helpers::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_through_the_form() {
        let (tmp, mut app) = app_with_records(EMPTY_CSV);
        press(&mut app, &[ch('c')]);
        type_str(&mut app, "1776-07-04");
        press(&mut app, &[key(KeyCode::Tab)]);
        type_str(&mut app, "Independence");
        press(&mut app, &[KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)]);
        type_str(&mut app, "Philadelphia");
        press(&mut app, &[key(KeyCode::Tab)]);
        type_str(&mut app, "#Founding");
        press(&mut app, &[key(KeyCode::Enter)]);

        assert_eq!(app.view.status.mode, Mode::Browse);
        assert!(app.form.is_none());
        assert_eq!(app.message.as_ref().unwrap().text, "Record added.");
        let on_disk = std::fs::read_to_string(tmp.path().join("timeline.csv")).unwrap();
        assert_eq!(
            on_disk,
            "# key,value,tags\n\"1776-07-04\",\"Independence\nPhiladelphia\",\"#Founding\"\n"
        );
    }

    #[test]
    fn duplicate_key_keeps_form_with_error() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('c')]);
        type_str(&mut app, "1776-07-04");
        press(&mut app, &[key(KeyCode::Enter)]);

        assert_eq!(app.view.status.mode, Mode::Create);
        assert_eq!(app.form.as_ref().unwrap().field(FormField::Key), "1776-07-04");
        assert_eq!(
            app.message.as_ref().unwrap().text,
            "key must be unique: 1776-07-04 already exists"
        );
    }

    #[test]
    fn newline_only_in_value_field() {
        let (_tmp, mut app) = app_with_records(EMPTY_CSV);
        press(&mut app, &[ch('c'), ctrl('j')]);
        assert_eq!(app.form.as_ref().unwrap().field(FormField::Key), "");
        press(&mut app, &[key(KeyCode::Tab), ch('a'), ctrl('j'), ch('b')]);
        assert_eq!(app.form.as_ref().unwrap().field(FormField::Value), "a\nb");
    }

    #[test]
    fn editing_keys_move_by_grapheme() {
        let (_tmp, mut app) = app_with_records(EMPTY_CSV);
        press(&mut app, &[ch('c')]);
        type_str(&mut app, "añb");
        press(
            &mut app,
            &[key(KeyCode::Left), key(KeyCode::Backspace), key(KeyCode::Home)],
        );
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.field(FormField::Key), "ab");
        assert_eq!(form.cursor, 0);

        press(&mut app, &[key(KeyCode::Delete), key(KeyCode::End), ch('!')]);
        assert_eq!(app.form.as_ref().unwrap().field(FormField::Key), "b!");
    }

    #[test]
    fn esc_cancels_update_without_changes() {
        let (tmp, mut app) = app_with_records(SAMPLE_CSV);
        press(&mut app, &[ch('u'), key(KeyCode::Backspace), key(KeyCode::Esc)]);
        assert_eq!(app.view.status.mode, Mode::Browse);
        let on_disk = std::fs::read_to_string(tmp.path().join("timeline.csv")).unwrap();
        assert_eq!(on_disk, SAMPLE_CSV);
    }

    #[test]
    fn line_bounds() {
        assert_eq!(line_start("ab\ncd", 4), 3);
        assert_eq!(line_end("ab\ncd", 1), 2);
        assert_eq!(line_end("ab\ncd", 3), 5);
    }
}
