pub mod confirm_popup;
pub mod detail_view;
pub mod form_view;
pub mod help_overlay;
mod helpers;
pub mod record_list;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use crate::session::Mode;

use super::app::App;

/// Main render function, dispatching to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: content | status row | message row
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // Content: record list (left) | detail or form (right)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[0]);

    record_list::render_record_list(frame, app, columns[0]);

    match app.view.status.mode {
        Mode::Create | Mode::Update => form_view::render_form(frame, app, columns[1]),
        _ => detail_view::render_detail_view(frame, app, columns[1]),
    }

    if matches!(app.view.status.mode, Mode::Delete | Mode::Confirm) {
        confirm_popup::render_confirm_popup(frame, app, rows[0]);
    }

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, rows[1]);
    status_row::render_message_row(frame, app, rows[2]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if last_end == 0 {
        spans.push(Span::styled(text.to_string(), base_style));
    } else if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    #[test]
    fn highlight_splits_at_matches() {
        let re = Regex::new("(?i)on").unwrap();
        let mut spans = Vec::new();
        push_highlighted_spans(
            &mut spans,
            "Lexington and Concord",
            Style::default(),
            Style::default(),
            Some(&re),
        );
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Lexingt", "on", " and C", "on", "cord"]);
    }

    #[test]
    fn full_screen_shows_list_detail_and_status() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        let output = render_app(&mut app);

        assert!(output.contains("1775-04-19"));
        assert!(output.contains("1787-09-17"));
        assert!(output.contains("Lexington and Concord"));
        assert!(output.contains("Mode: browse | File: timeline.csv | Lines: 3 | Matches: 3 | Current: 1"));
    }

    #[test]
    fn delete_mode_shows_confirmation() {
        let (_tmp, mut app) = app_with_records(SAMPLE_CSV);
        app.session.start_delete();
        app.refresh();
        let output = render_app(&mut app);
        assert!(output.contains("Delete 1775-04-19?"));
    }
}
